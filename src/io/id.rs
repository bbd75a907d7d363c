use std::fmt;
use std::str::from_utf8;

// deliberate subset of ice-char, etc that are "safe"
const CHARS: &[u8] = b"abcdefghijklmnopqrstuvxyzABCDEFGHIJKLMNOPQRSTUVXYZ0123456789";

/// Random token of `L` ice-chars.
pub struct Id<const L: usize>([u8; L]);

impl<const L: usize> Id<L> {
    pub fn random() -> Id<L> {
        let mut x = [0; L];
        for val in x.iter_mut() {
            *val = CHARS[fastrand::usize(..CHARS.len())];
        }
        Id(x)
    }

    pub fn as_str(&self) -> &str {
        // CHARS are all ascii
        from_utf8(&self.0).unwrap_or_default()
    }
}

impl<const L: usize> Default for Id<L> {
    fn default() -> Self {
        Id::random()
    }
}

impl<const L: usize> fmt::Display for Id<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
