//! Redaction of addresses and other identifying values in logs.
//!
//! With the `pii` feature, a value wrapped in [`Pii`] formats as
//! `{REDACTED}` for both `Display` and `Debug`.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pii<T>(pub T);

impl<T: fmt::Display> fmt::Display for Pii<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if cfg!(feature = "pii") {
            f.write_str("{REDACTED}")
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pii<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if cfg!(feature = "pii") {
            f.write_str("{REDACTED}")
        } else {
            fmt::Debug::fmt(&self.0, f)
        }
    }
}
