use std::fmt;

/// Size of a STUN transaction id in bytes, as per RFC 5389.
pub const TRANSACTION_ID_SIZE: usize = 12;

/// Identifier of a STUN transaction.
///
/// Only ever compared byte for byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransId([u8; TRANSACTION_ID_SIZE]);

impl TransId {
    /// Creates a new random transaction id.
    pub fn new() -> Self {
        let mut t = [0_u8; TRANSACTION_ID_SIZE];
        fastrand::fill(&mut t);
        TransId(t)
    }

    /// Copies a transaction id out of a slice.
    ///
    /// Returns `None` if the slice is not exactly [`TRANSACTION_ID_SIZE`] long.
    pub fn from_slice(s: &[u8]) -> Option<Self> {
        let t: [u8; TRANSACTION_ID_SIZE] = s.try_into().ok()?;
        Some(TransId(t))
    }

    /// The raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; TRANSACTION_ID_SIZE] {
        &self.0
    }
}

impl From<[u8; TRANSACTION_ID_SIZE]> for TransId {
    fn from(t: [u8; TRANSACTION_ID_SIZE]) -> Self {
        TransId(t)
    }
}

impl fmt::Debug for TransId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransId(")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// Numeric type of a STUN attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrType(pub u16);

/// Custom attribute carrying a [`CandidatePairId`][crate::ice::CandidatePairId].
///
/// Falls in the comprehension-optional range (0x8000-0xFFFF) so peers that
/// don't understand it just skip it.
pub const ATTR_CANDIDATE_PAIR_ID: AttrType = AttrType(0x8100);

/// A STUN message seen as a store of attributes.
///
/// Serializing to and from the wire is done elsewhere. Attributes keep the
/// order they were added in.
#[derive(Debug, Clone, Default)]
pub struct StunMessage {
    trans_id: TransId,
    attrs: Vec<(AttrType, Vec<u8>)>,
}

impl StunMessage {
    /// Creates an empty message for the given transaction.
    pub fn new(trans_id: TransId) -> Self {
        StunMessage {
            trans_id,
            attrs: vec![],
        }
    }

    /// The transaction id of this message.
    pub fn trans_id(&self) -> TransId {
        self.trans_id
    }

    /// Value of the first attribute of type `typ`, if present.
    pub fn get(&self, typ: AttrType) -> Option<&[u8]> {
        self.attrs
            .iter()
            .find(|(t, _)| *t == typ)
            .map(|(_, v)| v.as_slice())
    }

    /// Sets attribute `typ`. An existing value is replaced in place.
    pub fn set(&mut self, typ: AttrType, value: Vec<u8>) {
        if let Some(existing) = self.attrs.iter_mut().find(|(t, _)| *t == typ) {
            existing.1 = value;
        } else {
            self.attrs.push((typ, value));
        }
    }

    /// All attributes in order.
    pub fn attrs(&self) -> impl Iterator<Item = (AttrType, &[u8])> {
        self.attrs.iter().map(|(t, v)| (*t, v.as_slice()))
    }
}
