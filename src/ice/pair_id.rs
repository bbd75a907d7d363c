use std::fmt;
use std::str::{from_utf8, FromStr};

use super::candidate::strip_candidate_prefix;
use super::{Candidate, IceError, CANDIDATE_ID_PREFIX};
use crate::io::{StunMessage, ATTR_CANDIDATE_PAIR_ID};

/// Identifies a candidate pair inside a STUN message.
///
/// The wire form is `source:destination` where both halves are candidate
/// ids without the `candidate:` prefix. Since only the first colon
/// separates the halves, the destination may itself contain colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePairId {
    source: String,
    destination: String,
}

impl CandidatePairId {
    /// Creates the id for a pair of local and remote candidates.
    pub fn new(local: &dyn Candidate, remote: &dyn Candidate) -> Self {
        CandidatePairId {
            source: strip_candidate_prefix(local.id()).to_string(),
            destination: strip_candidate_prefix(remote.id()).to_string(),
        }
    }

    /// Parses the attribute payload.
    pub fn parse(id: &[u8]) -> Result<Self, IceError> {
        let s = from_utf8(id).map_err(|_| {
            IceError::BadCandidatePairId(String::from_utf8_lossy(id).into_owned())
        })?;
        s.parse()
    }

    /// Looks for the pair id attribute in `msg`.
    ///
    /// The attribute is optional, a message without it gives `Ok(None)`.
    pub fn from_stun(msg: &StunMessage) -> Result<Option<Self>, IceError> {
        let Some(bytes) = msg.get(ATTR_CANDIDATE_PAIR_ID) else {
            return Ok(None);
        };
        Self::parse(bytes).map(Some)
    }

    /// Adds this id as attribute to `msg`.
    pub fn to_stun(&self, msg: &mut StunMessage) {
        msg.set(ATTR_CANDIDATE_PAIR_ID, self.to_string().into_bytes());
    }

    /// Id of the candidate the message was sent from.
    pub fn source_candidate_id(&self) -> String {
        format!("{CANDIDATE_ID_PREFIX}{}", self.source)
    }

    /// Id of the candidate the message was sent to.
    pub fn target_candidate_id(&self) -> String {
        format!("{CANDIDATE_ID_PREFIX}{}", self.destination)
    }
}

impl FromStr for CandidatePairId {
    type Err = IceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((source, destination)) = s.split_once(':') else {
            return Err(IceError::BadCandidatePairId(s.to_string()));
        };

        Ok(CandidatePairId {
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }
}

impl fmt::Display for CandidatePairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.destination)
    }
}
