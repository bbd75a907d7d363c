use thiserror::Error;

/// Errors from the ICE candidate and pair types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IceError {
    /// A candidate could not be created.
    #[error("ICE bad candidate: {0}")]
    BadCandidate(String),

    /// A candidate pair id attribute could not be parsed.
    #[error("invalid candidates ID format: {0}")]
    BadCandidatePairId(String),
}
