mod candidate;
pub use candidate::{Candidate, CandidateKind, IceCandidate, CANDIDATE_ID_PREFIX};

mod error;
pub use error::IceError;

mod extension;
pub use extension::{candidate_id_from_extensions, new_candidate_id_extension};
pub use extension::{set_candidate_id_extension, CandidateExtension, EXTENSION_KEY_CANDIDATE_ID};

mod pair;
pub use pair::{sort_by_prio, CandidatePair, CheckState};

mod pair_id;
pub use pair_id::CandidatePairId;
