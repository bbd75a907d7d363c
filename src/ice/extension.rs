use serde::{Deserialize, Serialize};

use super::candidate::{add_candidate_prefix, strip_candidate_prefix};

/// Extension key carrying a candidate's own id in its advertisement.
pub const EXTENSION_KEY_CANDIDATE_ID: &str = "cid";

/// A key/value extension of a candidate advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateExtension {
    /// Extension key.
    pub key: String,
    /// Extension value.
    pub value: String,
}

impl CandidateExtension {
    /// Creates a new extension entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        CandidateExtension {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Reads the candidate id from the first `cid` extension.
///
/// The id comes back with the `candidate:` prefix. The tag is optional, so a
/// missing entry gives an empty string.
pub fn candidate_id_from_extensions(extensions: &[CandidateExtension]) -> String {
    extensions
        .iter()
        .find(|ext| ext.key == EXTENSION_KEY_CANDIDATE_ID)
        .map(|ext| add_candidate_prefix(&ext.value).into_owned())
        .unwrap_or_default()
}

/// A `cid` extension for `candidate_id`, stored without prefix.
pub fn new_candidate_id_extension(candidate_id: &str) -> CandidateExtension {
    CandidateExtension::new(
        EXTENSION_KEY_CANDIDATE_ID,
        strip_candidate_prefix(candidate_id),
    )
}

/// Writes `candidate_id` into `extensions`.
///
/// The first `cid` entry is overwritten in place, otherwise one is appended.
/// Other entries are left as they are.
pub fn set_candidate_id_extension(extensions: &mut Vec<CandidateExtension>, candidate_id: &str) {
    let ext = new_candidate_id_extension(candidate_id);

    match extensions.iter_mut().find(|e| e.key == ext.key) {
        Some(existing) => *existing = ext,
        None => extensions.push(ext),
    }
}
