use std::sync::Arc;

use crate::ice::{Candidate, CandidatePair};

/// Settings applied to every candidate pair an agent forms.
///
/// ```
/// # use ice_pair::PairConfig;
/// let config = PairConfig::new()
///     .set_controlling(false)
///     .set_nominate_on_success(true);
///
/// assert!(!config.controlling());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairConfig {
    controlling: bool,
    nominate_on_success: bool,
}

impl PairConfig {
    /// Creates a new default config.
    pub fn new() -> Self {
        PairConfig::default()
    }

    /// Whether the local agent is controlling.
    ///
    /// Defaults to `true`.
    pub fn controlling(&self) -> bool {
        self.controlling
    }

    /// Set whether the local agent is controlling.
    pub fn set_controlling(mut self, controlling: bool) -> Self {
        self.controlling = controlling;
        self
    }

    /// Whether new pairs get nominated on the first successful binding.
    ///
    /// Defaults to `false`.
    pub fn nominate_on_success(&self) -> bool {
        self.nominate_on_success
    }

    /// Nominate new pairs on the first successful binding (aggressive nomination).
    pub fn set_nominate_on_success(mut self, v: bool) -> Self {
        self.nominate_on_success = v;
        self
    }

    /// Form a pair using this config.
    pub fn build(&self, local: Arc<dyn Candidate>, remote: Arc<dyn Candidate>) -> CandidatePair {
        let mut pair = CandidatePair::new(local, remote, self.controlling);
        pair.set_nominate_on_success(self.nominate_on_success);
        pair
    }
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            controlling: true,
            nominate_on_success: false,
        }
    }
}
