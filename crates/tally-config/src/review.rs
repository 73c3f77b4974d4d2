//! Review engine settings: quorum rules, admin allowlist, triage size.

use serde::{Deserialize, Serialize};
use tally_core::auth::AllowlistAuthorizer;
use tally_core::quorum::{DEFAULT_QUORUM_THRESHOLD, QuorumPolicy};

const fn default_threshold() -> u32 {
    DEFAULT_QUORUM_THRESHOLD
}

const fn default_triage_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Distinct completed reviewers needed for an item to be fully reviewed.
    #[serde(default = "default_threshold")]
    pub quorum_threshold: u32,

    /// Areas that must each be covered by a completed session. Empty by
    /// default, which leaves area tags advisory.
    #[serde(default)]
    pub required_areas: Vec<String>,

    /// User ids allowed to respond to and resolve comments.
    #[serde(default)]
    pub admins: Vec<String>,

    /// Pending comments listed on the dashboard.
    #[serde(default = "default_triage_limit")]
    pub triage_limit: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            quorum_threshold: default_threshold(),
            required_areas: Vec::new(),
            admins: Vec::new(),
            triage_limit: default_triage_limit(),
        }
    }
}

impl ReviewConfig {
    #[must_use]
    pub fn quorum_policy(&self) -> QuorumPolicy {
        QuorumPolicy {
            threshold: self.quorum_threshold,
            required_areas: self.required_areas.clone(),
        }
    }

    #[must_use]
    pub fn authorizer(&self) -> AllowlistAuthorizer {
        AllowlistAuthorizer::new(self.admins.iter().cloned())
    }
}
