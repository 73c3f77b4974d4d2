//! libSQL database configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".tally/review.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file, or the embedded replica file when a remote is set.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote primary URL (e.g., `libsql://reviews-acme.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote primary.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote primary is configured (URL and token both present).
    pub fn is_remote_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}
