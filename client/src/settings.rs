//! Client settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the account service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "API")]
pub struct ClientSettings {
    /// Base URL of the account service.
    #[ortho_config(default = String::from(DEFAULT_BASE))]
    pub base: String,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ClientSettings {
    /// Configured base URL without a trailing slash. Blank falls back to
    /// the default.
    #[must_use]
    pub fn base(&self) -> &str {
        let base = self.base.trim();
        if base.is_empty() {
            DEFAULT_BASE
        } else {
            base.trim_end_matches('/')
        }
    }

    /// Configured request timeout. Zero falls back to the default.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        };
        Duration::from_secs(secs)
    }
}
