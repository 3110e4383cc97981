//! Price cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory price cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache loaded tables in memory.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

pub(crate) const fn default_true() -> bool {
    true
}

const fn default_ttl_secs() -> u64 {
    3600
}
