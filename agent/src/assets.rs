//! Build-time asset manifest.
//!
//! The agent eagerly fetches and caches this fixed list during install.
//! The list is baked in at build time and is not runtime-configurable;
//! shipping a different list means shipping a new agent generation with
//! a new cache name.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Name of the cache store for the current agent generation.
pub const CACHE_NAME: &str = "v1";

/// Assets fetched and cached during install.
pub const CACHE_ASSETS: &[&str] = &[
    "/",
    "/static/logo.png",
    "/static/service-worker.js",
    // Add further assets here as the app needs them.
];

/// Agent configuration, snapshotted from the build-time constants.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Cache store name for this agent generation.
    pub cache_name: String,
    /// URLs cached eagerly at install.
    pub assets: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            assets: CACHE_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AgentConfig {
    /// Configuration with a custom store name and asset list.
    pub fn new(cache_name: impl Into<String>, assets: &[&str]) -> Self {
        Self {
            cache_name: cache_name.into(),
            assets: assets.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_snapshots_constants() {
        let config = AgentConfig::default();
        assert_eq!(config.cache_name, "v1");
        assert_eq!(config.assets.len(), CACHE_ASSETS.len());
        assert_eq!(config.assets[0], "/");
    }

    #[test]
    fn custom_config() {
        let config = AgentConfig::new("v2", &["/", "/app.css"]);
        assert_eq!(config.cache_name, "v2");
        assert_eq!(config.assets, ["/", "/app.css"]);
    }
}
