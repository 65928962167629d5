//! Proxy configuration: partition names, cache version, precache manifest.
//!
//! The configuration is an explicit value object passed into every handler.
//! There is no ambient global state: given `(request, config, store)` the
//! strategy functions are pure.

use crate::error::{Error, Result};

/// Default cache version suffix.
pub const DEFAULT_VERSION: &str = "v1.0.0";

/// Default offline fallback page, always part of the precache manifest.
pub const DEFAULT_OFFLINE_PAGE: &str = "/offline.html";

/// Configuration for the offline cache proxy.
///
/// Bumping [`version`](ProxyConfig::version) renames all three partitions,
/// which is the only supported cache-invalidation mechanism: the next
/// activation deletes every partition that no longer matches.
///
/// # Example
///
/// ```
/// use offline_kit::ProxyConfig;
///
/// let config = ProxyConfig::new("v2.1.0")
///     .with_manifest(vec!["/", "/offline.html", "/static/app.js"])
///     .with_offline_page("/offline.html");
///
/// assert_eq!(config.static_partition(), "static-v2.1.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Version suffix applied to all partition names.
    pub version: String,

    /// App-shell URLs pre-populated into the static partition at install.
    /// All of them must be fetchable at install time or install fails.
    pub precache_manifest: Vec<String>,

    /// URL of the pre-cached offline fallback page served to navigations
    /// when both network and cache miss.
    pub offline_page: String,
}

impl ProxyConfig {
    /// Create a config with the given cache version and the default manifest.
    pub fn new(version: impl Into<String>) -> Self {
        ProxyConfig {
            version: version.into(),
            precache_manifest: vec!["/".to_string(), DEFAULT_OFFLINE_PAGE.to_string()],
            offline_page: DEFAULT_OFFLINE_PAGE.to_string(),
        }
    }

    /// Replace the precache manifest.
    pub fn with_manifest<I, S>(mut self, manifest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache_manifest = manifest.into_iter().map(Into::into).collect();
        self
    }

    /// Set the offline fallback page URL.
    pub fn with_offline_page(mut self, url: impl Into<String>) -> Self {
        self.offline_page = url.into();
        self
    }

    /// Validate the configuration before wiring it into a proxy.
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(Error::ConfigError("cache version must not be empty".into()));
        }
        if self.precache_manifest.is_empty() {
            return Err(Error::ConfigError(
                "precache manifest must not be empty".into(),
            ));
        }
        if !self.precache_manifest.contains(&self.offline_page) {
            return Err(Error::ConfigError(format!(
                "offline page {} must be part of the precache manifest",
                self.offline_page
            )));
        }
        Ok(())
    }

    /// Name of the static (app shell) partition.
    pub fn static_partition(&self) -> String {
        format!("static-{}", self.version)
    }

    /// Name of the dynamic (generic content) partition.
    pub fn dynamic_partition(&self) -> String {
        format!("dynamic-{}", self.version)
    }

    /// Name of the API partition.
    pub fn api_partition(&self) -> String {
        format!("api-{}", self.version)
    }

    /// The complete set of partition names for the current version.
    ///
    /// Activation deletes every partition not in this set.
    pub fn current_partitions(&self) -> [String; 3] {
        [
            self.static_partition(),
            self.dynamic_partition(),
            self.api_partition(),
        ]
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig::new(DEFAULT_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_names_carry_version() {
        let config = ProxyConfig::new("v1.2.3");
        assert_eq!(config.static_partition(), "static-v1.2.3");
        assert_eq!(config.dynamic_partition(), "dynamic-v1.2.3");
        assert_eq!(config.api_partition(), "api-v1.2.3");
    }

    #[test]
    fn test_version_bump_changes_all_partitions() {
        let old = ProxyConfig::new("v1.0.0");
        let new = ProxyConfig::new("v1.0.1");
        for name in old.current_partitions() {
            assert!(!new.current_partitions().contains(&name));
        }
    }

    #[test]
    fn test_default_manifest_contains_offline_page() {
        let config = ProxyConfig::default();
        assert!(config
            .precache_manifest
            .contains(&config.offline_page));
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn test_validate_rejects_empty_version() {
        let config = ProxyConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_offline_page() {
        let config = ProxyConfig::new("v1.0.0").with_manifest(vec!["/"]);
        assert!(config.validate().is_err());
    }
}
