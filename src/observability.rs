//! Observability hooks for proxy operations.
//!
//! Implement the `ProxyMetrics` trait to feed cache hits, network fetches,
//! and offline fallbacks into your monitoring system:
//!
//! ```ignore
//! use offline_kit::observability::ProxyMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl ProxyMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("proxy_cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! // let executor = StrategyExecutor::new(store, network, config)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Default behavior (if not overridden) logs via the `log` crate.
//! `NoOpMetrics` silences everything.

use crate::classify::ResourceClass;
use std::time::Duration;

/// Trait for proxy metrics collection.
pub trait ProxyMetrics: Send + Sync {
    /// Record a cache hit served without touching the network.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Proxy HIT: {} took {:?}", key, duration);
    }

    /// Record a response served fresh from the network.
    fn record_network(&self, key: &str, duration: Duration) {
        debug!("Proxy NETWORK: {} took {:?}", key, duration);
    }

    /// Record a synthesized offline fallback.
    fn record_offline_fallback(&self, key: &str, class: ResourceClass) {
        debug!("Proxy OFFLINE fallback: {} ({})", key, class);
    }

    /// Record a degraded operation (storage error swallowed as a miss).
    fn record_error(&self, key: &str, error: &str) {
        warn!("Proxy ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl ProxyMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_network(&self, _key: &str, _duration: Duration) {}
    fn record_offline_fallback(&self, _key: &str, _class: ResourceClass) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_hit("GET /a", Duration::from_millis(1));
        metrics.record_offline_fallback("GET /a", ResourceClass::Api);
    }
}
