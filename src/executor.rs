//! Strategy executor - resolves intercepted requests against cache and network.
//!
//! This is the dispatch point for every intercepted fetch: classify the
//! request, run the class's strategy, and always produce *some* response.
//! No error escapes to the caller - storage failures degrade to cache
//! misses and network failures degrade to stale entries or synthesized
//! offline responses.

use crate::classify::{classify, ResourceClass};
use crate::config::ProxyConfig;
use crate::http::{Method, Request, Response};
use crate::network::NetworkFetcher;
use crate::observability::{NoOpMetrics, ProxyMetrics};
use crate::serialization::{decode_snapshot, encode_snapshot};
use crate::store::CacheStore;
use crate::strategy::FetchStrategy;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Body of the synthesized API offline notice.
pub const OFFLINE_MESSAGE: &str = "You are offline. Some features may be limited.";

/// JSON payload returned for API requests that cannot be satisfied offline.
///
/// Field order is part of the wire contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OfflineNotice {
    pub success: bool,
    pub message: String,
    pub offline: bool,
}

impl OfflineNotice {
    pub fn new() -> Self {
        OfflineNotice {
            success: false,
            message: OFFLINE_MESSAGE.to_string(),
            offline: true,
        }
    }
}

impl Default for OfflineNotice {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesized 503 JSON response for API requests while offline.
pub fn offline_api_response() -> Response {
    // Struct serialization cannot fail; fall back to text just in case.
    Response::json(503, &OfflineNotice::new())
        .unwrap_or_else(|_| Response::text(503, OFFLINE_MESSAGE))
}

/// Synthesized 503 plain-text response for anything without a better fallback.
pub fn offline_generic_response() -> Response {
    Response::text(503, "This resource is unavailable offline.")
}

/// Core strategy executor.
///
/// Holds the cache store, the network fetcher, and the proxy configuration,
/// and resolves each request per its resource class:
///
/// - Static, Image → [`FetchStrategy::CacheFirst`]
/// - Api, Dynamic → [`FetchStrategy::NetworkFirst`]
///
/// # Example
///
/// ```ignore
/// use offline_kit::{ProxyConfig, StrategyExecutor};
/// use offline_kit::store::InMemoryStore;
///
/// let executor = StrategyExecutor::new(store, network, ProxyConfig::default());
/// let response = executor.handle_fetch(&request).await;
/// ```
pub struct StrategyExecutor<S: CacheStore, N: NetworkFetcher> {
    store: S,
    network: N,
    config: ProxyConfig,
    metrics: Box<dyn ProxyMetrics>,
}

impl<S: CacheStore, N: NetworkFetcher> StrategyExecutor<S, N> {
    /// Create a new executor with default (log-only) metrics.
    pub fn new(store: S, network: N, config: ProxyConfig) -> Self {
        StrategyExecutor {
            store,
            network,
            config,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set a custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn ProxyMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Resolve an intercepted request.
    ///
    /// Returns `None` for non-GET methods and non-HTTP(S) schemes - the
    /// proxy declines and the host falls through to default network
    /// handling. Otherwise always returns a response: real, cached, or
    /// synthesized. This method never fails.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        if request.method != Method::Get || !request.is_http() {
            debug!(
                "Declining {} {} (not an interceptable request)",
                request.method, request.url
            );
            return None;
        }

        let class = classify(request);
        let partition = class.partition_name(&self.config);
        debug!(
            "» Fetch {} (class: {}, strategy: {}, partition: {})",
            request.cache_key(),
            class,
            class.strategy(),
            partition
        );

        let response = match class.strategy() {
            FetchStrategy::CacheFirst => self.cache_first(request, class, &partition).await,
            FetchStrategy::NetworkFirst => self.network_first(request, class, &partition).await,
        };

        Some(response)
    }

    /// Cache-first: serve a stored entry if present; fetch, persist, and
    /// return otherwise. A network failure with no cached entry is terminal -
    /// the synthesized offline response is the answer, no retry.
    async fn cache_first(
        &self,
        request: &Request,
        class: ResourceClass,
        partition: &str,
    ) -> Response {
        let timer = Instant::now();
        let key = request.cache_key();

        if let Some(cached) = self.lookup(partition, &key).await {
            self.metrics.record_hit(&key, timer.elapsed());
            debug!("✓ Cache hit (CacheFirst) for {}", key);
            return cached;
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.persist(partition, &key, &response).await;
                }
                self.metrics.record_network(&key, timer.elapsed());
                response
            }
            Err(e) => {
                debug!("✗ Network failed for {} ({}), no cached entry", key, e);
                self.metrics.record_offline_fallback(&key, class);
                self.offline_fallback(request, class).await
            }
        }
    }

    /// Network-first: one network attempt; persist and return on success,
    /// fall back to a stale cached entry on failure, synthesize an offline
    /// response when both miss.
    async fn network_first(
        &self,
        request: &Request,
        class: ResourceClass,
        partition: &str,
    ) -> Response {
        let timer = Instant::now();
        let key = request.cache_key();

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.persist(partition, &key, &response).await;
                }
                self.metrics.record_network(&key, timer.elapsed());
                response
            }
            Err(e) => {
                debug!("✗ Network failed for {} ({}), trying cache", key, e);

                if let Some(cached) = self.lookup(partition, &key).await {
                    // Stale-but-available: no TTL check by design.
                    self.metrics.record_hit(&key, timer.elapsed());
                    return cached;
                }

                self.metrics.record_offline_fallback(&key, class);
                self.offline_fallback(request, class).await
            }
        }
    }

    /// Look up and decode a stored snapshot.
    ///
    /// Storage errors and corrupt envelopes are both treated as misses;
    /// corrupt entries are evicted so the next request refetches.
    async fn lookup(&self, partition: &str, key: &str) -> Option<Response> {
        let bytes = match self.store.get(partition, key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("Storage read failed for {}/{}: {}", partition, key, e);
                return None;
            }
        };

        match decode_snapshot(&bytes) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Evicting corrupt entry {}/{}: {}", partition, key, e);
                let _ = self.store.delete(partition, key).await;
                None
            }
        }
    }

    /// Persist a snapshot of a successful response.
    ///
    /// Callers must have checked `is_success()` - only 2xx responses are
    /// ever stored. A storage failure here is logged and swallowed: the
    /// caller still gets its response.
    async fn persist(&self, partition: &str, key: &str, response: &Response) {
        debug_assert!(response.is_success());

        let bytes = match encode_snapshot(response) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                warn!("Snapshot encode failed for {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.put(partition, key, bytes).await {
            self.metrics.record_error(key, &e.to_string());
            warn!("Storage write failed for {}/{}: {}", partition, key, e);
        }
    }

    /// Last-resort synthesized response when both network and cache miss.
    async fn offline_fallback(&self, request: &Request, class: ResourceClass) -> Response {
        match class {
            ResourceClass::Api => offline_api_response(),
            ResourceClass::Dynamic if request.is_navigation() => {
                let offline_key = format!("{} {}", Method::Get, self.config.offline_page);
                match self.lookup(&self.config.static_partition(), &offline_key).await {
                    Some(page) => page,
                    None => {
                        warn!("Offline page {} not pre-cached", self.config.offline_page);
                        offline_generic_response()
                    }
                }
            }
            _ => offline_generic_response(),
        }
    }

    /// Get a reference to the cache store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the network fetcher (for advanced use).
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Get a reference to the proxy configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
