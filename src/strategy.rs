//! Fetch strategies for intercepted requests.
//!
//! Every resource class maps to exactly one of two strategies:
//!
//! | Strategy | Cache hit | Cache miss | Network failure |
//! |----------|-----------|-----------|-----------------|
//! | **CacheFirst** | Return stored entry, no network | Fetch, persist 2xx, return | Synthesized offline response |
//! | **NetworkFirst** | n/a (network tried first) | Fetch, persist 2xx, return | Stored entry if present, else synthesized offline response |
//!
//! Class mapping: Static and Image resources are cache-first (immutable app
//! shell); API and Dynamic resources are network-first (freshness wins when
//! the network is up). See [`ResourceClass::strategy`](crate::classify::ResourceClass::strategy).
//!
//! A response is only persisted if its status is 2xx. Partial, redirect, and
//! error responses are passed through to the caller but never stored. Only
//! one network attempt is made per request; retries belong to the caller.

/// Strategy controlling how a request is resolved against cache and network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Serve from cache if present; go to network only on miss.
    ///
    /// Guarantees minimal latency and zero data usage for hits.
    CacheFirst,

    /// Attempt network first; fall back to cache on network failure.
    ///
    /// Stale entries are served without a TTL check - staleness is
    /// governed solely by partition versioning.
    NetworkFirst,
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::CacheFirst => write!(f, "CacheFirst"),
            FetchStrategy::NetworkFirst => write!(f, "NetworkFirst"),
        }
    }
}
