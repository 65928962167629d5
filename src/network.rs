//! Network fetcher trait for abstracting the host's fetch facility.
//!
//! The `NetworkFetcher` trait decouples the proxy from any specific HTTP
//! client: the host adapter (a real service-worker shim, an HTTP client, or
//! a test double) supplies the implementation. The proxy makes exactly one
//! network attempt per request, with no artificial timeout and no retry.
//!
//! # The two-copy contract
//!
//! A fetcher returns a fully buffered [`Response`]. Because the snapshot is
//! owned and cloneable, the executor can persist one copy and hand the caller
//! another - there is no hidden single-consumption body anywhere.

use crate::error::{Error, Result};
use crate::http::{Request, Response};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for performing network fetches on behalf of the proxy.
///
/// **IMPORTANT:** A rejected fetch (`Err(Error::NetworkError)`) means the
/// network itself failed (DNS, connection refused, timeout). HTTP error
/// statuses are *not* fetch failures - return `Ok(response)` and let the
/// strategy executor decide what to persist.
#[allow(async_fn_in_trait)]
pub trait NetworkFetcher: Send + Sync + Clone {
    /// Perform a single network fetch for the request.
    ///
    /// # Errors
    /// Returns `Err(Error::NetworkError)` if the fetch is rejected at the
    /// network level.
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

// ============================================================================
// In-Memory Test Network
// ============================================================================

/// Simple in-memory network for testing proxy behavior.
///
/// Provides a mock `NetworkFetcher` with a URL→response route table, an
/// online/offline switch, and a fetch counter, so tests can control exactly
/// what the "network" serves and assert how often it was reached.
///
/// # Testing Different Scenarios
///
/// - **Cache population**: route a URL, fetch once, then assert the store
/// - **Offline fallback**: call [`set_online(false)`](InMemoryNetwork::set_online)
///   and every fetch rejects with `Error::NetworkError`
/// - **Network-first freshness**: update a route between fetches and assert
///   the second response is the new one
/// - **Unrouted URLs** respond with 404 (reachable host, missing resource)
#[derive(Clone)]
pub struct InMemoryNetwork {
    routes: Arc<DashMap<String, Response>>,
    online: Arc<AtomicBool>,
    fetch_count: Arc<AtomicU64>,
}

impl Default for InMemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNetwork {
    /// Create a new online network with no routes.
    pub fn new() -> Self {
        InMemoryNetwork {
            routes: Arc::new(DashMap::new()),
            online: Arc::new(AtomicBool::new(true)),
            fetch_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Route a URL to a fixed response.
    pub fn route(&self, url: impl Into<String>, response: Response) {
        self.routes.insert(url.into(), response);
    }

    /// Remove a route.
    pub fn unroute(&self, url: &str) {
        self.routes.remove(url);
    }

    /// Switch the network on or off. While offline every fetch rejects.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of fetches attempted so far (including rejected ones).
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl NetworkFetcher for InMemoryNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.online.load(Ordering::SeqCst) {
            debug!("✗ Network OFFLINE, rejecting fetch for {}", request.url);
            return Err(Error::NetworkError(format!(
                "network unreachable: {}",
                request.url
            )));
        }

        match self.routes.get(&request.url) {
            Some(response) => {
                debug!("✓ Network FETCH {} -> {}", request.url, response.status);
                Ok(response.clone())
            }
            None => {
                debug!("✓ Network FETCH {} -> 404 (unrouted)", request.url);
                Ok(Response::text(404, "not found"))
            }
        }
    }
}
