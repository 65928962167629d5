//! High-level proxy service for host adapters.
//!
//! Provides a convenient wrapper around [`OfflineProxy`] with `Arc` for easy
//! sharing across concurrently dispatched events.

use crate::error::Result;
use crate::http::{Request, Response};
use crate::lifecycle::{
    ControlMessage, MessageReply, Notification, NoOpOutbox, OfflineProxy, OutboxQueue, WorkerPhase,
};
use crate::network::NetworkFetcher;
use crate::store::CacheStore;
use std::sync::Arc;

/// Clone-able handle over an [`OfflineProxy`].
///
/// The host may dispatch many fetch events concurrently; since every proxy
/// handler takes `&self` and the store uses interior mutability, the proxy
/// can be wrapped in a plain `Arc` with no extra locking.
///
/// # Example
///
/// ```ignore
/// use offline_kit::{ProxyConfig, ProxyService};
/// use offline_kit::store::InMemoryStore;
///
/// let service = ProxyService::new(store, network, ProxyConfig::default())?;
///
/// // Cheap clone per dispatched event
/// let handle = service.clone();
/// tokio::spawn(async move {
///     let _ = handle.handle_fetch(&request).await;
/// });
/// ```
pub struct ProxyService<S: CacheStore, N: NetworkFetcher, O: OutboxQueue = NoOpOutbox> {
    proxy: Arc<OfflineProxy<S, N, O>>,
}

impl<S: CacheStore, N: NetworkFetcher, O: OutboxQueue> Clone for ProxyService<S, N, O> {
    fn clone(&self) -> Self {
        ProxyService {
            proxy: Arc::clone(&self.proxy),
        }
    }
}

impl<S: CacheStore, N: NetworkFetcher> ProxyService<S, N, NoOpOutbox> {
    /// Create a service with the default (no-op) outbox.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the configuration is invalid.
    pub fn new(store: S, network: N, config: crate::config::ProxyConfig) -> Result<Self> {
        Ok(ProxyService {
            proxy: Arc::new(OfflineProxy::new(store, network, config)?),
        })
    }
}

impl<S: CacheStore, N: NetworkFetcher, O: OutboxQueue> ProxyService<S, N, O> {
    /// Wrap an already-built proxy.
    pub fn from_proxy(proxy: OfflineProxy<S, N, O>) -> Self {
        ProxyService {
            proxy: Arc::new(proxy),
        }
    }

    /// See [`OfflineProxy::handle_install`].
    ///
    /// # Errors
    /// Propagates install failures; the worker must not activate on error.
    pub async fn handle_install(&self) -> Result<()> {
        self.proxy.handle_install().await
    }

    /// See [`OfflineProxy::handle_activate`].
    ///
    /// # Errors
    /// Propagates storage-level enumeration/deletion failures.
    pub async fn handle_activate(&self) -> Result<Vec<String>> {
        self.proxy.handle_activate().await
    }

    /// See [`OfflineProxy::handle_fetch`].
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        self.proxy.handle_fetch(request).await
    }

    /// See [`OfflineProxy::handle_message`].
    pub fn handle_message(&self, message: ControlMessage) -> Option<MessageReply> {
        self.proxy.handle_message(message)
    }

    /// See [`OfflineProxy::handle_raw_message`].
    pub fn handle_raw_message(&self, raw: &str) -> Option<MessageReply> {
        self.proxy.handle_raw_message(raw)
    }

    /// See [`OfflineProxy::handle_push`].
    pub fn handle_push(&self, payload: Option<&str>) -> Notification {
        self.proxy.handle_push(payload)
    }

    /// See [`OfflineProxy::handle_notification_click`].
    pub fn handle_notification_click(&self, action: &str) -> &'static str {
        self.proxy.handle_notification_click(action)
    }

    /// See [`OfflineProxy::handle_sync`].
    ///
    /// # Errors
    /// Propagates outbox flush failures.
    pub async fn handle_sync(&self, tag: &str) -> Result<usize> {
        self.proxy.handle_sync(tag).await
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> WorkerPhase {
        self.proxy.phase()
    }

    /// Get a reference to the underlying proxy.
    pub fn proxy(&self) -> &OfflineProxy<S, N, O> {
        &self.proxy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::network::InMemoryNetwork;
    use crate::store::InMemoryStore;

    fn service() -> ProxyService<InMemoryStore, InMemoryNetwork> {
        let network = InMemoryNetwork::new();
        network.route("/", Response::html(200, "<html>shell</html>"));
        network.route("/offline.html", Response::html(200, "<h1>offline</h1>"));
        ProxyService::new(InMemoryStore::new(), network, ProxyConfig::default())
            .expect("Failed to build service")
    }

    #[tokio::test]
    async fn test_service_lifecycle() {
        let svc = service();
        svc.handle_install().await.expect("Install should succeed");
        svc.handle_activate().await.expect("Activate should succeed");
        assert_eq!(svc.phase(), WorkerPhase::Activated);
    }

    #[test]
    fn test_service_clone_shares_proxy() {
        let svc1 = service();
        let svc2 = svc1.clone();
        assert!(Arc::ptr_eq(&svc1.proxy, &svc2.proxy));
    }

    #[tokio::test]
    async fn test_service_concurrent_fetches() {
        let svc = service();
        svc.handle_install().await.expect("Install should succeed");

        let network = svc.proxy().executor().network().clone();
        for i in 0..5 {
            network.route(
                format!("/api/item/{}", i),
                Response::text(200, &format!("item-{}", i)),
            );
        }

        let mut handles = vec![];
        for i in 0..5 {
            let handle_svc = svc.clone();
            let handle = tokio::spawn(async move {
                let req = Request::get(format!("/api/item/{}", i));
                let resp = handle_svc
                    .handle_fetch(&req)
                    .await
                    .expect("Should respond");
                assert_eq!(resp.body_text(), format!("item-{}", i));
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.expect("Task failed");
        }
    }
}
