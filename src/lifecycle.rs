//! Worker lifecycle and notification handling.
//!
//! [`OfflineProxy`] is an explicit event router: one entry function per
//! lifecycle event (install, activate, fetch, message, push, sync), called
//! by whatever host adapter is in use - a real worker registration shim in
//! production, direct function calls in tests. Nothing here reads ambient
//! globals; the configuration travels as an explicit value object.

use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use crate::executor::StrategyExecutor;
use crate::http::{Request, Response};
use crate::network::NetworkFetcher;
use crate::observability::ProxyMetrics;
use crate::serialization::encode_snapshot;
use crate::store::CacheStore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Notification action identifier that opens the in-app markets route.
pub const ACTION_EXPLORE: &str = "explore";

/// Notification action identifier that dismisses the notification.
pub const ACTION_CLOSE: &str = "close";

/// Route opened by the explore action.
pub const EXPLORE_ROUTE: &str = "/markets";

/// Default notification body when the push payload is empty.
pub const DEFAULT_PUSH_BODY: &str = "New market data is available.";

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Created but install has not completed.
    Installing,
    /// Install finished; waiting to take over (or skipping the wait).
    Installed,
    /// Activation in progress.
    Activating,
    /// In control of all clients; steady state.
    Activated,
    /// Superseded by a newer version.
    Redundant,
}

impl std::fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerPhase::Installing => write!(f, "Installing"),
            WorkerPhase::Installed => write!(f, "Installed"),
            WorkerPhase::Activating => write!(f, "Activating"),
            WorkerPhase::Activated => write!(f, "Activated"),
            WorkerPhase::Redundant => write!(f, "Redundant"),
        }
    }
}

/// Control message from the host to the worker.
///
/// Wire format is a JSON object with a `type` discriminator. Anything that
/// does not parse into one of these variants is silently ignored - the
/// protocol requires no acknowledgment of malformed messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Force immediate activation instead of waiting for clients to close.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Query the current cache version.
    #[serde(rename = "GET_VERSION")]
    GetVersion,
}

impl ControlMessage {
    /// Parse a control message from its JSON wire form.
    ///
    /// Returns `None` for malformed or unknown messages.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Reply sent back on the message channel.
///
/// Untagged on the wire: a version reply serializes as
/// `{"version":"static-v1.0.0"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageReply {
    /// Reply to [`ControlMessage::GetVersion`]: the current cache name.
    Version { version: String },
}

/// A user notification built from a push payload.
///
/// The proxy only builds the value; displaying it is the host's job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub actions: Vec<NotificationAction>,
}

/// An action button on a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Queue of deferred offline mutations, flushed when connectivity returns.
///
/// The proxy does not prescribe a payload schema; implementers bring a
/// durable outbox of whatever their pending writes look like. The shipped
/// [`NoOpOutbox`] holds nothing and always succeeds.
#[allow(async_fn_in_trait)]
pub trait OutboxQueue: Send + Sync {
    /// Flush pending actions. Returns how many were flushed.
    ///
    /// # Errors
    /// Returns `Err` if the flush fails; the host may re-dispatch the sync
    /// event later.
    async fn flush(&self) -> Result<usize>;
}

/// Default outbox: nothing queued, flush always succeeds.
#[derive(Clone, Default)]
pub struct NoOpOutbox;

impl OutboxQueue for NoOpOutbox {
    async fn flush(&self) -> Result<usize> {
        Ok(0)
    }
}

/// The offline cache proxy: lifecycle router over a [`StrategyExecutor`].
///
/// All handlers take `&self`; the phase lives behind interior mutability so
/// the proxy can be shared across concurrently dispatched events.
///
/// # Example
///
/// ```ignore
/// use offline_kit::{OfflineProxy, ProxyConfig};
///
/// let proxy = OfflineProxy::new(store, network, ProxyConfig::default())?;
/// proxy.handle_install().await?;
/// proxy.handle_activate().await?;
/// let response = proxy.handle_fetch(&request).await;
/// ```
pub struct OfflineProxy<S: CacheStore, N: NetworkFetcher, O: OutboxQueue = NoOpOutbox> {
    executor: StrategyExecutor<S, N>,
    phase: Arc<RwLock<WorkerPhase>>,
    skip_waiting: Arc<AtomicBool>,
    outbox: O,
}

impl<S: CacheStore, N: NetworkFetcher> OfflineProxy<S, N, NoOpOutbox> {
    /// Create a proxy with the default (no-op) outbox.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the configuration is invalid.
    pub fn new(store: S, network: N, config: ProxyConfig) -> Result<Self> {
        Self::with_outbox(store, network, config, NoOpOutbox)
    }
}

impl<S: CacheStore, N: NetworkFetcher, O: OutboxQueue> OfflineProxy<S, N, O> {
    /// Create a proxy with a custom deferred-action outbox.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the configuration is invalid.
    pub fn with_outbox(store: S, network: N, config: ProxyConfig, outbox: O) -> Result<Self> {
        config.validate()?;
        Ok(OfflineProxy {
            executor: StrategyExecutor::new(store, network, config),
            phase: Arc::new(RwLock::new(WorkerPhase::Installing)),
            skip_waiting: Arc::new(AtomicBool::new(false)),
            outbox,
        })
    }

    /// Set a custom metrics handler on the underlying executor.
    pub fn with_metrics(mut self, metrics: Box<dyn ProxyMetrics>) -> Self {
        self.executor = self.executor.with_metrics(metrics);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> WorkerPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: WorkerPhase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
        debug!("Worker phase -> {}", phase);
    }

    /// Whether immediate takeover was requested (by install completion or a
    /// SKIP_WAITING message). The host adapter checks this to decide whether
    /// to activate without waiting for clients to close.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// **install**: pre-populate the static partition with the app shell.
    ///
    /// Every manifest URL must fetch successfully or the whole install
    /// fails and the worker never activates. On success the worker signals
    /// readiness to supersede any waiting predecessor immediately - brief
    /// inconsistency is traded for faster rollout.
    ///
    /// # Errors
    /// - `Error::InstallError`: a manifest URL failed to fetch or returned
    ///   a non-success status
    /// - `Error::StorageError`: the host denied partition allocation
    pub async fn handle_install(&self) -> Result<()> {
        self.set_phase(WorkerPhase::Installing);
        let config = self.executor.config().clone();
        let partition = config.static_partition();

        info!(
            "Installing {} ({} manifest entries)",
            partition,
            config.precache_manifest.len()
        );
        self.executor.store().open_partition(&partition).await?;

        for url in &config.precache_manifest {
            let request = Request::get(url.clone());
            let response = self
                .executor
                .network()
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallError(format!("precache fetch {} failed: {}", url, e)))?;

            if !response.is_success() {
                return Err(Error::InstallError(format!(
                    "precache fetch {} returned status {}",
                    url, response.status
                )));
            }

            let bytes = encode_snapshot(&response)?;
            self.executor
                .store()
                .put(&partition, &request.cache_key(), bytes)
                .await?;
            debug!("✓ Precached {}", url);
        }

        self.set_phase(WorkerPhase::Installed);
        // Supersede the waiting predecessor immediately.
        self.skip_waiting.store(true, Ordering::SeqCst);
        info!("Install complete for {}", partition);
        Ok(())
    }

    /// **activate**: purge every partition not in the current version set,
    /// then claim all open clients immediately so the new version governs
    /// in-flight page loads without a reload.
    ///
    /// Returns the names of the purged partitions.
    ///
    /// # Errors
    /// Returns `Err` if partition enumeration or deletion fails at the
    /// storage level.
    pub async fn handle_activate(&self) -> Result<Vec<String>> {
        self.set_phase(WorkerPhase::Activating);
        let current = self.executor.config().current_partitions();

        let mut purged = Vec::new();
        for name in self.executor.store().list_partitions().await? {
            if !current.contains(&name) {
                self.executor.store().delete_partition(&name).await?;
                info!("Purged stale partition {}", name);
                purged.push(name);
            }
        }

        self.set_phase(WorkerPhase::Activated);
        info!("Activated {}; claiming clients", self.executor.config().version);
        Ok(purged)
    }

    /// **fetch**: resolve an intercepted request. `None` means the proxy
    /// declines (non-GET, non-HTTP) and the host falls through to default
    /// network handling. Never fails.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        self.executor.handle_fetch(request).await
    }

    /// **message**: handle a parsed control message. Returns the reply to
    /// send back on the message channel, if any.
    pub fn handle_message(&self, message: ControlMessage) -> Option<MessageReply> {
        match message {
            ControlMessage::SkipWaiting => {
                info!("SKIP_WAITING received; requesting immediate activation");
                self.skip_waiting.store(true, Ordering::SeqCst);
                None
            }
            ControlMessage::GetVersion => Some(MessageReply::Version {
                version: self.executor.config().static_partition(),
            }),
        }
    }

    /// **message** (raw wire form): parse and handle. Malformed messages
    /// are ignored silently.
    pub fn handle_raw_message(&self, raw: &str) -> Option<MessageReply> {
        match ControlMessage::parse(raw) {
            Some(message) => self.handle_message(message),
            None => {
                debug!("Ignoring malformed control message: {}", raw);
                None
            }
        }
    }

    /// **push**: build the notification for a push payload. An empty or
    /// missing payload gets the default body. Display is the host's job.
    pub fn handle_push(&self, payload: Option<&str>) -> Notification {
        let body = match payload {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => DEFAULT_PUSH_BODY.to_string(),
        };

        Notification {
            title: "Stock Analytics".to_string(),
            body,
            actions: vec![
                NotificationAction {
                    action: ACTION_EXPLORE.to_string(),
                    title: "Explore".to_string(),
                },
                NotificationAction {
                    action: ACTION_CLOSE.to_string(),
                    title: "Close".to_string(),
                },
            ],
        }
    }

    /// Resolve a notification click to the in-app route to open.
    ///
    /// `explore` opens the markets route; everything else (including the
    /// notification body itself) routes to the app root.
    pub fn handle_notification_click(&self, action: &str) -> &'static str {
        if action == ACTION_EXPLORE {
            EXPLORE_ROUTE
        } else {
            "/"
        }
    }

    /// **sync**: flush the deferred-action outbox now that connectivity is
    /// back. Returns how many queued actions were flushed.
    ///
    /// # Errors
    /// Returns `Err` if the outbox flush fails; the host may re-dispatch
    /// the sync event later.
    pub async fn handle_sync(&self, tag: &str) -> Result<usize> {
        debug!("Background sync dispatched (tag: {})", tag);
        let flushed = self.outbox.flush().await?;
        if flushed > 0 {
            info!("Flushed {} deferred actions for sync tag {}", flushed, tag);
        }
        Ok(flushed)
    }

    /// Get a reference to the underlying strategy executor.
    pub fn executor(&self) -> &StrategyExecutor<S, N> {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::InMemoryNetwork;
    use crate::store::InMemoryStore;

    fn proxy_with(
        config: ProxyConfig,
    ) -> OfflineProxy<InMemoryStore, InMemoryNetwork> {
        let network = InMemoryNetwork::new();
        network.route("/", Response::html(200, "<html>shell</html>"));
        network.route("/offline.html", Response::html(200, "<h1>offline</h1>"));
        OfflineProxy::new(InMemoryStore::new(), network, config).expect("Failed to build proxy")
    }

    fn proxy() -> OfflineProxy<InMemoryStore, InMemoryNetwork> {
        proxy_with(ProxyConfig::default())
    }

    #[tokio::test]
    async fn test_install_precaches_manifest() {
        let p = proxy();
        p.handle_install().await.expect("Install should succeed");

        assert_eq!(p.phase(), WorkerPhase::Installed);
        assert!(p.skip_waiting_requested());

        let store = p.executor().store();
        assert!(store
            .exists("static-v1.0.0", "GET /")
            .await
            .expect("Failed to check exists"));
        assert!(store
            .exists("static-v1.0.0", "GET /offline.html")
            .await
            .expect("Failed to check exists"));
    }

    #[tokio::test]
    async fn test_install_fails_on_unfetchable_manifest_entry() {
        let config = ProxyConfig::default().with_manifest(vec!["/", "/offline.html", "/missing"]);
        let p = proxy_with(config);
        // "/missing" is unrouted -> 404 -> install must fail

        let err = p.handle_install().await.expect_err("Install should fail");
        assert!(matches!(err, Error::InstallError(_)));
        assert_eq!(p.phase(), WorkerPhase::Installing);
    }

    #[tokio::test]
    async fn test_install_fails_while_offline() {
        let p = proxy();
        p.executor().network().set_online(false);

        let err = p.handle_install().await.expect_err("Install should fail");
        assert!(matches!(err, Error::InstallError(_)));
    }

    #[tokio::test]
    async fn test_activate_purges_only_stale_partitions() {
        let p = proxy();
        let store = p.executor().store();

        // Previous version's partitions plus an unrelated one
        store.open_partition("static-v0.9.0").await.expect("Failed to open");
        store.open_partition("api-v0.9.0").await.expect("Failed to open");
        store
            .put("static-v1.0.0", "GET /keep", vec![1])
            .await
            .expect("Failed to put");

        let mut purged = p.handle_activate().await.expect("Activate should succeed");
        purged.sort();
        assert_eq!(purged, vec!["api-v0.9.0", "static-v0.9.0"]);
        assert_eq!(p.phase(), WorkerPhase::Activated);

        // Current partition untouched, contents intact
        assert!(store
            .exists("static-v1.0.0", "GET /keep")
            .await
            .expect("Failed to check exists"));
    }

    #[tokio::test]
    async fn test_get_version_replies_with_static_partition_name() {
        let p = proxy();
        let reply = p.handle_message(ControlMessage::GetVersion);
        assert_eq!(
            reply,
            Some(MessageReply::Version {
                version: "static-v1.0.0".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_skip_waiting_message_sets_flag() {
        let p = proxy();
        assert!(!p.skip_waiting_requested());
        assert_eq!(p.handle_message(ControlMessage::SkipWaiting), None);
        assert!(p.skip_waiting_requested());
    }

    #[tokio::test]
    async fn test_raw_message_parsing() {
        let p = proxy();

        let reply = p.handle_raw_message(r#"{"type":"GET_VERSION"}"#);
        assert!(matches!(reply, Some(MessageReply::Version { .. })));

        // Malformed and unknown messages are ignored silently
        assert_eq!(p.handle_raw_message("not json"), None);
        assert_eq!(p.handle_raw_message(r#"{"type":"REBOOT"}"#), None);
        assert_eq!(p.handle_raw_message(r#"{"kind":"GET_VERSION"}"#), None);
    }

    #[tokio::test]
    async fn test_push_notification_defaults() {
        let p = proxy();

        let notification = p.handle_push(None);
        assert_eq!(notification.body, DEFAULT_PUSH_BODY);
        assert_eq!(notification.actions.len(), 2);
        assert_eq!(notification.actions[0].action, ACTION_EXPLORE);
        assert_eq!(notification.actions[1].action, ACTION_CLOSE);

        let custom = p.handle_push(Some("ACME up 5%"));
        assert_eq!(custom.body, "ACME up 5%");

        let empty = p.handle_push(Some(""));
        assert_eq!(empty.body, DEFAULT_PUSH_BODY);
    }

    #[tokio::test]
    async fn test_notification_click_routes() {
        let p = proxy();
        assert_eq!(p.handle_notification_click(ACTION_EXPLORE), EXPLORE_ROUTE);
        assert_eq!(p.handle_notification_click(ACTION_CLOSE), "/");
        assert_eq!(p.handle_notification_click("anything"), "/");
    }

    #[tokio::test]
    async fn test_sync_noop_outbox() {
        let p = proxy();
        let flushed = p
            .handle_sync("sync-portfolio")
            .await
            .expect("Sync should succeed");
        assert_eq!(flushed, 0);
    }

    #[tokio::test]
    async fn test_sync_custom_outbox() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Clone, Default)]
        struct CountingOutbox {
            pending: Arc<AtomicUsize>,
        }

        impl OutboxQueue for CountingOutbox {
            async fn flush(&self) -> Result<usize> {
                Ok(self.pending.swap(0, Ordering::SeqCst))
            }
        }

        let outbox = CountingOutbox::default();
        outbox.pending.store(3, Ordering::SeqCst);

        let p = OfflineProxy::with_outbox(
            InMemoryStore::new(),
            InMemoryNetwork::new(),
            ProxyConfig::default(),
            outbox.clone(),
        )
        .expect("Failed to build proxy");

        assert_eq!(
            p.handle_sync("sync-portfolio").await.expect("Sync should succeed"),
            3
        );
        assert_eq!(
            p.handle_sync("sync-portfolio").await.expect("Sync should succeed"),
            0
        );
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let result = OfflineProxy::new(
            InMemoryStore::new(),
            InMemoryNetwork::new(),
            ProxyConfig::new(""),
        );
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_control_message_round_trip() {
        let raw = serde_json::to_string(&ControlMessage::SkipWaiting).expect("Failed to encode");
        assert_eq!(raw, r#"{"type":"SKIP_WAITING"}"#);
        assert_eq!(
            ControlMessage::parse(&raw),
            Some(ControlMessage::SkipWaiting)
        );
    }
}
