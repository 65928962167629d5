//! # offline-kit
//!
//! An offline-capable request caching proxy: a miniature edge cache that sits
//! between an application and the network, intercepting GET requests and
//! answering them from versioned cache partitions, the live network, or
//! synthesized offline fallbacks.
//!
//! ## Features
//!
//! - **Partitioned Storage:** Named, versioned cache partitions (static,
//!   dynamic, API); bumping the version string is the cache-invalidation
//!   mechanism - activation purges everything else
//! - **Per-Class Strategies:** Requests are classified (static asset, API
//!   call, image, dynamic) and resolved cache-first or network-first
//! - **Offline Fallbacks:** End users never see a raw network error: they get
//!   normal content, stale-but-available cached content, or a synthesized
//!   offline response (JSON notice for APIs, pre-cached page for navigations)
//! - **Host Agnostic:** One entry function per lifecycle event (install,
//!   activate, fetch, message, push, sync); wire them to a real worker
//!   registration or call them directly in tests
//! - **Production Ready:** Built-in logging, metrics hooks, and error handling
//!
//! ## Quick Start
//!
//! ```ignore
//! use offline_kit::{OfflineProxy, ProxyConfig, Request};
//! use offline_kit::network::InMemoryNetwork;
//! use offline_kit::store::InMemoryStore;
//!
//! // 1. Configure partitions and the app-shell manifest
//! let config = ProxyConfig::new("v1.0.0")
//!     .with_manifest(vec!["/", "/offline.html", "/static/app.js"]);
//!
//! // 2. Wire the proxy to the host's storage and fetch facilities
//! let proxy = OfflineProxy::new(store, network, config)?;
//!
//! // 3. Drive the lifecycle from the host adapter
//! proxy.handle_install().await?;     // precache the app shell
//! proxy.handle_activate().await?;    // purge stale partitions
//!
//! // 4. Steady state: resolve intercepted requests
//! if let Some(response) = proxy.handle_fetch(&Request::get("/api/market/data")).await {
//!     // real, cached, or synthesized - never an error
//! }
//! ```
//!
//! ### Sharing across concurrent events
//!
//! Use [`ProxyService`] for a cheap clone-able handle:
//!
//! ```ignore
//! let service = ProxyService::new(store, network, config)?;
//! let handle = service.clone();  // Just an Arc increment
//! ```

#[macro_use]
extern crate log;

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod lifecycle;
pub mod network;
pub mod observability;
pub mod serialization;
pub mod service;
pub mod store;
pub mod strategy;

// Re-exports for convenience
pub use classify::{classify, ResourceClass};
pub use config::ProxyConfig;
pub use error::{Error, Result};
pub use executor::{offline_api_response, offline_generic_response, StrategyExecutor};
pub use http::{Method, Request, RequestMode, Response};
pub use lifecycle::{ControlMessage, MessageReply, Notification, OfflineProxy, WorkerPhase};
pub use network::NetworkFetcher;
pub use service::ProxyService;
pub use store::CacheStore;
pub use strategy::FetchStrategy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
