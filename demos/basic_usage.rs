//! Basic usage example of the offline cache proxy.
//!
//! Walks the full worker lifecycle against a fake network: install the app
//! shell, activate, then resolve a few requests per resource class.

use offline_kit::network::InMemoryNetwork;
use offline_kit::store::InMemoryStore;
use offline_kit::{OfflineProxy, ProxyConfig, Request, Response, Result};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // A fake origin server with a handful of routes
    let network = InMemoryNetwork::new();
    network.route("/", Response::html(200, "<html>stock analytics shell</html>"));
    network.route("/offline.html", Response::html(200, "<h1>You're offline</h1>"));
    network.route("/static/app.js", Response::text(200, "console.log('app')"));
    network.route(
        "/api/market/data",
        Response::json(200, &serde_json::json!({"price": 100}))?,
    );

    let config = ProxyConfig::new("v1.0.0")
        .with_manifest(vec!["/", "/offline.html", "/static/app.js"]);
    let proxy = OfflineProxy::new(InMemoryStore::new(), network.clone(), config)?;

    println!("=== Lifecycle ===");
    proxy.handle_install().await?;
    println!("  installed, phase: {}", proxy.phase());
    let purged = proxy.handle_activate().await?;
    println!("  activated, purged {} stale partitions", purged.len());

    println!("\n=== Online fetches ===");
    for url in ["/static/app.js", "/api/market/data", "/portfolio"] {
        if let Some(response) = proxy.handle_fetch(&Request::get(url)).await {
            println!("  GET {} -> {} ({} bytes)", url, response.status, response.body.len());
        }
    }

    println!("\n=== Network drops ===");
    network.set_online(false);
    for url in ["/static/app.js", "/api/market/data", "/api/never-seen"] {
        if let Some(response) = proxy.handle_fetch(&Request::get(url)).await {
            println!("  GET {} -> {}: {}", url, response.status, response.body_text());
        }
    }

    Ok(())
}
