//! Offline fallback walkthrough.
//!
//! Shows the three synthesized offline payloads: the JSON API notice, the
//! pre-cached offline page for navigations, and the generic 503 - plus the
//! control-message protocol.

use offline_kit::network::InMemoryNetwork;
use offline_kit::store::InMemoryStore;
use offline_kit::{ProxyConfig, ProxyService, Request, Response, Result};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let network = InMemoryNetwork::new();
    network.route("/", Response::html(200, "<html>shell</html>"));
    network.route("/offline.html", Response::html(200, "<h1>Offline</h1><p>Check your connection.</p>"));

    let service = ProxyService::new(
        InMemoryStore::new(),
        network.clone(),
        ProxyConfig::default(),
    )?;
    service.handle_install().await?;
    service.handle_activate().await?;

    // Everything below happens with no connectivity at all
    network.set_online(false);

    println!("=== API request, nothing cached ===");
    let api = service
        .handle_fetch(&Request::get("/api/market/data"))
        .await
        .expect("intercepted");
    println!("  {} {}", api.status, api.body_text());

    println!("\n=== Page navigation, nothing cached ===");
    let nav = service
        .handle_fetch(&Request::navigate("/some/deep/route"))
        .await
        .expect("intercepted");
    println!("  {} {}", nav.status, nav.body_text());

    println!("\n=== Subresource, nothing cached ===");
    let sub = service
        .handle_fetch(&Request::get("/fragment.txt"))
        .await
        .expect("intercepted");
    println!("  {} {}", sub.status, sub.body_text());

    println!("\n=== Control messages ===");
    if let Some(reply) = service.handle_raw_message(r#"{"type":"GET_VERSION"}"#) {
        println!("  GET_VERSION -> {}", serde_json::to_string(&reply)?);
    }
    // Malformed messages are ignored silently
    assert!(service.handle_raw_message("garbage").is_none());

    println!("\n=== Push notification ===");
    let notification = service.handle_push(Some("ACME up 5% today"));
    println!("  {}: {}", notification.title, notification.body);
    for action in &notification.actions {
        println!(
            "    [{}] -> {}",
            action.title,
            service.handle_notification_click(&action.action)
        );
    }

    Ok(())
}
