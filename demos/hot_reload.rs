//! Demo of file watching and automatic hot reload.
//!
//! Run with: cargo run --example hot_reload
//!
//! While running, edit hot_reload_demo.yaml in the working directory to see
//! the store pick up changes. Rewriting the file with identical content
//! produces no notification.

use liveconfig::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Deserialize, Serialize, Clone)]
struct AppConfig {
    server: ServerConfig,
    database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
struct ServerConfig {
    port: u16,
    host: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
struct DatabaseConfig {
    url: String,
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Hot Reload Demo ===\n");

    // Create an initial config file if it doesn't exist
    let config_path = "hot_reload_demo.yaml";
    if !std::path::Path::new(config_path).exists() {
        std::fs::write(
            config_path,
            r#"server:
  port: 8080
  host: localhost

database:
  url: postgres://localhost/mydb
  max_connections: 10
"#,
        )?;
        println!("Created {}", config_path);
    }

    let store = ConfigStore::<AppConfig>::load(config_path)?;

    // Track the number of applied reloads
    let reload_count = Arc::new(AtomicUsize::new(0));
    let reload_count_clone = Arc::clone(&reload_count);

    store.register_handler(move |store: &ConfigStore<AppConfig>| {
        let count = reload_count_clone.fetch_add(1, Ordering::SeqCst) + 1;
        let cfg = store.get();
        println!(
            "\n[Change] reload #{}: server {}:{}, database {} (max connections: {})",
            count, cfg.server.host, cfg.server.port, cfg.database.url, cfg.database.max_connections
        );
    });

    let session = store.watch()?;
    println!("Watching: {}\n", config_path);

    let cfg = store.get();
    println!("Current configuration:");
    println!("  Server: {}:{}", cfg.server.host, cfg.server.port);
    println!(
        "  Database: {} (max connections: {})",
        cfg.database.url, cfg.database.max_connections
    );

    println!("\n===> Edit {} to see automatic reloads <===", config_path);
    println!("     Changes are applied about a second after the file settles.");
    println!("\nPress Ctrl+C to exit\n");

    tokio::signal::ctrl_c().await?;

    println!("\nShutting down watch session...");
    session.stop().await;
    println!(
        "Done ({} reload(s) applied).",
        reload_count.load(Ordering::SeqCst)
    );

    Ok(())
}
