//! Demo of the change-handler system.
//!
//! Run with: cargo run --example handlers
//!
//! Shows ordered handler invocation, programmatic updates, and the panic
//! boundary around each handler.

use liveconfig::prelude::*;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Deserialize, Serialize, Clone)]
struct AppConfig {
    port: u16,
    feature_flags: FeatureFlags,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
struct FeatureFlags {
    new_ui: bool,
    beta_features: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Change Handler Demo ===\n");

    let dir = TempDir::new()?;
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"port": 8080, "feature_flags": {"new_ui": false, "beta_features": false}}"#,
    )?;

    let store = ConfigStore::<AppConfig>::load(&config_path)?;

    println!("Registering handlers...\n");

    store.register_handler(|store: &ConfigStore<AppConfig>| {
        println!("[Handler 1] port is now {}", store.get().port);
    });

    store.register_handler(|store: &ConfigStore<AppConfig>| {
        let flags = &store.get().feature_flags;
        println!(
            "[Handler 2] new_ui={} beta_features={}",
            flags.new_ui, flags.beta_features
        );
    });

    // A misbehaving handler: its panic is contained and logged, and the
    // handlers after it still run.
    store.register_handler(|_| panic!("this handler always fails"));

    store.register_handler(|_| {
        println!("[Handler 4] still invoked after the panicking handler");
    });

    println!("Applying update 1 (port change)...");
    store.update(AppConfig {
        port: 9090,
        feature_flags: FeatureFlags {
            new_ui: false,
            beta_features: false,
        },
    });

    println!("\nApplying update 2 (flag rollout)...");
    store.update(AppConfig {
        port: 9090,
        feature_flags: FeatureFlags {
            new_ui: true,
            beta_features: true,
        },
    });

    println!("\n{} handlers registered.", store.handler_count());

    Ok(())
}
