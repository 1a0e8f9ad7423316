//! # liveconfig
//!
//! Hot-reloading configuration store with lock-free reads and ordered
//! change notifications.
//!
//! ## Overview
//!
//! `liveconfig` loads a YAML, TOML, or JSON configuration file into a typed
//! value and keeps it available behind a lock-free handle. Optionally, a
//! background watch session monitors the file on disk: when its *content*
//! changes, the held value is atomically swapped for a freshly decoded one
//! and every registered handler is invoked, in registration order.
//!
//! Change detection is content-based, not event-based. Each reload compares
//! a canonical re-encoding of the current document against the freshly
//! decoded one, so no-op rewrites, metadata touches, and formatting-only
//! edits never trigger a notification. A malformed edit is logged and
//! ignored; the last good document stays in effect.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use liveconfig::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Deserialize, Serialize, Clone)]
//! struct AppConfig {
//!     port: u16,
//!     host: String,
//! }
//!
//! # fn example() -> liveconfig::error::Result<()> {
//! let store = ConfigStore::<AppConfig>::load("config.yaml")?;
//!
//! // Lock-free read
//! let cfg = store.get();
//! println!("listening on {}:{}", cfg.host, cfg.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Watching for changes
//!
//! ```rust,no_run
//! use liveconfig::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Deserialize, Serialize, Clone)]
//! struct AppConfig {
//!     port: u16,
//! }
//!
//! # async fn example() -> liveconfig::error::Result<()> {
//! let store = ConfigStore::<AppConfig>::load("config.yaml")?;
//!
//! store.register_handler(|store: &ConfigStore<AppConfig>| {
//!     println!("config changed, port is now {}", store.get().port);
//! });
//!
//! let session = store.watch()?;
//!
//! // ... run the application ...
//!
//! // Clean shutdown: close the subscription and wait for the loop to exit.
//! session.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Atomic swaps**: readers observe the fully-old or fully-new document,
//!   never a partial one.
//! - **Ordered notification**: handlers run synchronously in registration
//!   order; a handler registered while a cycle is in flight is deferred to
//!   the next cycle.
//! - **Fault containment**: a panicking handler is logged and the remaining
//!   handlers still run; no reload-path failure ever propagates out of the
//!   watch loop.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod codec;
pub mod error;
pub mod store;
pub mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::error::{ConfigError, Result};
    pub use crate::store::ConfigStore;
    pub use crate::watch::WatchSession;
}
