//! Background file monitoring and reload supervision.

mod supervisor;

pub use supervisor::{RELOAD_DEBOUNCE, WatchSession};
