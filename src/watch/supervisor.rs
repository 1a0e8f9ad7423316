//! Background monitoring of a configuration file.
//!
//! The watch loop subscribes to file-system notifications for the
//! *containing directory* of the watched file, because many editors replace
//! a file via a temporary file plus rename, which some notification
//! backends only report at the directory level. Events for sibling files
//! are filtered out by reconstructing the expected full path.

use crate::error::{ConfigError, Result};
use crate::store::ConfigStore;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Quiescence interval between a file-system event and the reload attempt.
///
/// Editors and deployment tools typically replace a file with several raw
/// operations (truncate, write, chmod, rename); reacting to the first one
/// risks reading a transiently empty or partially written file.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_secs(1);

/// Handle for one active monitoring session.
///
/// Dropping the session closes the file-system subscription; the background
/// task then drains its event channel and exits on its own. Use
/// [`WatchSession::stop`] to also wait for the task to finish, for a clean
/// process shutdown.
pub struct WatchSession {
    watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl WatchSession {
    /// Close the subscription and wait for the monitoring task to exit.
    ///
    /// If a reload cycle is in flight (including its debounce wait), it is
    /// processed to completion before the task exits.
    pub async fn stop(self) {
        drop(self.watcher);
        if let Err(error) = self.task.await {
            error!(error = %error, "configuration watch task failed");
        }
    }
}

impl<T> ConfigStore<T>
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    /// Start monitoring this store's file for changes.
    ///
    /// Spawns a background task (on the current Tokio runtime) that reloads
    /// the store and notifies handlers whenever the file's content changes,
    /// using the default [`RELOAD_DEBOUNCE`] quiescence interval.
    ///
    /// Starting a second session for the same store is not guarded against;
    /// two supervisors would race their swaps. Callers own that invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Subscription`] if the watcher cannot be
    /// created or the containing directory cannot be subscribed.
    pub fn watch(&self) -> Result<WatchSession> {
        self.watch_with_debounce(RELOAD_DEBOUNCE)
    }

    /// Same as [`ConfigStore::watch`] with a caller-chosen quiescence
    /// interval.
    pub fn watch_with_debounce(&self, debounce: Duration) -> Result<WatchSession> {
        let directory = watch_directory(self.path()).canonicalize()?;
        let file_name = self.path().file_name().ok_or_else(|| {
            ConfigError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "watched path has no file name",
            ))
        })?;
        let target = directory.join(file_name);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            // Runs on the notify backend thread; a send failure means the
            // loop is gone and there is nothing left to tell.
            let _ = event_tx.send(result);
        })?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        info!(
            directory = %directory.display(),
            file = %target.display(),
            "watching configuration directory",
        );

        let task = tokio::spawn(run_loop(self.clone(), event_rx, target, debounce));

        Ok(WatchSession { watcher, task })
    }
}

/// The directory whose notifications cover the watched file.
fn watch_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether an event concerns the watched file at all.
///
/// Directory-level subscriptions see create/modify/remove activity for
/// every sibling; anything whose path is not exactly the watched file is
/// noise, as are access-only events for the file itself.
fn event_matches(event: &Event, target: &Path) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|path| path == target)
}

async fn run_loop<T>(
    store: ConfigStore<T>,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    target: PathBuf,
    debounce: Duration,
) where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    while let Some(result) = events.recv().await {
        match result {
            Ok(event) if event_matches(&event, &target) => {}
            Ok(_) => continue,
            Err(error) => {
                // Backend hiccups are not fatal to the session; keep
                // waiting for further events.
                error!(error = %error, "configuration watch error");
                continue;
            }
        }

        // Fixed-delay settle window: further events never restart it.
        sleep(debounce).await;

        // One editor save usually arrives as a burst of raw events; fold
        // everything queued during the window into a single reload cycle.
        while let Ok(result) = events.try_recv() {
            if let Err(error) = result {
                error!(error = %error, "configuration watch error");
            }
        }

        match store.reload() {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %target.display(), "configuration content unchanged");
            }
            Err(error) => {
                error!(
                    path = %target.display(),
                    error = %error,
                    "failed to reload configuration, keeping previous document",
                );
            }
        }
    }

    debug!(path = %target.display(), "configuration watch stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn matches_activity_on_the_watched_file() {
        let target = Path::new("/etc/app/config.yaml");
        for kind in [
            EventKind::Create(CreateKind::File),
            EventKind::Modify(ModifyKind::Any),
            EventKind::Remove(RemoveKind::File),
        ] {
            assert!(event_matches(&event(kind, "/etc/app/config.yaml"), target));
        }
    }

    #[test]
    fn ignores_sibling_files() {
        let target = Path::new("/etc/app/config.yaml");
        let sibling = event(EventKind::Modify(ModifyKind::Any), "/etc/app/other.yaml");
        assert!(!event_matches(&sibling, target));
    }

    #[test]
    fn ignores_access_events() {
        let target = Path::new("/etc/app/config.yaml");
        let access = event(
            EventKind::Access(AccessKind::Any),
            "/etc/app/config.yaml",
        );
        assert!(!event_matches(&access, target));
    }

    #[test]
    fn watch_directory_falls_back_to_cwd() {
        assert_eq!(watch_directory(Path::new("config.yaml")), Path::new("."));
        assert_eq!(
            watch_directory(Path::new("/etc/app/config.yaml")),
            Path::new("/etc/app")
        );
    }
}
