//! The configuration store: a typed document slot plus its handler list.

use crate::codec::{self, DocumentFormat};
use crate::error::{ConfigError, Result};
use crate::store::handlers::HandlerRegistry;
use arc_swap::ArcSwap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

struct StoreInner<T> {
    /// The current document; swapped whole, never mutated in place.
    document: ArcSwap<T>,
    handlers: HandlerRegistry<ConfigStore<T>>,
    path: PathBuf,
    format: DocumentFormat,
}

/// A configuration store bound to one file on disk.
///
/// Holds the decoded document behind an [`ArcSwap`] so reads are lock-free
/// and updates are atomic: a reader always observes either the previous or
/// the new document, never a partially constructed one.
///
/// The store is cheap to clone; clones share the same document and handler
/// list.
///
/// # Examples
///
/// ```rust,no_run
/// use liveconfig::prelude::*;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Deserialize, Serialize, Clone)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// # fn example() -> Result<()> {
/// let store = ConfigStore::<AppConfig>::load("config.yaml")?;
/// println!("port: {}", store.get().port);
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> std::fmt::Debug for ConfigStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.inner.path)
            .field("format", &self.inner.format)
            .finish()
    }
}

impl<T> ConfigStore<T>
where
    T: DeserializeOwned + Serialize,
{
    /// Load a configuration file into a new store.
    ///
    /// The format is detected from the file extension (`.yaml`/`.yml`,
    /// `.toml`, `.json`). The returned store holds the decoded document and
    /// an empty handler list.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if the path does not exist (checked
    ///   before the read is attempted)
    /// - [`ConfigError::UnsupportedFormat`] for an unknown extension
    /// - [`ConfigError::Io`] if reading fails for any other reason
    /// - [`ConfigError::Decode`] if the content does not decode into `T`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let format = DocumentFormat::from_path(&path)?;

        info!(path = %path.display(), "parsing configuration file");
        let document = read_document(&path, format)?;

        Ok(Self {
            inner: Arc::new(StoreInner {
                document: ArcSwap::new(Arc::new(document)),
                handlers: HandlerRegistry::new(),
                path,
                format,
            }),
        })
    }

    /// Get a reference-counted snapshot of the current document.
    ///
    /// Lock-free; readers never wait on an in-progress reload beyond the
    /// atomic pointer swap itself.
    pub fn get(&self) -> Arc<T> {
        self.inner.document.load_full()
    }

    /// The path this store was loaded from.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Register a handler to be invoked after every applied change.
    ///
    /// Handlers are appended: invocation order is registration order, and
    /// later handlers may rely on side effects of earlier ones. There is no
    /// unregistration; handlers live as long as the store.
    ///
    /// Safe to call before or after watching starts. A handler registered
    /// while a notification cycle is executing is not invoked for that
    /// cycle but is present for all subsequent ones.
    pub fn register_handler<F>(&self, handler: F)
    where
        F: Fn(&ConfigStore<T>) + Send + Sync + 'static,
    {
        self.inner.handlers.register(Arc::new(handler));
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.len()
    }

    /// Re-read the file and apply it if the content changed.
    ///
    /// The currently held document is canonically re-encoded as the
    /// comparison baseline, the file is decoded into a fresh document, and
    /// the two encodings are compared byte for byte. Equal encodings mean
    /// no user-visible change (a no-op rewrite, a metadata-only touch) and
    /// the cycle ends silently. Different encodings swap the store's
    /// document atomically and invoke every registered handler in order.
    ///
    /// Returns whether a change was applied.
    ///
    /// # Errors
    ///
    /// Read, decode, and encode failures leave the held document untouched;
    /// no handlers fire.
    pub fn reload(&self) -> Result<bool> {
        let previous = codec::canonical_bytes(self.get().as_ref())?;

        let document = read_document(&self.inner.path, self.inner.format)?;
        let current = codec::canonical_bytes(&document)?;

        if previous == current {
            return Ok(false);
        }

        self.replace(document);
        info!(path = %self.inner.path.display(), "configuration reloaded");
        self.notify();

        Ok(true)
    }

    /// Replace the document programmatically and notify handlers.
    ///
    /// Bypasses the file entirely; useful for tests and runtime overrides.
    /// Note that a subsequent file change is still diffed against this
    /// value, not against the file content it replaced.
    pub fn update(&self, document: T) {
        self.replace(document);
        self.notify();
    }

    /// Atomically swap the held document.
    pub(crate) fn replace(&self, document: T) {
        self.inner.document.store(Arc::new(document));
    }

    /// Invoke every registered handler in order, passing this store.
    pub(crate) fn notify(&self) {
        self.inner.handlers.notify_all(self);
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn read_document<T: DeserializeOwned>(path: &Path, format: DocumentFormat) -> Result<T> {
    let bytes = fs::read(path)?;
    codec::decode(&bytes, format)
}
