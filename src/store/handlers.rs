//! Ordered registry of configuration change handlers.

use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::error;

/// A registered change callback.
pub(crate) type ChangeHandler<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Append-only list of change handlers.
///
/// Handlers live for the registry's lifetime; there is no unregistration.
/// Insertion order is the invocation order. Notification snapshots the list
/// before invoking, so a handler registered while a cycle is running is
/// deferred to the next cycle instead of racing into the current one.
pub(crate) struct HandlerRegistry<S> {
    handlers: RwLock<Vec<ChangeHandler<S>>>,
}

impl<S> HandlerRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, handler: ChangeHandler<S>) {
        self.handlers.write().push(handler);
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Invoke every handler registered at the start of the call, in order.
    ///
    /// Each handler runs inside its own panic boundary: a panicking handler
    /// is logged and the remaining handlers still run. The lock is released
    /// before the first invocation, so handlers may themselves register new
    /// handlers.
    pub(crate) fn notify_all(&self, store: &S) {
        let snapshot: Vec<ChangeHandler<S>> = self.handlers.read().clone();
        for (index, handler) in snapshot.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| handler(store))).is_err() {
                error!(handler = index, "configuration change handler panicked");
            }
        }
    }
}
