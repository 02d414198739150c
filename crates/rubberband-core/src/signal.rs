//! Observer notification.
//!
//! The selection machine reports results through [`Signal`]s: one for the
//! final selection, one for the live highlight. Observers attach closures
//! with [`Signal::connect`] and get a [`ConnectionId`] back, or use
//! [`Signal::connect_scoped`] for a [`ConnectionGuard`] that detaches itself.
//!
//! Slots always run synchronously on the emitting thread. Deferring delivery
//! to the next paint boundary is the job of [`crate::NotifyStrategy`], which
//! decides *when* `emit` is called rather than changing how it dispatches.
//!
//! # Example
//!
//! ```
//! use rubberband_core::Signal;
//!
//! let selection_changed = Signal::<Vec<usize>>::new();
//!
//! let conn_id = selection_changed.connect(|indices| {
//!     println!("Selected: {:?}", indices);
//! });
//!
//! selection_changed.emit(vec![0, 3]);
//! selection_changed.disconnect(conn_id);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle for one connected slot, accepted by [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type ConnectionMap<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A list of slots invoked, in connection order, on every [`emit`](Self::emit).
///
/// Signals are `Send + Sync`; deferred notifications reach them through an
/// `Arc` held by the frame queue.
pub struct Signal<Args> {
    connections: Arc<ConnectionMap<Args>>,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// A signal nobody listens to yet.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Attach `slot`; it runs on every later emission until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connections.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Attach `slot` for as long as the returned guard lives.
    ///
    /// The guard only holds a weak reference to the connection table, so it
    /// may outlive the signal.
    ///
    /// # Example
    ///
    /// ```
    /// use rubberband_core::Signal;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let signal = Signal::<Vec<usize>>::new();
    /// let calls = Arc::new(AtomicUsize::new(0));
    /// {
    ///     let calls = calls.clone();
    ///     let _guard = signal.connect_scoped(move |_| {
    ///         calls.fetch_add(1, Ordering::SeqCst);
    ///     });
    ///     signal.emit(vec![1]);
    /// }
    /// signal.emit(vec![2]);
    /// assert_eq!(calls.load(Ordering::SeqCst), 1);
    /// ```
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Some(Arc::downgrade(&self.connections)),
            id,
        }
    }

    /// Detach a slot. `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Run every connected slot with `args`.
    ///
    /// Slots are snapshotted first, so a slot may connect or disconnect
    /// others; such changes apply from the next emission.
    #[tracing::instrument(skip_all, target = "rubberband_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");

        for slot in slots {
            slot(&args);
        }
    }
}

/// Keeps one connection alive; dropping it disconnects.
///
/// Returned by [`Signal::connect_scoped`]. [`disconnect`](Self::disconnect)
/// detaches early and reports whether anything was removed.
pub struct ConnectionGuard<Args> {
    connections: Option<Weak<ConnectionMap<Args>>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Disconnect now instead of on drop.
    ///
    /// Fails with [`SignalError::SignalDropped`] if the signal no longer
    /// exists, or [`SignalError::InvalidConnection`] if the slot was already
    /// removed through [`Signal::disconnect`].
    pub fn disconnect(mut self) -> Result<(), SignalError> {
        let connections = self
            .connections
            .take()
            .and_then(|weak| weak.upgrade())
            .ok_or(SignalError::SignalDropped)?;
        let removed = connections.lock().remove(self.id).is_some();
        if removed {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(connections) = self.connections.take().and_then(|weak| weak.upgrade()) {
            connections.lock().remove(self.id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<Vec<usize>>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<Vec<usize>>: Send, Sync);
