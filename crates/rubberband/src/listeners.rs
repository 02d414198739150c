//! Input listener registrations.
//!
//! A [`ListenerRegistry`] records which input events are currently being
//! listened for and where: on a specific target element, or on the whole
//! document. Hosts consult it to decide where to deliver events; the
//! selection machine uses it to prove it never holds stale or duplicate
//! registrations.
//!
//! Registrations are owned by [`ListenerSet`] guards. Dropping or detaching
//! a set removes every registration it holds.

use std::sync::Arc;

use parking_lot::Mutex;
use rubberband_core::logging::targets;
use rubberband_style::ElementId;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies one listener registration.
    pub struct ListenerId;
}

/// The input events a listener can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// On one element; receives events delivered to it.
    Target(ElementId),
    /// On the document; receives events from anywhere.
    Document,
}

/// A single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub scope: ListenerScope,
    pub kind: EventKind,
}

/// Shared table of live listener registrations.
///
/// Cloning the registry yields another handle to the same table.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<SlotMap<ListenerId, Registration>>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn attach(&self, scope: ListenerScope, kind: EventKind) -> ListenerId {
        let id = self.inner.lock().insert(Registration { scope, kind });
        tracing::trace!(target: targets::LISTENER, ?id, ?scope, ?kind, "listener attached");
        id
    }

    /// Remove a registration. Returns `false` if it was not registered.
    pub fn detach(&self, id: ListenerId) -> bool {
        let removed = self.inner.lock().remove(id);
        if let Some(registration) = removed {
            tracing::trace!(
                target: targets::LISTENER,
                ?id,
                scope = ?registration.scope,
                kind = ?registration.kind,
                "listener detached"
            );
        }
        removed.is_some()
    }

    /// Whether a registration is live.
    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.inner.lock().contains_key(id)
    }

    /// Number of live registrations for `kind` in `scope`.
    pub fn count(&self, scope: ListenerScope, kind: EventKind) -> usize {
        self.inner
            .lock()
            .values()
            .filter(|r| r.scope == scope && r.kind == kind)
            .count()
    }

    /// Whether anyone listens for `kind` in `scope`.
    pub fn is_listening(&self, scope: ListenerScope, kind: EventKind) -> bool {
        self.count(scope, kind) > 0
    }

    /// Total number of live registrations.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

/// A group of registrations that live and die together.
#[derive(Debug)]
pub struct ListenerSet {
    registry: ListenerRegistry,
    entries: Vec<(ListenerId, Registration)>,
}

impl ListenerSet {
    /// Register `kinds` in `scope` as one set.
    pub fn attach(registry: &ListenerRegistry, scope: ListenerScope, kinds: &[EventKind]) -> Self {
        let entries = kinds
            .iter()
            .map(|&kind| (registry.attach(scope, kind), Registration { scope, kind }))
            .collect();
        Self {
            registry: registry.clone(),
            entries,
        }
    }

    /// Whether this set holds a live registration for `kind` in `scope`.
    pub fn covers(&self, scope: ListenerScope, kind: EventKind) -> bool {
        self.entries.iter().any(|(id, registration)| {
            registration.scope == scope
                && registration.kind == kind
                && self.registry.is_attached(*id)
        })
    }

    /// Whether this set holds a live registration for `kind` in any scope.
    pub fn covers_kind(&self, kind: EventKind) -> bool {
        self.entries
            .iter()
            .any(|(id, registration)| registration.kind == kind && self.registry.is_attached(*id))
    }

    /// The ids of the registrations in this set.
    pub fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Remove every registration now instead of on drop.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        for (id, _) in self.entries.drain(..) {
            self.registry.detach(id);
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.release();
    }
}

static_assertions::assert_impl_all!(ListenerRegistry: Send, Sync);
static_assertions::assert_impl_all!(ListenerSet: Send, Sync);
