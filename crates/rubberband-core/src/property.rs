//! Change-tracked properties.
//!
//! A [`Property`] wraps a value and reports whether an assignment actually
//! changed it. The selection machine keeps its last published highlight in
//! one, so a notification is only emitted when the intersecting set differs
//! from what observers already saw.
//!
//! # Example
//!
//! ```
//! use rubberband_core::{Property, Signal};
//!
//! struct Highlight {
//!     indices: Property<Vec<usize>>,
//!     changed: Signal<Vec<usize>>,
//! }
//!
//! impl Highlight {
//!     fn publish(&self, next: Vec<usize>) {
//!         if self.indices.set(next.clone()) {
//!             self.changed.emit(next);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value with change detection.
///
/// Assignments go through [`set`](Self::set), which compares against the
/// stored value. Interior mutability lets a shared `&Property` be updated
/// from any thread that can see it.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Wrap an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the stored value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the stored value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without comparing.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`; `true` if it differs from the previous one.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Store `value` and hand back the previous one, if they differ.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// Borrowed, getter-only access to a [`Property`].
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    /// View `property` without the ability to set it.
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    /// A clone of the stored value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Borrow the stored value for the duration of `f`.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}
