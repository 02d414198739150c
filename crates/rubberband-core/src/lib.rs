//! Core systems for Rubberband.
//!
//! This crate provides the foundation that the drag-selection machinery is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe observer notification
//! - **Property System**: Values with change detection, used to suppress
//!   redundant notifications
//! - **Frame Queue**: Work deferred to the next paint boundary
//! - **Notify Strategy**: Immediate vs. next-frame delivery of notifications
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use rubberband_core::Signal;
//!
//! let highlight_changed = Signal::<Vec<usize>>::new();
//!
//! let conn_id = highlight_changed.connect(|indices| {
//!     println!("Highlighted: {:?}", indices);
//! });
//!
//! highlight_changed.emit(vec![0, 2]);
//! highlight_changed.disconnect(conn_id);
//! ```
//!
//! # Deferred Notification Example
//!
//! ```
//! use std::sync::Arc;
//! use rubberband_core::{NotifyStrategy, SharedFrameQueue, Signal};
//!
//! let queue = SharedFrameQueue::new();
//! let strategy = NotifyStrategy::NextFrame(queue.clone());
//! let signal = Arc::new(Signal::<Vec<usize>>::new());
//!
//! strategy.notify(&signal, vec![1]);
//! assert_eq!(queue.pending_count(), 1);
//!
//! // At the host's paint boundary:
//! queue.process_all();
//! ```

mod error;
pub mod frame;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{ConfigError, Error, Result, SignalError};
pub use frame::{FrameQueue, FrameTaskId, NotifyStrategy, SharedFrameQueue};
pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
