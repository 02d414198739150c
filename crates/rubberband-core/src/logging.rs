//! Logging facilities for Rubberband.
//!
//! Rubberband uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("rubberband=debug")
//!         .init();
//! }
//! ```
//!
//! The constants in [`targets`] can be used in filter directives to narrow
//! output to one subsystem, e.g. `rubberband::collision=trace`.

/// Span names used throughout Rubberband for tracing.
pub mod span_names {
    /// One pointer/touch event handled by the selection machine.
    pub const INPUT: &str = "rubberband::input";
    /// Collision pass over the candidate list.
    pub const COLLISION: &str = "rubberband::collision";
    /// Frame queue processing.
    pub const FRAME: &str = "rubberband::frame";
}

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "rubberband_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rubberband_core::signal";
    /// Frame queue target.
    pub const FRAME: &str = "rubberband_core::frame";
    /// Interaction state machine target.
    pub const MACHINE: &str = "rubberband::machine";
    /// Collision engine target.
    pub const COLLISION: &str = "rubberband::collision";
    /// Listener registry target.
    pub const LISTENER: &str = "rubberband::listener";
    /// Configuration target.
    pub const CONFIG: &str = "rubberband::config";
}

/// A guard that keeps a timing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "rubberband::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level event with the core target.
#[macro_export]
macro_rules! rubberband_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "rubberband_core", $($arg)*)
    };
}

/// Debug-level event with the core target.
#[macro_export]
macro_rules! rubberband_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "rubberband_core", $($arg)*)
    };
}

/// Warn-level event with the core target.
#[macro_export]
macro_rules! rubberband_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "rubberband_core", $($arg)*)
    };
}
