//! Rubberband - drag-to-select rectangle selection.
//!
//! This is the main crate. It re-exports the core notification machinery
//! and the selector engine, and provides the selection itself:
//!
//! - [`DragSelection`]: the press → drag → release state machine
//! - [`build_box`]: the selection rectangle, free or confined to the container
//! - [`colliding_indices`]: which candidates the rectangle touches
//! - [`Host`]: the layout and document queries a host answers
//! - [`Scene`]: an in-memory host for tests and headless use
//!
//! # Example
//!
//! ```
//! use rubberband::prelude::*;
//!
//! let mut scene = Scene::new();
//! let surface = scene.insert(ElementData::new("div"), None, Rect::new(0.0, 0.0, 500.0, 500.0));
//! let cards: Vec<_> = (0..3)
//!     .map(|i| {
//!         let left = i as f32 * 100.0;
//!         scene.insert(ElementData::new("div"), Some(surface), Rect::new(left, 0.0, 50.0, 50.0))
//!     })
//!     .collect();
//!
//! let mut selection = DragSelection::new(ListenerRegistry::new());
//! selection.start(SelectionConfig::new(surface, cards), &scene);
//!
//! let mut events: Vec<InputEvent> = vec![
//!     MousePressEvent::new(MouseButton::Left, Point::new(10.0, 10.0), surface).into(),
//!     MouseMoveEvent::new(Point::new(120.0, 20.0)).into(),
//! ];
//! for event in &mut events {
//!     selection.handle_event(event, &scene);
//! }
//! assert_eq!(selection.highlighted().get(), vec![0, 1]);
//! ```

pub use rubberband_core::*;

/// Element identity and selector matching.
pub mod style {
    pub use rubberband_style::*;
}

pub mod collision;
pub mod config;
pub mod geometry;
pub mod host;
pub mod input;
pub mod listeners;
pub mod machine;
pub mod normalize;
pub mod scene;
pub mod selection_box;

pub use collision::{CoordinateSpace, HighlightTracker, colliding_indices};
pub use config::{ResolvedOptions, SelectionConfig, SelectionOptions};
pub use geometry::{Point, Projection, Rect, Size, Span, intersects, segments_overlap};
pub use host::Host;
pub use input::{
    EventBase, InputEvent, InputSource, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent, TouchEndEvent, TouchMoveEvent, TouchPoint, TouchStartEvent,
};
pub use listeners::{EventKind, ListenerId, ListenerRegistry, ListenerScope, ListenerSet, Registration};
pub use machine::{DragSelection, DragSnapshot, InteractionState, PressRejection};
pub use normalize::{Offset, ScrollPosition, Zoom, compute_offset, normalize};
pub use scene::Scene;
pub use selection_box::{BOUNDARY_MARGIN, Confinement, build_box};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{SelectionConfig, SelectionOptions};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::host::Host;
    pub use crate::input::{
        InputEvent, MouseButton, MouseMoveEvent, MousePressEvent, MouseReleaseEvent,
        TouchEndEvent, TouchMoveEvent, TouchPoint, TouchStartEvent,
    };
    pub use crate::listeners::ListenerRegistry;
    pub use crate::machine::{DragSelection, PressRejection};
    pub use crate::normalize::Offset;
    pub use crate::scene::Scene;
    pub use rubberband_core::{NotifyStrategy, SharedFrameQueue, Signal};
    pub use rubberband_style::{ElementData, ElementId, SelectorMatching};
}
