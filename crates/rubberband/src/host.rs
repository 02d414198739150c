//! The layout and document capabilities a host supplies.

use rubberband_style::{ElementId, SelectorMatching};

use crate::geometry::{Rect, Size};
use crate::normalize::ScrollPosition;

/// What the selection machinery needs to know about the host document.
///
/// Geometry is queried on demand and never cached across events, so the
/// host always answers with the current layout.
pub trait Host: SelectorMatching {
    /// The element's current rendered rectangle, relative to the viewport.
    ///
    /// Returns `None` for elements that are not laid out (not attached,
    /// hidden, or unknown to the host).
    fn element_rect(&self, element: ElementId) -> Option<Rect>;

    /// The element's unscaled layout size, if the host tracks one separately
    /// from the rendered rectangle.
    fn client_size(&self, element: ElementId) -> Option<Size> {
        let _ = element;
        None
    }

    /// The current document scroll position.
    fn scroll(&self) -> ScrollPosition {
        ScrollPosition::default()
    }
}
