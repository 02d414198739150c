//! Collision engine.
//!
//! Resolves each candidate element to a rectangle in selection space, tests
//! it against the selection rectangle, and tracks which index set was last
//! published so observers only hear about real changes.

use std::sync::Arc;

use rubberband_core::logging::{span_names, targets};
use rubberband_core::{NotifyStrategy, Property, ReadOnlyProperty, Signal};
use rubberband_style::ElementId;

use crate::geometry::{Point, Rect, Size, intersects};
use crate::host::Host;
use crate::normalize::{Offset, ScrollPosition, Zoom, normalize};

/// Everything needed to map host coordinates into selection space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateSpace {
    /// The container's document position.
    pub offset: Offset,
    /// Document scroll at the time of the query.
    pub scroll: ScrollPosition,
    /// Zoom divisor.
    pub zoom: Zoom,
}

impl CoordinateSpace {
    /// Create a coordinate space.
    pub fn new(offset: Offset, scroll: ScrollPosition, zoom: Zoom) -> Self {
        Self {
            offset,
            scroll,
            zoom,
        }
    }

    /// Map a page coordinate into selection space.
    #[inline]
    pub fn normalize(&self, page: Point) -> Point {
        normalize(page, self.offset, self.zoom)
    }

    /// Map a candidate's viewport rectangle into selection space.
    ///
    /// The position is shifted into document space, made container-relative
    /// and divided by zoom. The size is the element's unscaled layout size
    /// when known, else the rendered size divided by zoom.
    pub fn candidate_box(&self, rendered: Rect, layout_size: Option<Size>) -> Rect {
        let zoom = self.zoom.get();
        let size = layout_size.unwrap_or_else(|| rendered.size().scale_down(zoom));
        Rect::new(
            (rendered.left - self.offset.left + self.scroll.x) / zoom,
            (rendered.top - self.offset.top + self.scroll.y) / zoom,
            size.width,
            size.height,
        )
    }

    /// The box of one element in selection space, if the host can place it.
    pub fn element_box<H: Host + ?Sized>(&self, host: &H, element: ElementId) -> Option<Rect> {
        let rendered = host.element_rect(element)?;
        Some(self.candidate_box(rendered, host.client_size(element)))
    }
}

/// Indices of the candidates intersecting `selection`, in ascending order.
///
/// Absent handles and elements the host cannot place are skipped.
pub fn colliding_indices<H: Host + ?Sized>(
    selection: &Rect,
    candidates: &[Option<ElementId>],
    space: &CoordinateSpace,
    host: &H,
) -> Vec<usize> {
    let _span = tracing::trace_span!(
        target: targets::COLLISION,
        span_names::COLLISION,
        candidates = candidates.len()
    )
    .entered();

    let mut skipped = 0usize;
    let hits: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, handle)| {
            let Some(candidate) = handle.and_then(|element| space.element_box(host, element))
            else {
                skipped += 1;
                return None;
            };
            intersects(selection, &candidate).then_some(index)
        })
        .collect();

    tracing::trace!(
        target: targets::COLLISION,
        ?selection,
        hits = hits.len(),
        skipped,
        "collision pass"
    );
    hits
}

/// Publishes the highlighted index set, suppressing repeats.
pub struct HighlightTracker {
    published: Property<Vec<usize>>,
    changed: Arc<Signal<Vec<usize>>>,
}

impl Default for HighlightTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightTracker {
    /// Create a tracker with nothing highlighted.
    pub fn new() -> Self {
        Self {
            published: Property::default(),
            changed: Arc::new(Signal::new()),
        }
    }

    /// The signal notified with each new highlight set.
    pub fn changed(&self) -> &Signal<Vec<usize>> {
        &self.changed
    }

    /// The last published highlight set.
    pub fn published(&self) -> ReadOnlyProperty<'_, Vec<usize>> {
        ReadOnlyProperty::new(&self.published)
    }

    /// Publish `next` if it differs from the last published set.
    ///
    /// Order matters: `[0, 2]` and `[2, 0]` are different sets here. Returns
    /// `true` if a notification was issued.
    pub fn publish(&self, next: Vec<usize>, strategy: &NotifyStrategy) -> bool {
        if !self.published.set(next.clone()) {
            return false;
        }
        tracing::debug!(target: targets::COLLISION, highlighted = ?next, "highlight changed");
        strategy.notify(&self.changed, next);
        true
    }

    /// Publish the empty set, if anything is currently highlighted.
    pub fn clear(&self, strategy: &NotifyStrategy) -> bool {
        self.publish(Vec::new(), strategy)
    }
}

impl std::fmt::Debug for HighlightTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightTracker")
            .field("published", &self.published.get())
            .field("connections", &self.changed.connection_count())
            .finish()
    }
}
