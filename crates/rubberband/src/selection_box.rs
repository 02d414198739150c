//! Selection rectangle construction.
//!
//! The rectangle spans the drag's start and current points, grown by
//! [`BOUNDARY_MARGIN`] towards the top-left so the pointer stays inside the
//! drawn rectangle instead of on its edge. The confined policy additionally
//! keeps the rectangle inside the container.

use crate::geometry::{Point, Rect, Size};

/// Extra space added on the top and left of every selection rectangle.
pub const BOUNDARY_MARGIN: f32 = 1.0;

/// How the selection rectangle relates to the container bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Confinement {
    /// The rectangle follows the pointer anywhere, even outside the container.
    #[default]
    Free,
    /// The rectangle is clamped to a container of this size, whose top-left
    /// corner is the origin of selection space.
    Container(Size),
}

/// Build the selection rectangle for a drag from `start` to `current`.
///
/// # Example
///
/// ```
/// use rubberband::{build_box, Confinement, Point, Rect};
///
/// let rect = build_box(Point::new(100.0, 400.0), Point::new(-400.0, -100.0), Confinement::Free);
/// assert_eq!(rect, Rect::new(-401.0, -101.0, 501.0, 501.0));
/// ```
pub fn build_box(start: Point, current: Point, confinement: Confinement) -> Rect {
    match confinement {
        Confinement::Free => Rect::new(
            start.x.min(current.x) - BOUNDARY_MARGIN,
            start.y.min(current.y) - BOUNDARY_MARGIN,
            (start.x - current.x).abs() + BOUNDARY_MARGIN,
            (start.y - current.y).abs() + BOUNDARY_MARGIN,
        ),
        Confinement::Container(size) => {
            let (left, width) = confine_axis(start.x, current.x, size.width);
            let (top, height) = confine_axis(start.y, current.y, size.height);
            Rect::new(
                left - BOUNDARY_MARGIN,
                top - BOUNDARY_MARGIN,
                width + BOUNDARY_MARGIN,
                height + BOUNDARY_MARGIN,
            )
        }
    }
}

/// Clamp one axis of a drag to `[0, extent]`, returning `(origin, length)`
/// before the margin is applied.
///
/// Dragging forward may cover at most the distance from the start to the far
/// edge; dragging backward at most the distance from the start to zero.
fn confine_axis(start: f32, current: f32, extent: f32) -> (f32, f32) {
    let extent = extent.max(0.0);
    let distance = (start - current).abs();
    let reach = if start < current {
        extent - start
    } else {
        start
    };
    let origin = start.min(current).clamp(0.0, extent);
    let length = distance.min(reach).max(0.0);
    (origin, length)
}
