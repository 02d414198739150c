//! Geometry primitives for selection hit-testing.
//!
//! All values live in one coordinate space at a time: either page space
//! (raw pointer coordinates and host-reported rectangles) or selection space
//! (container-local, zoom-corrected). The types do not record which; the
//! normalizer and collision engine are responsible for converting.

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Divide both dimensions by `factor`.
    #[inline]
    pub fn scale_down(self, factor: f32) -> Self {
        Self {
            width: self.width / factor,
            height: self.height / factor,
        }
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
///
/// Width and height are expected to be non-negative; every constructor in
/// this crate upholds that.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// The bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// The top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// The size of the rectangle.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle is empty (zero or negative size).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// The x and y extents of the rectangle.
    #[inline]
    pub fn projection(&self) -> Projection {
        Projection {
            x: Span::new(self.left, self.right()),
            y: Span::new(self.top, self.bottom()),
        }
    }

    /// Whether this rectangle touches or overlaps `other`.
    ///
    /// See [`intersects`].
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// A closed 1-D interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    /// Create a new interval.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// A rectangle projected onto both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub x: Span,
    pub y: Span,
}

/// Whether two closed intervals share at least one point.
#[inline]
pub fn segments_overlap(a: Span, b: Span) -> bool {
    a.max >= b.min && b.max >= a.min
}

/// Whether two rectangles intersect.
///
/// Two rectangles intersect when their projections overlap on both axes.
/// Edges are inclusive, so rectangles that merely touch intersect. The test
/// is exact and symmetric.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    let pa = a.projection();
    let pb = b.projection();
    segments_overlap(pa.x, pb.x) && segments_overlap(pa.y, pb.y)
}
