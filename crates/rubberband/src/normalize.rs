//! Coordinate normalization.
//!
//! Pointer and touch events report page coordinates. Selection works in the
//! container's own frame, measured in logical (unzoomed) units:
//!
//! ```text
//! local = (page - offset) / zoom
//! ```
//!
//! where `offset` is the container's position in the document.

use rubberband_core::ConfigError;
use rubberband_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// The container's position in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub top: f32,
    pub left: f32,
}

impl Offset {
    /// Create a new offset.
    #[inline]
    pub const fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// No offset.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
    };
}

/// How far the document is scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub x: f32,
    pub y: f32,
}

impl ScrollPosition {
    /// Create a new scroll position.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A validated zoom divisor: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f32);

impl Zoom {
    /// No zoom.
    pub const IDENTITY: Self = Self(1.0);

    /// Validate a zoom factor.
    pub fn new(factor: f32) -> Result<Self, ConfigError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(ConfigError::InvalidZoom(factor))
        }
    }

    /// Validate a zoom factor, falling back to 1 for invalid input.
    pub fn clamped(factor: f32) -> Self {
        Self::new(factor).unwrap_or_else(|error| {
            tracing::warn!(target: targets::CONFIG, %error, "zoom clamped to 1");
            Self::IDENTITY
        })
    }

    /// The raw factor.
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<f32> for Zoom {
    type Error = ConfigError;

    fn try_from(factor: f32) -> Result<Self, Self::Error> {
        Self::new(factor)
    }
}

/// Convert a page coordinate into container-local, zoom-corrected space.
#[inline]
pub fn normalize(page: Point, offset: Offset, zoom: Zoom) -> Point {
    Point::new(
        (page.x - offset.left) / zoom.get(),
        (page.y - offset.top) / zoom.get(),
    )
}

/// Derive the container offset.
///
/// An explicit override always wins. Otherwise the container's
/// viewport-relative rectangle is shifted by the current scroll to give its
/// document position. Without either, the offset is zero.
pub fn compute_offset(
    override_offset: Option<Offset>,
    container: Option<Rect>,
    scroll: ScrollPosition,
) -> Offset {
    match (override_offset, container) {
        (Some(offset), _) => offset,
        (None, Some(rect)) => Offset::new(rect.top + scroll.y, rect.left + scroll.x),
        (None, None) => Offset::ZERO,
    }
}
