//! Conversion between content scroll offsets and handle positions.
//!
//! Both directions pass through the same scroll progress ratio. Integer
//! arithmetic keeps the floor exact, so a full drag lands on exactly the
//! end of the content range.

use crate::geometry::GeometrySnapshot;

/// Normalized scroll position in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub const START: Self = Self(0.0);
    pub const END: Self = Self(1.0);

    /// Clamp a raw ratio into range. NaN maps to zero.
    pub fn new(ratio: f64) -> Self {
        if ratio.is_nan() {
            return Self::START;
        }
        Self(ratio.clamp(0.0, 1.0))
    }

    /// `position / range`, or zero when the range is empty.
    pub fn from_ratio(position: i32, range: i32) -> Self {
        if range <= 0 {
            return Self::START;
        }
        Self::new(position as f64 / range as f64)
    }

    /// Progress implied by a content scroll offset.
    pub fn from_content_offset(offset: i32, geometry: &GeometrySnapshot) -> Self {
        Self::from_ratio(offset, geometry.content_scrollable_range)
    }

    /// Progress implied by a handle position.
    pub fn from_handle_left(left: i32, geometry: &GeometrySnapshot) -> Self {
        Self::from_ratio(left - geometry.padding, geometry.track_scrollable_range)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// `floor(position * scale / range)` with `position` clamped to `[0, range]`.
fn scale_floor(position: i32, range: i32, scale: i32) -> i32 {
    if range <= 0 || scale <= 0 {
        return 0;
    }
    let position = i64::from(position.clamp(0, range));
    (position * i64::from(scale)).div_euclid(i64::from(range)) as i32
}

/// Handle left offset for a content scroll offset.
///
/// The result is always within `[padding, padding + track_scrollable_range]`.
pub fn content_offset_to_handle_left(offset: i32, geometry: &GeometrySnapshot) -> i32 {
    geometry.padding
        + scale_floor(
            offset,
            geometry.content_scrollable_range,
            geometry.track_scrollable_range,
        )
}

/// Content scroll offset for a drag offset along the track.
///
/// The result is always within `[0, content_scrollable_range]`.
pub fn drag_offset_to_content_offset(drag_offset: i32, geometry: &GeometrySnapshot) -> i32 {
    scale_floor(
        drag_offset,
        geometry.track_scrollable_range,
        geometry.content_scrollable_range,
    )
}
