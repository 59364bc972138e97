//! Geometry snapshots for the content and the track.

use log::debug;

use crate::config::BreakpointTable;
use crate::host::{Measurements, Surface};

/// Extents derived from one measurement pass.
///
/// Snapshots are replaced wholesale on every recompute, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometrySnapshot {
    pub padding: i32,
    pub handle_width: i32,
    /// Content width including trailing padding.
    pub content_width: i32,
    /// Visible span of the container including padding on both sides.
    pub viewport_width: i32,
    /// Largest valid content scroll offset. Never negative.
    pub content_scrollable_range: i32,
    pub track_width: i32,
    /// Distance the handle can travel. Never negative.
    pub track_scrollable_range: i32,
}

impl GeometrySnapshot {
    /// Leftmost handle position.
    pub fn handle_min(&self) -> i32 {
        self.padding
    }

    /// Rightmost handle position.
    pub fn handle_max(&self) -> i32 {
        self.padding + self.track_scrollable_range
    }

    pub fn clamp_content_offset(&self, offset: i32) -> i32 {
        offset.clamp(0, self.content_scrollable_range)
    }

    pub fn clamp_handle_left(&self, left: i32) -> i32 {
        left.clamp(self.handle_min(), self.handle_max())
    }
}

/// Builds geometry snapshots from anchor measurements and the breakpoint table.
#[derive(Debug, Clone, Default)]
pub struct GeometryCalculator {
    breakpoints: BreakpointTable,
}

impl GeometryCalculator {
    pub fn new(breakpoints: BreakpointTable) -> Self {
        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    /// Measure the surface and derive a snapshot.
    ///
    /// Returns `None` when the anchors are not mounted or not laid out yet.
    pub fn recompute<S: Surface + ?Sized>(
        &self,
        surface: &S,
        viewport_width: u32,
    ) -> Option<GeometrySnapshot> {
        let measurements = surface.measure().filter(Measurements::is_measurable)?;
        Some(self.derive(measurements, viewport_width))
    }

    /// Derive a snapshot from known measurements.
    pub fn derive(&self, measurements: Measurements, viewport_width: u32) -> GeometrySnapshot {
        let preset = self.breakpoints.select(viewport_width);
        let padding = preset.padding;
        let handle_width = preset.handle_width;

        let content_width = measurements.content_width.saturating_add(padding);
        let viewport = measurements
            .container_width
            .saturating_add(padding.saturating_mul(2));
        let content_scrollable_range = content_width
            .saturating_sub(measurements.container_width)
            .max(0);
        let track_width = measurements.track_width;
        let track_scrollable_range = track_width.saturating_sub(handle_width).max(0);

        let snapshot = GeometrySnapshot {
            padding,
            handle_width,
            content_width,
            viewport_width: viewport,
            content_scrollable_range,
            track_width,
            track_scrollable_range,
        };
        debug!("Geometry for viewport {viewport_width}: {snapshot:?}");
        snapshot
    }
}
