//! Traits a host implements to mount a `FilterScroller`.
//!
//! `Surface` stands in for the two anchors the widget reads and writes (the
//! scrolling container and the handle). `Environment` provides the viewport
//! width, global signal subscriptions and deferred retries.

use std::time::Duration;

use crate::signal::{InstanceId, Signal, TimerId};

/// Rendered extents of the anchors, in host units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurements {
    /// Width of the content inside the container.
    pub content_width: i32,
    /// Visible (client) width of the container.
    pub container_width: i32,
    /// Width of the track the handle moves along.
    pub track_width: i32,
}

impl Measurements {
    pub fn new(content_width: i32, container_width: i32, track_width: i32) -> Self {
        Self {
            content_width,
            container_width,
            track_width,
        }
    }

    /// Whether every extent has been laid out.
    pub fn is_measurable(&self) -> bool {
        self.content_width > 0 && self.container_width > 0 && self.track_width > 0
    }
}

/// Positioning style written to the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleStyle {
    pub left: i32,
    pub width: i32,
}

/// The container and handle anchors.
pub trait Surface {
    /// Current extents, or `None` while either anchor is not mounted.
    fn measure(&self) -> Option<Measurements>;

    /// Horizontal scroll offset of the container.
    fn scroll_left(&self) -> i32;

    /// Set the container's scroll offset. Hosts clamp to their own extent.
    fn set_scroll_left(&mut self, offset: i32);

    /// Current left offset of the handle, if mounted.
    fn handle_left(&self) -> Option<i32>;

    /// Write the handle's left offset and width.
    fn set_handle_style(&mut self, style: HandleStyle);
}

/// Viewport, signals and timers.
pub trait Environment {
    /// Width of the whole viewport, used to pick a breakpoint.
    fn viewport_width(&self) -> u32;

    fn subscribe(&mut self, instance: InstanceId, signal: Signal);

    fn unsubscribe(&mut self, instance: InstanceId, signal: Signal);

    /// Schedule a one-shot retry for `instance` after `delay`.
    fn schedule_retry(&mut self, instance: InstanceId, delay: Duration) -> TimerId;

    fn cancel_retry(&mut self, timer: TimerId);

    /// Whether the host emits `Signal::LayoutReady` once anchors are measurable.
    fn supports_layout_notifications(&self) -> bool {
        false
    }
}

/// Everything a widget instance needs from its host.
pub trait Host: Surface + Environment {}

impl<T: Surface + Environment> Host for T {}
