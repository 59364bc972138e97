//! Terminal implementation of the widget host.
//!
//! The content row is the container, the track row is the handle's rail.
//! Both are measured in cells. Anchors only become measurable once a frame
//! with content has been drawn.

use std::time::{Duration, Instant};

use filterbar::{
    BreakpointTable, Dispatcher, Environment, FilterScroller, GlobalEvent, HandleStyle,
    InstanceId, Measurements, Signal, Surface, TimerId,
};
use log::debug;

pub struct TerminalHost {
    pub dispatcher: Dispatcher,
    breakpoints: BreakpointTable,
    width: u16,
    content_width: i32,
    scroll_left: i32,
    handle: Option<HandleStyle>,
    painted: bool,
}

impl TerminalHost {
    pub fn new(width: u16, breakpoints: BreakpointTable) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            breakpoints,
            width,
            content_width: 0,
            scroll_left: 0,
            handle: None,
            painted: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn resize(&mut self, width: u16) {
        self.width = width;
        self.scroll_left = self.scroll_left.clamp(0, self.max_scroll());
    }

    /// Replace the content. Anchors are unmeasurable until the next paint.
    pub fn set_content_width(&mut self, width: i32) {
        if width != self.content_width {
            self.content_width = width;
            self.painted = false;
        }
    }

    /// Record that a frame was drawn. Returns true the first time content
    /// becomes measurable.
    pub fn mark_painted(&mut self) -> bool {
        if self.painted || self.content_width <= 0 {
            return false;
        }
        self.painted = true;
        debug!("Content painted, {} cells wide", self.content_width);
        true
    }

    /// Horizontal inset of the track: the current breakpoint padding.
    pub fn track_inset(&self) -> i32 {
        self.breakpoints.select(u32::from(self.width)).padding
    }

    pub fn track_width(&self) -> i32 {
        (i32::from(self.width) - 2 * self.track_inset()).max(0)
    }

    /// Furthest the content row can scroll, leaving room for trailing padding.
    ///
    /// Matches the geometry's content scrollable range.
    pub fn max_scroll(&self) -> i32 {
        (self.content_width + self.track_inset() - i32::from(self.width)).max(0)
    }

    /// Scroll natively. Returns true if the offset changed.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        let before = self.scroll_left;
        self.set_scroll_left(before + delta);
        self.scroll_left != before
    }

    pub fn handle(&self) -> Option<HandleStyle> {
        self.handle
    }

    /// Whether column `x` on the track row lies on the handle.
    pub fn hits_handle(&self, x: i32) -> bool {
        self.handle
            .is_some_and(|handle| x >= handle.left && x < handle.left + handle.width)
    }

    /// Deliver a global event to the scroller if it is subscribed.
    pub fn dispatch(&mut self, scroller: &mut FilterScroller, event: GlobalEvent) {
        let listeners = self.dispatcher.listeners(event.signal());
        if listeners.contains(&scroller.id()) {
            scroller.handle_event(event, self);
        }
    }

    /// Fire every retry due now.
    pub fn fire_due_retries(&mut self, scroller: &mut FilterScroller, now: Instant) {
        for (timer, instance) in self.dispatcher.take_due(now) {
            if instance == scroller.id() {
                scroller.on_retry(timer, self);
            }
        }
    }
}

impl Surface for TerminalHost {
    fn measure(&self) -> Option<Measurements> {
        if !self.painted {
            return None;
        }
        Some(Measurements::new(
            self.content_width,
            i32::from(self.width),
            self.track_width(),
        ))
    }

    fn scroll_left(&self) -> i32 {
        self.scroll_left
    }

    fn set_scroll_left(&mut self, offset: i32) {
        self.scroll_left = offset.clamp(0, self.max_scroll());
    }

    fn handle_left(&self) -> Option<i32> {
        self.handle.map(|handle| handle.left)
    }

    fn set_handle_style(&mut self, style: HandleStyle) {
        self.handle = Some(style);
    }
}

impl Environment for TerminalHost {
    fn viewport_width(&self) -> u32 {
        u32::from(self.width)
    }

    fn subscribe(&mut self, instance: InstanceId, signal: Signal) {
        self.dispatcher.subscribe(instance, signal);
    }

    fn unsubscribe(&mut self, instance: InstanceId, signal: Signal) {
        self.dispatcher.unsubscribe(instance, signal);
    }

    fn schedule_retry(&mut self, instance: InstanceId, delay: Duration) -> TimerId {
        self.dispatcher.schedule(instance, Instant::now(), delay)
    }

    fn cancel_retry(&mut self, timer: TimerId) {
        self.dispatcher.cancel(timer);
    }

    fn supports_layout_notifications(&self) -> bool {
        true
    }
}
