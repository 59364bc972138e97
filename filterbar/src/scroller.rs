//! The filter scrollbar widget.
//!
//! `FilterScroller` keeps a custom horizontal handle in step with the natural
//! scroll offset of a content container. The host calls `start` on mount,
//! `on_render` after each paint, routes element and global events to the
//! handlers, and calls `stop` on unmount.

use log::{debug, trace, warn};

use crate::config::Config;
use crate::drag::{DragController, DragInput, DragSession};
use crate::gate::InitializationGate;
use crate::geometry::{GeometryCalculator, GeometrySnapshot};
use crate::host::{HandleStyle, Host};
use crate::resize::ResizeListener;
use crate::signal::{GlobalEvent, InstanceId, TimerId};
use crate::sync::{ScrollProgress, content_offset_to_handle_left, drag_offset_to_content_offset};

/// Where the widget is in its mount lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct FilterScroller {
    id: InstanceId,
    lifecycle: Lifecycle,
    calculator: GeometryCalculator,
    geometry: Option<GeometrySnapshot>,
    geometry_revision: u64,
    gate: InitializationGate,
    resize: ResizeListener,
    drag: DragController,
    handle_left: i32,
    handle_visible: bool,
}

impl Default for FilterScroller {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl FilterScroller {
    pub fn new(config: Config) -> Self {
        let retry_delay = config.retry_delay();
        Self {
            id: InstanceId::new(),
            lifecycle: Lifecycle::Created,
            calculator: GeometryCalculator::new(config.breakpoints),
            geometry: None,
            geometry_revision: 0,
            gate: InitializationGate::new(config.readiness, retry_delay),
            resize: ResizeListener::new(),
            drag: DragController::new(),
            handle_left: 0,
            handle_visible: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn geometry(&self) -> Option<&GeometrySnapshot> {
        self.geometry.as_ref()
    }

    /// Incremented every time a new geometry snapshot replaces the old one.
    pub fn geometry_revision(&self) -> u64 {
        self.geometry_revision
    }

    /// Last handle left offset written to the surface.
    pub fn handle_left(&self) -> i32 {
        self.handle_left
    }

    /// Whether the handle is highlighted because a drag is in progress.
    pub fn handle_visible(&self) -> bool {
        self.handle_visible
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_initialized()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn gate(&self) -> &InitializationGate {
        &self.gate
    }

    pub fn resize_listener(&self) -> &ResizeListener {
        &self.resize
    }

    /// Scroll progress implied by the surface's current content offset.
    pub fn scroll_progress<H: Host + ?Sized>(&self, host: &H) -> ScrollProgress {
        match &self.geometry {
            Some(geometry) => ScrollProgress::from_content_offset(host.scroll_left(), geometry),
            None => ScrollProgress::START,
        }
    }

    fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Subscribe to the resize signal (and layout notifications when used).
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.is_running() {
            return;
        }
        self.resize.activate(self.id, host);
        self.gate.activate(self.id, host);
        self.lifecycle = Lifecycle::Running;
        debug!("{} started", self.id);
    }

    /// Release every subscription and pending retry. Safe to call repeatedly.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }
        self.resize.deactivate(self.id, host);
        self.gate.deactivate(self.id, host);
        self.end_drag(host);
        self.lifecycle = Lifecycle::Stopped;
        debug!("{} stopped", self.id);
    }

    /// Run the initialization gate. Call after every paint.
    pub fn on_render<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.is_running() || self.gate.is_initialized() {
            return;
        }

        if self.refresh_geometry(host) {
            self.position_handle(host);
            self.gate.complete(self.id, host);
        } else {
            self.gate.defer(self.id, host);
        }
    }

    /// A scheduled retry fired. Returns false if the timer was stale.
    pub fn on_retry<H: Host + ?Sized>(&mut self, timer: TimerId, host: &mut H) -> bool {
        if !self.gate.take_retry(timer) {
            trace!("{} ignoring stale retry {timer:?}", self.id);
            return false;
        }
        self.on_render(host);
        true
    }

    // -------------------------------------------------------------------------
    // Element events
    // -------------------------------------------------------------------------

    /// The container scrolled natively (wheel, trackpad, keyboard).
    pub fn on_scroll<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.is_running() {
            return;
        }
        self.position_handle(host);
    }

    pub fn on_pointer_down<H: Host + ?Sized>(&mut self, x: i32, host: &mut H) -> bool {
        self.begin_drag(DragInput::Pointer, x, host)
    }

    pub fn on_touch_start<H: Host + ?Sized>(&mut self, x: i32, host: &mut H) -> bool {
        self.begin_drag(DragInput::Touch, x, host)
    }

    // -------------------------------------------------------------------------
    // Global events
    // -------------------------------------------------------------------------

    /// Handle a global signal this instance subscribed to.
    pub fn handle_event<H: Host + ?Sized>(&mut self, event: GlobalEvent, host: &mut H) {
        if !self.is_running() {
            trace!("{} ignoring {event:?} while {:?}", self.id, self.lifecycle);
            return;
        }

        match event {
            GlobalEvent::Resize => self.on_resize(host),
            GlobalEvent::PointerMove { x } => self.drag_to(DragInput::Pointer, x, host),
            GlobalEvent::TouchMove { x } => self.drag_to(DragInput::Touch, x, host),
            GlobalEvent::PointerUp => self.release(DragInput::Pointer, host),
            GlobalEvent::TouchEnd => self.release(DragInput::Touch, host),
            GlobalEvent::LayoutReady => self.on_render(host),
        }
    }

    fn on_resize<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(geometry) = self.resize.recompute(&self.calculator, host) else {
            return;
        };
        self.replace_geometry(geometry);
        self.position_handle(host);
        // A successful measurement also satisfies a waiting gate.
        self.gate.complete(self.id, host);
    }

    // -------------------------------------------------------------------------
    // Dragging
    // -------------------------------------------------------------------------

    fn begin_drag<H: Host + ?Sized>(&mut self, input: DragInput, x: i32, host: &mut H) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(geometry) = self.geometry else {
            debug!("{} ignoring {input:?} press before initialization", self.id);
            return false;
        };

        let handle_left = host.handle_left().unwrap_or(self.handle_left);
        let content_offset = host.scroll_left();
        if !self
            .drag
            .begin(input, x, handle_left, content_offset, geometry.padding)
        {
            warn!("{} already dragging, ignoring {input:?} press", self.id);
            return false;
        }

        for signal in input.signals() {
            host.subscribe(self.id, signal);
        }
        self.handle_visible = true;
        debug!("{} drag started with {input:?} at x={x}, handle at {handle_left}", self.id);
        true
    }

    fn drag_to<H: Host + ?Sized>(&mut self, input: DragInput, x: i32, host: &mut H) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let Some(drag_offset) = self.drag.update(input, x, geometry.padding) else {
            return;
        };
        let Some(session) = self.drag.session() else {
            return;
        };

        // Back at the press point: restore the exact offset instead of the
        // pixel-snapped one.
        let content_offset = if drag_offset == session.start_offset(geometry.padding) {
            session.content_start_offset
        } else {
            drag_offset_to_content_offset(drag_offset, &geometry)
        };
        host.set_scroll_left(content_offset);
        // Derive the handle from the applied offset so both stay consistent.
        self.position_handle(host);
        trace!(
            "{} drag x={x} offset={drag_offset} content={content_offset} handle={}",
            self.id, self.handle_left
        );
    }

    fn release<H: Host + ?Sized>(&mut self, input: DragInput, host: &mut H) {
        if self.drag.session().is_some_and(|session| session.input == input) {
            self.end_drag(host);
        }
    }

    fn end_drag<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(session) = self.drag.end() {
            for signal in session.input.signals() {
                host.unsubscribe(self.id, signal);
            }
            debug!("{} drag ended at offset {}", self.id, session.drag_offset);
        }
        self.handle_visible = false;
    }

    // -------------------------------------------------------------------------
    // Geometry and positioning
    // -------------------------------------------------------------------------

    fn refresh_geometry<H: Host + ?Sized>(&mut self, host: &H) -> bool {
        match self.calculator.recompute(host, host.viewport_width()) {
            Some(geometry) => {
                self.replace_geometry(geometry);
                true
            }
            None => false,
        }
    }

    fn replace_geometry(&mut self, geometry: GeometrySnapshot) {
        self.geometry = Some(geometry);
        self.geometry_revision += 1;
    }

    /// Place the handle from the surface's current content offset.
    fn position_handle<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let left = content_offset_to_handle_left(host.scroll_left(), &geometry);
        host.set_handle_style(HandleStyle {
            left,
            width: geometry.handle_width,
        });
        self.handle_left = left;
    }
}
