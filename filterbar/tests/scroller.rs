use std::time::{Duration, Instant};

use filterbar::{
    Config, Dispatcher, Environment, FilterScroller, GlobalEvent, HandleStyle, InstanceId,
    Lifecycle, Measurements, Readiness, ScrollProgress, Signal, Surface, TimerId,
    content_offset_to_handle_left,
};

/// In-memory host with a manual clock.
struct MockHost {
    dispatcher: Dispatcher,
    now: Instant,
    viewport_width: u32,
    measurements: Option<Measurements>,
    scroll_left: i32,
    max_scroll: i32,
    handle: Option<HandleStyle>,
    notifications: bool,
    scheduled: Vec<Duration>,
}

impl MockHost {
    /// Anchors mounted: content 2000, container 800, track 900, viewport 900.
    ///
    /// With the default table this gives padding 40, handle 200, a content
    /// range of 1240 and a track range of 700.
    fn mounted() -> Self {
        Self {
            measurements: Some(Measurements::new(2000, 800, 900)),
            ..Self::unmounted()
        }
    }

    fn unmounted() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            now: Instant::now(),
            viewport_width: 900,
            measurements: None,
            scroll_left: 0,
            max_scroll: i32::MAX,
            handle: None,
            notifications: false,
            scheduled: Vec::new(),
        }
    }

    /// Move the clock forward and return the retries that fell due.
    fn advance(&mut self, by: Duration) -> Vec<(TimerId, InstanceId)> {
        self.now += by;
        self.dispatcher.take_due(self.now)
    }
}

impl Surface for MockHost {
    fn measure(&self) -> Option<Measurements> {
        self.measurements
    }

    fn scroll_left(&self) -> i32 {
        self.scroll_left
    }

    fn set_scroll_left(&mut self, offset: i32) {
        self.scroll_left = offset.clamp(0, self.max_scroll);
    }

    fn handle_left(&self) -> Option<i32> {
        self.handle.map(|style| style.left)
    }

    fn set_handle_style(&mut self, style: HandleStyle) {
        self.handle = Some(style);
    }
}

impl Environment for MockHost {
    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn subscribe(&mut self, instance: InstanceId, signal: Signal) {
        self.dispatcher.subscribe(instance, signal);
    }

    fn unsubscribe(&mut self, instance: InstanceId, signal: Signal) {
        self.dispatcher.unsubscribe(instance, signal);
    }

    fn schedule_retry(&mut self, instance: InstanceId, delay: Duration) -> TimerId {
        self.scheduled.push(delay);
        self.dispatcher.schedule(instance, self.now, delay)
    }

    fn cancel_retry(&mut self, timer: TimerId) {
        self.dispatcher.cancel(timer);
    }

    fn supports_layout_notifications(&self) -> bool {
        self.notifications
    }
}

/// Deliver a global event to every subscribed widget, like a host would.
fn emit(host: &mut MockHost, widgets: &mut [&mut FilterScroller], event: GlobalEvent) {
    for id in host.dispatcher.listeners(event.signal()) {
        if let Some(widget) = widgets.iter_mut().find(|w| w.id() == id) {
            widget.handle_event(event, host);
        }
    }
}

fn started(host: &mut MockHost) -> FilterScroller {
    let mut widget = FilterScroller::default();
    widget.start(host);
    widget.on_render(host);
    widget
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_initializes_on_first_render_when_mounted() {
    let mut host = MockHost::mounted();
    let widget = started(&mut host);

    assert!(widget.is_initialized());
    assert_eq!(widget.geometry_revision(), 1);
    assert_eq!(host.handle, Some(HandleStyle { left: 40, width: 200 }));
    assert!(host.scheduled.is_empty());
}

#[test]
fn test_initial_position_uses_existing_scroll_offset() {
    let mut host = MockHost::mounted();
    host.scroll_left = 620;
    let widget = started(&mut host);

    assert_eq!(widget.handle_left(), 390);
    assert_eq!(host.handle.unwrap().left, 390);
}

#[test]
fn test_retries_every_100ms_until_mounted() {
    let mut host = MockHost::unmounted();
    let mut widget = FilterScroller::new(Config::default().with_readiness(Readiness::Poll));
    widget.start(&mut host);
    widget.on_render(&mut host);

    assert!(!widget.is_initialized());
    assert_eq!(host.dispatcher.pending_retries(), 1);

    // Nothing fires before the delay.
    assert!(host.advance(Duration::from_millis(99)).is_empty());

    for _ in 0..3 {
        let due = host.advance(Duration::from_millis(1));
        assert_eq!(due.len(), 1);
        let (timer, instance) = due[0];
        assert_eq!(instance, widget.id());
        assert!(widget.on_retry(timer, &mut host));
        assert!(!widget.is_initialized());
        assert_eq!(host.dispatcher.pending_retries(), 1);
        assert!(host.advance(Duration::from_millis(99)).is_empty());
    }

    host.measurements = Some(Measurements::new(2000, 800, 900));
    let due = host.advance(Duration::from_millis(1));
    assert_eq!(due.len(), 1);
    assert!(widget.on_retry(due[0].0, &mut host));

    assert!(widget.is_initialized());
    assert_eq!(widget.geometry_revision(), 1);
    assert_eq!(host.dispatcher.pending_retries(), 0);
    assert_eq!(host.scheduled, vec![Duration::from_millis(100); 4]);

    // Later renders do not measure again.
    widget.on_render(&mut host);
    widget.on_render(&mut host);
    assert_eq!(widget.geometry_revision(), 1);
}

#[test]
fn test_falls_back_to_polling_without_notifications() {
    let mut host = MockHost::unmounted();
    host.notifications = false;
    let widget = started(&mut host);

    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::LayoutReady));
    assert_eq!(host.dispatcher.pending_retries(), 1);
}

#[test]
fn test_keeps_single_pending_retry() {
    let mut host = MockHost::unmounted();
    let mut widget = started(&mut host);
    widget.on_render(&mut host);
    widget.on_render(&mut host);

    assert_eq!(host.dispatcher.pending_retries(), 1);
    assert_eq!(widget.gate().deferrals(), 3);
}

#[test]
fn test_stale_retry_is_ignored() {
    let mut host = MockHost::unmounted();
    let mut widget = started(&mut host);

    assert!(!widget.on_retry(TimerId::new(999), &mut host));
    assert_eq!(host.dispatcher.pending_retries(), 1);
}

#[test]
fn test_layout_notification_replaces_polling() {
    let mut host = MockHost::unmounted();
    host.notifications = true;
    let mut widget = started(&mut host);

    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::LayoutReady));
    assert_eq!(host.dispatcher.pending_retries(), 0);
    assert!(host.scheduled.is_empty());

    host.measurements = Some(Measurements::new(2000, 800, 900));
    emit(&mut host, &mut [&mut widget], GlobalEvent::LayoutReady);

    assert!(widget.is_initialized());
    assert_eq!(widget.geometry_revision(), 1);
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::LayoutReady));
}

#[test]
fn test_stop_cancels_pending_retry() {
    let mut host = MockHost::unmounted();
    let mut widget = started(&mut host);
    assert_eq!(host.dispatcher.pending_retries(), 1);

    widget.stop(&mut host);

    assert_eq!(host.dispatcher.pending_retries(), 0);
    assert_eq!(host.dispatcher.subscription_count(widget.id()), 0);
    assert!(host.advance(Duration::from_secs(1)).is_empty());
}

#[test]
fn test_render_before_start_does_nothing() {
    let mut host = MockHost::mounted();
    let mut widget = FilterScroller::default();
    widget.on_render(&mut host);

    assert_eq!(widget.lifecycle(), Lifecycle::Created);
    assert!(!widget.is_initialized());
    assert!(host.handle.is_none());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_switches_preset() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);
    let geometry = *widget.geometry().unwrap();
    assert_eq!((geometry.padding, geometry.handle_width), (40, 200));

    host.viewport_width = 650;
    emit(&mut host, &mut [&mut widget], GlobalEvent::Resize);

    let geometry = *widget.geometry().unwrap();
    assert_eq!((geometry.padding, geometry.handle_width), (20, 100));
    assert_eq!(widget.geometry_revision(), 2);
    assert_eq!(host.handle, Some(HandleStyle { left: 20, width: 100 }));
}

#[test]
fn test_resize_positions_from_content_offset() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    host.scroll_left = 500;
    host.measurements = Some(Measurements::new(2000, 600, 650));
    host.viewport_width = 650;
    emit(&mut host, &mut [&mut widget], GlobalEvent::Resize);

    let geometry = *widget.geometry().unwrap();
    assert_eq!(widget.handle_left(), content_offset_to_handle_left(500, &geometry));
    assert_eq!(host.scroll_left, 500);
}

#[test]
fn test_resize_without_anchors_keeps_geometry() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    host.measurements = None;
    emit(&mut host, &mut [&mut widget], GlobalEvent::Resize);

    assert_eq!(widget.geometry_revision(), 1);
    assert!(widget.geometry().is_some());
}

#[test]
fn test_resize_unsubscribed_after_stop() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);
    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::Resize));

    widget.stop(&mut host);
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::Resize));

    // Delivered directly anyway: ignored.
    host.viewport_width = 650;
    widget.handle_event(GlobalEvent::Resize, &mut host);
    assert_eq!(widget.geometry_revision(), 1);
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_native_scroll_moves_handle() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    host.scroll_left = 620;
    widget.on_scroll(&mut host);
    assert_eq!(widget.handle_left(), 390);

    host.scroll_left = 1240;
    widget.on_scroll(&mut host);
    assert_eq!(widget.handle_left(), 740);
    assert_eq!(widget.scroll_progress(&host), ScrollProgress::END);
}

// ============================================================================
// Dragging
// ============================================================================

#[test]
fn test_drag_across_whole_track() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    // Grab the handle 60px from its left edge.
    assert!(widget.on_pointer_down(100, &mut host));
    assert!(widget.handle_visible());
    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::PointerMove));
    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::PointerUp));

    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 100 });
    assert_eq!(host.scroll_left, 0);
    assert_eq!(widget.handle_left(), 40);

    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 800 });
    assert_eq!(host.scroll_left, 1240);
    assert_eq!(widget.handle_left(), 740);

    // Past the end stays clamped.
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 1500 });
    assert_eq!(host.scroll_left, 1240);
    assert_eq!(widget.handle_left(), 740);

    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: -400 });
    assert_eq!(host.scroll_left, 0);
    assert_eq!(widget.handle_left(), 40);

    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);
    assert!(!widget.is_dragging());
    assert!(!widget.handle_visible());
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::PointerMove));
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::PointerUp));
}

#[test]
fn test_drag_keeps_handle_and_content_in_step() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);
    widget.on_pointer_down(140, &mut host);

    for x in (0..1200).step_by(7) {
        emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x });

        let geometry = *widget.geometry().unwrap();
        let left = widget.handle_left();
        assert!(left >= geometry.handle_min() && left <= geometry.handle_max());
        assert!(host.scroll_left >= 0 && host.scroll_left <= geometry.content_scrollable_range);
        assert_eq!(left, content_offset_to_handle_left(host.scroll_left, &geometry));

        let from_content = ScrollProgress::from_content_offset(host.scroll_left, &geometry);
        let from_track = ScrollProgress::from_handle_left(left, &geometry);
        let tolerance = 1.0 / geometry.track_scrollable_range as f64;
        assert!((from_content.value() - from_track.value()).abs() <= tolerance);
    }
}

#[test]
fn test_press_and_release_without_movement() {
    let mut host = MockHost::mounted();
    host.scroll_left = 620;
    let mut widget = started(&mut host);

    widget.on_pointer_down(450, &mut host);
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);

    assert_eq!(host.scroll_left, 620);
    assert!(!widget.handle_visible());
}

#[test]
fn test_zero_net_movement_keeps_offset() {
    let mut host = MockHost::mounted();
    host.scroll_left = 620;
    let mut widget = started(&mut host);

    widget.on_pointer_down(450, &mut host);
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 500 });
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 450 });
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);

    assert_eq!(host.scroll_left, 620);
    assert_eq!(widget.handle_left(), 390);
    assert!(!widget.handle_visible());
}

#[test]
fn test_zero_net_movement_from_unaligned_offset() {
    let mut host = MockHost::mounted();
    host.scroll_left = 621;
    let mut widget = started(&mut host);
    assert_eq!(widget.handle_left(), 390);

    widget.on_pointer_down(450, &mut host);
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 450 });
    assert_eq!(host.scroll_left, 621);

    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 520 });
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 450 });
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);

    assert_eq!(host.scroll_left, 621);
    assert_eq!(widget.handle_left(), 390);
    assert!(!widget.handle_visible());
}

#[test]
fn test_zero_net_movement_near_start() {
    let mut host = MockHost::mounted();
    host.scroll_left = 1;
    let mut widget = started(&mut host);
    let start_left = widget.handle_left();
    assert_eq!(start_left, 40);

    widget.on_pointer_down(start_left + 10, &mut host);
    emit(
        &mut host,
        &mut [&mut widget],
        GlobalEvent::PointerMove { x: start_left + 10 },
    );
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);

    assert_eq!(host.scroll_left, 1);
    assert_eq!(widget.handle_left(), 40);
}

#[test]
fn test_drag_from_unaligned_offsets_converges() {
    for start in [1, 333, 621, 1007, 1239] {
        let mut host = MockHost::mounted();
        host.scroll_left = start;
        let mut widget = started(&mut host);
        let geometry = *widget.geometry().unwrap();
        let start_left = widget.handle_left();
        let press_x = start_left + 25;

        widget.on_pointer_down(press_x, &mut host);
        for delta in [-37, -5, -1, 1, 3, 19, 64] {
            emit(
                &mut host,
                &mut [&mut widget],
                GlobalEvent::PointerMove { x: press_x + delta },
            );

            let left = widget.handle_left();
            let expected = (start_left + delta).clamp(geometry.handle_min(), geometry.handle_max());
            assert!((left - expected).abs() <= 1, "start {start} delta {delta}");
            assert!(host.scroll_left >= 0 && host.scroll_left <= geometry.content_scrollable_range);
            assert_eq!(left, content_offset_to_handle_left(host.scroll_left, &geometry));

            let from_content = ScrollProgress::from_content_offset(host.scroll_left, &geometry);
            let from_track = ScrollProgress::from_handle_left(left, &geometry);
            let tolerance = 1.0 / geometry.track_scrollable_range as f64;
            assert!((from_content.value() - from_track.value()).abs() <= tolerance);
        }

        emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: press_x });
        emit(&mut host, &mut [&mut widget], GlobalEvent::PointerUp);
        assert_eq!(host.scroll_left, start, "start {start}");
        assert_eq!(widget.handle_left(), start_left);
    }
}

#[test]
fn test_touch_drag() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    assert!(widget.on_touch_start(60, &mut host));
    assert!(widget.handle_visible());
    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::TouchMove));
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::PointerMove));

    emit(&mut host, &mut [&mut widget], GlobalEvent::TouchMove { x: 410 });
    assert_eq!(host.scroll_left, 620);
    assert_eq!(widget.handle_left(), 390);

    // Pointer moves do not drive a touch session.
    widget.handle_event(GlobalEvent::PointerMove { x: 60 }, &mut host);
    assert_eq!(host.scroll_left, 620);
    widget.handle_event(GlobalEvent::PointerUp, &mut host);
    assert!(widget.is_dragging());

    emit(&mut host, &mut [&mut widget], GlobalEvent::TouchEnd);
    assert!(!widget.is_dragging());
    assert!(!widget.handle_visible());
    assert_eq!(host.dispatcher.subscription_count(widget.id()), 1);
}

#[test]
fn test_second_press_is_rejected() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);

    assert!(widget.on_pointer_down(100, &mut host));
    assert!(!widget.on_touch_start(300, &mut host));
    assert_eq!(widget.drag_session().unwrap().pointer_start_x, 100);
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::TouchMove));
}

#[test]
fn test_press_before_initialization_is_ignored() {
    let mut host = MockHost::unmounted();
    let mut widget = started(&mut host);

    assert!(!widget.on_pointer_down(100, &mut host));
    assert!(!widget.handle_visible());
    assert!(!host.dispatcher.is_subscribed(widget.id(), Signal::PointerMove));
}

#[test]
fn test_zero_content_range_pins_handle() {
    let mut host = MockHost::mounted();
    host.measurements = Some(Measurements::new(500, 800, 900));
    let mut widget = started(&mut host);
    assert_eq!(widget.geometry().unwrap().content_scrollable_range, 0);

    widget.on_pointer_down(100, &mut host);
    emit(&mut host, &mut [&mut widget], GlobalEvent::PointerMove { x: 600 });

    assert_eq!(host.scroll_left, 0);
    assert_eq!(widget.handle_left(), 40);
    assert_eq!(widget.scroll_progress(&host), ScrollProgress::START);
}

#[test]
fn test_instances_keep_their_own_drag_listeners() {
    let mut host = MockHost::mounted();
    let mut first = started(&mut host);
    let mut second = started(&mut host);

    first.on_pointer_down(100, &mut host);
    second.on_pointer_down(100, &mut host);
    assert_eq!(host.dispatcher.listeners(Signal::PointerUp).len(), 2);

    first.handle_event(GlobalEvent::PointerUp, &mut host);

    assert!(!first.is_dragging());
    assert!(second.is_dragging());
    assert!(host.dispatcher.is_subscribed(second.id(), Signal::PointerMove));
    assert!(host.dispatcher.is_subscribed(second.id(), Signal::PointerUp));

    emit(&mut host, &mut [&mut first, &mut second], GlobalEvent::PointerMove { x: 450 });
    assert_eq!(second.handle_left(), 390);
    assert!(!first.is_dragging());
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_stop_during_drag_releases_everything() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);
    widget.on_pointer_down(100, &mut host);

    widget.stop(&mut host);

    assert_eq!(widget.lifecycle(), Lifecycle::Stopped);
    assert!(!widget.is_dragging());
    assert!(!widget.handle_visible());
    assert_eq!(host.dispatcher.subscription_count(widget.id()), 0);

    // Idempotent
    widget.stop(&mut host);
    assert_eq!(widget.lifecycle(), Lifecycle::Stopped);

    widget.handle_event(GlobalEvent::PointerMove { x: 800 }, &mut host);
    assert_eq!(host.scroll_left, 0);
}

#[test]
fn test_restart_after_stop() {
    let mut host = MockHost::mounted();
    let mut widget = started(&mut host);
    widget.stop(&mut host);
    widget.start(&mut host);

    assert_eq!(widget.lifecycle(), Lifecycle::Running);
    assert!(host.dispatcher.is_subscribed(widget.id(), Signal::Resize));
    assert!(widget.on_pointer_down(100, &mut host));
}
