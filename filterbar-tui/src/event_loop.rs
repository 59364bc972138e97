//! Main event loop.
//!
//! Terminal events, retry deadlines, the provider result and the spinner
//! tick are multiplexed with `tokio::select!`. Every branch ends with a
//! redraw followed by the widget's render hook.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use filterbar::{
    Category, Config, FilterQuery, FilterScroller, FilterSelection, FilterView, GlobalEvent,
    Surface,
};
use futures::StreamExt;
use log::{debug, error, info, trace};
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use crate::error::AppError;
use crate::host::TerminalHost;
use crate::provider::{self, Source};
use crate::render::{self, Body, CONTENT_ROW, ContentRow, Frame, TRACK_ROW};
use crate::terminal::TerminalGuard;

const WHEEL_STEP: i32 = 3;
const KEY_STEP: i32 = 4;
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

/// Everything the loop mutates between frames.
pub struct App {
    scroller: FilterScroller,
    host: TerminalHost,
    query: FilterQuery,
    categories: Vec<Category>,
    row: ContentRow,
    selection: FilterSelection,
    spinner: usize,
    quit: bool,
}

impl App {
    pub fn new(config: Config, width: u16) -> Self {
        let host = TerminalHost::new(width, config.breakpoints.clone());
        Self {
            scroller: FilterScroller::new(config),
            host,
            query: FilterQuery::Loading,
            categories: Vec::new(),
            row: ContentRow::default(),
            selection: FilterSelection::new(),
            spinner: 0,
            quit: false,
        }
    }

    pub fn start(&mut self) {
        self.scroller.start(&mut self.host);
    }

    pub fn stop(&mut self) {
        self.scroller.stop(&mut self.host);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.query, FilterQuery::Loading)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn scroller(&self) -> &FilterScroller {
        &self.scroller
    }

    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_query(&mut self, query: FilterQuery) {
        self.query = query;
        self.categories = match FilterView::from_query(&self.query) {
            FilterView::Categories(categories) => categories,
            _ => Vec::new(),
        };
        self.relayout();
    }

    fn relayout(&mut self) {
        self.row = ContentRow::layout(&self.categories, &self.selection);
        self.host.set_content_width(self.row.width());
    }

    pub fn tick_spinner(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
    }

    pub fn frame(&self) -> Frame<'_> {
        let body = match FilterView::from_query(&self.query) {
            FilterView::Spinner => Body::Spinner {
                frame: self.spinner,
            },
            FilterView::ErrorNotice(message) => Body::Error(message),
            FilterView::Categories(_) => Body::Row {
                row: &self.row,
                scroll: self.host.scroll_left(),
                handle: self.host.handle(),
                highlighted: self.scroller.handle_visible(),
            },
        };
        Frame {
            width: self.host.width(),
            selected: self.selection.len(),
            body,
        }
    }

    /// Called after a frame hit the terminal.
    pub fn after_paint(&mut self) {
        if self.host.mark_painted() {
            let event = if self.scroller.is_initialized() {
                GlobalEvent::Resize
            } else {
                GlobalEvent::LayoutReady
            };
            self.host.dispatch(&mut self.scroller, event);
        }
        self.scroller.on_render(&mut self.host);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.host.dispatcher.next_deadline()
    }

    pub fn fire_due_retries(&mut self, now: Instant) {
        self.host.fire_due_retries(&mut self.scroller, now);
    }

    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::Resize(width, _) => {
                self.host.resize(width);
                self.host.dispatch(&mut self.scroller, GlobalEvent::Resize);
            }
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Left => self.scroll_by(-KEY_STEP),
            KeyCode::Right => self.scroll_by(KEY_STEP),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let visible = self
                    .row
                    .first_visible(self.host.scroll_left(), i32::from(self.host.width()))
                    .map(str::to_string);
                if let Some(id) = visible {
                    self.toggle(&id);
                }
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let x = i32::from(mouse.column);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row == TRACK_ROW && self.host.hits_handle(x) {
                    self.scroller.on_pointer_down(x, &mut self.host);
                } else if mouse.row == CONTENT_ROW {
                    let hit = self
                        .row
                        .item_at(self.host.scroll_left() + x)
                        .map(str::to_string);
                    if let Some(id) = hit {
                        self.toggle(&id);
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.host
                    .dispatch(&mut self.scroller, GlobalEvent::PointerMove { x });
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.host.dispatch(&mut self.scroller, GlobalEvent::PointerUp);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => self.scroll_by(-WHEEL_STEP),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => self.scroll_by(WHEEL_STEP),
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        if self.host.scroll_by(delta) {
            self.scroller.on_scroll(&mut self.host);
        }
    }

    fn toggle(&mut self, id: &str) {
        let selected = self.selection.toggle(id);
        debug!("{} {}", if selected { "Selected" } else { "Deselected" }, id);
        self.relayout();
    }
}

/// Used as a conditional branch in `tokio::select!`.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

pub async fn run(config: Config, source: Source, term: &mut TerminalGuard) -> Result<(), AppError> {
    let (width, height) = term.size()?;
    let mut app = App::new(config, width);
    app.start();

    let (query_tx, mut query_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let _ = query_tx.send(provider::fetch(source).await);
    });

    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);

    info!("Event loop started at {width}x{height}");

    loop {
        render::draw(term.stdout(), &app.frame())?;
        app.after_paint();
        if app.should_quit() {
            break;
        }

        let deadline = app.next_deadline();
        let loading = app.is_loading();

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    trace!("Terminal event: {event:?}");
                    app.handle_terminal_event(event);
                }
                Some(Err(e)) => error!("Event stream error: {e}"),
                None => break,
            },

            Some(query) = query_rx.recv() => {
                debug!("Provider finished");
                app.set_query(query);
            }

            _ = sleep_until_optional(deadline) => {
                app.fire_due_retries(Instant::now());
            }

            _ = spinner.tick(), if loading => {
                app.tick_spinner();
            }
        }
    }

    debug!(
        "{} stopping at offset {}",
        app.scroller().id(),
        app.host().scroll_left()
    );
    app.stop();
    info!(
        "Event loop exited with {} filters selected",
        app.selection().len()
    );
    Ok(())
}
