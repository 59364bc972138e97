//! Drawing the filter row, the track and the handle.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use filterbar::{Category, FilterSelection, HandleStyle};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TITLE_ROW: u16 = 0;
pub const CONTENT_ROW: u16 = 2;
pub const TRACK_ROW: u16 = 4;
pub const HELP_ROW: u16 = 6;

const CATEGORY_GAP: &str = "   ";
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Heading,
    Item { selected: bool },
    Gap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    text: String,
    kind: SegmentKind,
}

/// Clickable span of an item in content coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpan {
    pub start: i32,
    pub end: i32,
    pub id: String,
}

/// The category row laid out on one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRow {
    segments: Vec<Segment>,
    spans: Vec<ItemSpan>,
    width: i32,
}

impl ContentRow {
    pub fn layout(categories: &[Category], selection: &FilterSelection) -> Self {
        let mut row = Self::default();

        for (index, category) in categories.iter().enumerate() {
            if index > 0 {
                row.push(CATEGORY_GAP.to_string(), SegmentKind::Gap, None);
            }
            row.push(format!("{}:", category.name), SegmentKind::Heading, None);
            for item in &category.items {
                row.push(" ".to_string(), SegmentKind::Gap, None);
                let selected = selection.is_selected(&item.id);
                row.push(
                    format!("[{}]", item.name),
                    SegmentKind::Item { selected },
                    Some(item.id.clone()),
                );
            }
        }

        row
    }

    fn push(&mut self, text: String, kind: SegmentKind, id: Option<String>) {
        let width = text.width() as i32;
        if let Some(id) = id {
            self.spans.push(ItemSpan {
                start: self.width,
                end: self.width + width,
                id,
            });
        }
        self.width += width;
        self.segments.push(Segment { text, kind });
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Item under content column `x`.
    pub fn item_at(&self, x: i32) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| x >= span.start && x < span.end)
            .map(|span| span.id.as_str())
    }

    /// First item fully inside `[scroll, scroll + width)`.
    pub fn first_visible(&self, scroll: i32, width: i32) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| span.start >= scroll && span.end <= scroll + width)
            .map(|span| span.id.as_str())
    }
}

/// What the body of the screen shows.
pub enum Body<'a> {
    Spinner { frame: usize },
    Error(&'a str),
    Row {
        row: &'a ContentRow,
        scroll: i32,
        handle: Option<HandleStyle>,
        highlighted: bool,
    },
}

pub struct Frame<'a> {
    pub width: u16,
    pub selected: usize,
    pub body: Body<'a>,
}

pub fn draw(out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, TITLE_ROW))?;
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print("Filters"),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("  {} selected", frame.selected)),
        ResetColor
    )?;

    match &frame.body {
        Body::Spinner { frame: tick } => {
            let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
            queue!(
                out,
                MoveTo(0, CONTENT_ROW),
                SetForegroundColor(Color::Cyan),
                Print(format!("{spinner} Loading filters")),
                ResetColor
            )?;
        }
        Body::Error(message) => {
            queue!(
                out,
                MoveTo(0, CONTENT_ROW),
                SetForegroundColor(Color::Red),
                Print(message),
                ResetColor
            )?;
        }
        Body::Row {
            row,
            scroll,
            handle,
            highlighted,
        } => {
            draw_row(out, row, *scroll, frame.width)?;
            if let Some(handle) = handle {
                draw_track(out, *handle, *highlighted, frame.width)?;
            }
        }
    }

    queue!(
        out,
        MoveTo(0, HELP_ROW),
        SetForegroundColor(Color::DarkGrey),
        Print("drag the bar or scroll to browse · click or space to toggle · q to quit"),
        ResetColor
    )?;
    out.flush()
}

fn draw_row(out: &mut impl Write, row: &ContentRow, scroll: i32, width: u16) -> io::Result<()> {
    let right = scroll + i32::from(width);
    let mut x = 0;

    for segment in &row.segments {
        let color = match segment.kind {
            SegmentKind::Heading => Color::Cyan,
            SegmentKind::Item { selected: true } => Color::Yellow,
            SegmentKind::Item { selected: false } => Color::White,
            SegmentKind::Gap => Color::Reset,
        };
        queue!(out, SetForegroundColor(color))?;

        for ch in segment.text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if x >= scroll && x + w <= right {
                queue!(out, MoveTo((x - scroll) as u16, CONTENT_ROW), Print(ch))?;
            }
            x += w;
        }
    }

    queue!(out, ResetColor)
}

fn draw_track(
    out: &mut impl Write,
    handle: HandleStyle,
    highlighted: bool,
    width: u16,
) -> io::Result<()> {
    let width = i32::from(width);
    queue!(out, SetForegroundColor(Color::DarkGrey))?;
    for x in 0..width {
        queue!(out, MoveTo(x as u16, TRACK_ROW), Print('─'))?;
    }

    let color = if highlighted {
        Color::Yellow
    } else {
        Color::Grey
    };
    queue!(out, SetForegroundColor(color))?;
    let start = handle.left.max(0);
    let end = (handle.left + handle.width).min(width);
    for x in start..end {
        queue!(out, MoveTo(x as u16, TRACK_ROW), Print('█'))?;
    }

    queue!(out, ResetColor)
}
