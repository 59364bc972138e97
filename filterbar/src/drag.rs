//! Drag state machine for the scrollbar handle.
//!
//! `Idle` → `Dragging` on pointer-down or touch-start, `Dragging` loops on
//! every move, and release returns to `Idle`. The controller only tracks the
//! session; the owning widget applies the resulting offsets.

use crate::signal::Signal;

/// Input device that started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragInput {
    Pointer,
    Touch,
}

impl DragInput {
    /// Global signals to listen for while this input drags: move, then release.
    pub fn signals(&self) -> [Signal; 2] {
        match self {
            Self::Pointer => [Signal::PointerMove, Signal::PointerUp],
            Self::Touch => [Signal::TouchMove, Signal::TouchEnd],
        }
    }

    pub fn move_signal(&self) -> Signal {
        self.signals()[0]
    }

    pub fn release_signal(&self) -> Signal {
        self.signals()[1]
    }
}

/// One press-move-release interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub input: DragInput,
    /// Pointer X at press time.
    pub pointer_start_x: i32,
    /// Handle left offset at press time.
    pub handle_start_left: i32,
    /// Content scroll offset at press time.
    pub content_start_offset: i32,
    /// Offset along the track from the last move.
    pub drag_offset: i32,
}

impl DragSession {
    /// Track offset for pointer position `x`.
    ///
    /// Keeps the grab point under the pointer: the handle moves by exactly
    /// the distance the pointer travelled.
    pub fn offset_for(&self, x: i32, padding: i32) -> i32 {
        x - (self.pointer_start_x - self.handle_start_left) - padding
    }

    /// Track offset of the handle at press time.
    pub fn start_offset(&self, padding: i32) -> i32 {
        self.handle_start_left - padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Holds at most one active drag session.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Start a session. Returns false if one is already active.
    pub fn begin(
        &mut self,
        input: DragInput,
        pointer_x: i32,
        handle_left: i32,
        content_offset: i32,
        padding: i32,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging(DragSession {
            input,
            pointer_start_x: pointer_x,
            handle_start_left: handle_left,
            content_start_offset: content_offset,
            drag_offset: handle_left - padding,
        });
        true
    }

    /// Record a move from `input` and return the new drag offset.
    ///
    /// Returns `None` when idle or when the move comes from a different input.
    pub fn update(&mut self, input: DragInput, x: i32, padding: i32) -> Option<i32> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        if session.input != input {
            return None;
        }
        session.drag_offset = session.offset_for(x, padding);
        Some(session.drag_offset)
    }

    /// End the session and return it.
    pub fn end(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }
}
