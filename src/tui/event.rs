//! TUI event loop messages.
//!
//! The runner multiplexes:
//! - crossterm keyboard events
//! - completions of spawned API calls
//! - render interval (~30fps, draw frame)
//!
//! Everything that changes app state arrives as a TuiMessage.

use crossterm::event::KeyEvent;

use crate::console::{Completion, TreeRefresh};

/// Messages that drive the TUI update loop.
#[derive(Debug)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// A submitted operation finished.
    CallCompleted(Completion),
    /// A forest fetch finished.
    TreeLoaded(TreeRefresh),
    /// Server database name (None if the server would not say).
    DatabaseName(Option<String>),
    /// Quit the TUI.
    Quit,
}

/// Work the update step asks the runner to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Submit,
    RefreshTree,
}
