//! Terminal console: ratatui presentation layer.
//!
//! One tab per registered operation, a form for its inputs, a result pane,
//! the executed statements, and the whole category forest on the left.
//!
//! ## Architecture (TEA)
//!
//! Model (`TuiApp`) + Update (message handler) + View (render).
//! Calls never run inside update: it queues `Request`s, the runner spawns
//! them and feeds the completions back in as messages.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
pub mod statements;
pub mod tree;

pub use app::TuiApp;
pub use runner::run_tui;
