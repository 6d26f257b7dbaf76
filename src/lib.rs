//! Category Console: terminal client for a closure-table category tree API.
//!
//! The console core (`console`) knows the operation catalog, keeps one form
//! per operation and routes call results to a `ResultRenderer`. The TUI
//! (`tui`) and the one-shot `call` command (`output`) are two renderers over
//! the same controller.

pub mod api;
pub mod config;
pub mod console;
pub mod output;
pub mod tui;
