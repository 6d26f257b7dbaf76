//! Rendering interface the controller drives.
//!
//! Keeps the controller free of any UI runtime: the TUI, the plain-text
//! `call` output and the tests each provide their own implementation.

use crate::api::{CategoryNode, ErrorResult};

pub trait ResultRenderer {
    /// Show a single scalar as text and hide the table.
    fn render_value(&mut self, value: &serde_json::Value);

    /// Replace the table with one row per node, in input order.
    fn render_list(&mut self, nodes: &[CategoryNode]);

    /// Lay out the whole forest.
    fn render_tree(&mut self, nodes: &[CategoryNode]);

    /// Show a server error verbatim.
    fn render_error(&mut self, error: &ErrorResult);

    /// Update the executed-statements and elapsed-time display.
    fn render_statements(&mut self, statements: &[String], elapsed_ms: u64);

    /// Mark the tree as being re-fetched.
    fn set_tree_loading(&mut self, _loading: bool) {}
}

/// Text for a scalar result. Strings are shown without JSON quotes.
pub fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_scalars() {
        assert_eq!(value_text(&json!(3)), "3");
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "");
    }
}
