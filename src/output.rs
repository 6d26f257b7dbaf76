//! Plain-text rendering for the non-interactive `call` command.

use std::fmt::Write as _;

use crate::api::{CategoryNode, ErrorResult};
use crate::console::forest::build_forest;
use crate::console::render::value_text;
use crate::console::ResultRenderer;

/// Collects everything the controller renders as printable text.
#[derive(Debug, Default)]
pub struct PlainRenderer {
    result: String,
    statements: String,
    tree: String,
}

impl PlainRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result, tree and statements sections, in that order, each
    /// separated by a blank line. Empty sections are left out; nothing
    /// rendered gives an empty string.
    pub fn finish(&self) -> String {
        let sections: Vec<&str> = [&self.result, &self.tree, &self.statements]
            .into_iter()
            .map(|s| s.trim_end())
            .filter(|s| !s.is_empty())
            .collect();
        if sections.is_empty() {
            return String::new();
        }
        sections.join("\n\n") + "\n"
    }
}

/// Two-column table, id right-aligned.
pub fn format_table(nodes: &[CategoryNode]) -> String {
    let id_width = nodes
        .iter()
        .map(|n| n.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max("id".len());
    let mut out = format!("{:>id_width$}  name\n", "id");
    for node in nodes {
        let _ = writeln!(out, "{:>id_width$}  {}", node.id, node.name);
    }
    out
}

/// Indented forest, two spaces per level.
pub fn format_forest(nodes: &[CategoryNode]) -> String {
    let mut out = String::new();
    for entry in build_forest(nodes).walk() {
        let _ = writeln!(
            out,
            "{:indent$}{}  {}",
            "",
            entry.node.id,
            entry.node.name,
            indent = entry.display_depth() * 2
        );
    }
    out
}

impl ResultRenderer for PlainRenderer {
    fn render_value(&mut self, value: &serde_json::Value) {
        self.result = value_text(value) + "\n";
    }

    fn render_list(&mut self, nodes: &[CategoryNode]) {
        self.result = format_table(nodes);
    }

    fn render_tree(&mut self, nodes: &[CategoryNode]) {
        self.tree = format_forest(nodes);
    }

    fn render_error(&mut self, error: &ErrorResult) {
        self.result = format!("Failed: {}\n{}\n", error.kind, error.message);
    }

    fn render_statements(&mut self, statements: &[String], elapsed_ms: u64) {
        let mut out = String::new();
        for s in statements {
            let _ = writeln!(out, "{s};");
        }
        let _ = writeln!(out, "Time: {elapsed_ms}ms");
        self.statements = out;
    }
}
