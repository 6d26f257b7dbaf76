//! Executed-statements pane helpers: filtering and keyword emphasis.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

/// Statements as displayed: each terminated with `;`. With `filter`,
/// only statements mentioning that table are kept.
pub fn visible_statements(statements: &[String], filter: Option<&str>) -> Vec<String> {
    statements
        .iter()
        .filter(|s| filter.map_or(true, |table| s.contains(table)))
        .map(|s| format!("{s};"))
        .collect()
}

/// Elapsed time as shown in the pane title.
pub fn format_elapsed(elapsed_ms: Option<u64>) -> String {
    match elapsed_ms {
        Some(ms) => format!("{ms}ms"),
        None => "-".into(),
    }
}

fn keyword_pattern() -> &'static Regex {
    static KEYWORDS: OnceLock<Regex> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        Regex::new(
            r"(?i)\b(select|insert|update|delete|from|where|join|inner|left|right|on|into|values|set|and|or|not|null|is|in|as|order|group|by|limit|union|all|distinct|case|when|then|else|end|with|recursive)\b",
        )
        .expect("keyword regex is valid")
    })
}

/// Split a statement into spans with SQL keywords emphasised.
pub fn highlight(statement: &str) -> Line<'static> {
    let keyword = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut last = 0;
    for m in keyword_pattern().find_iter(statement) {
        if m.start() > last {
            spans.push(Span::raw(statement[last..m.start()].to_string()));
        }
        spans.push(Span::styled(m.as_str().to_string(), keyword));
        last = m.end();
    }
    if last < statement.len() {
        spans.push(Span::raw(statement[last..].to_string()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqls() -> Vec<String> {
        vec![
            "SELECT * FROM category WHERE id=?".into(),
            "SELECT ancestor FROM category_tree WHERE descendant=?".into(),
        ]
    }

    #[test]
    fn statements_get_terminators() {
        let shown = visible_statements(&sqls(), None);
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|s| s.ends_with(';')));
    }

    #[test]
    fn tree_only_filter() {
        let shown = visible_statements(&sqls(), Some("category_tree"));
        assert_eq!(shown, ["SELECT ancestor FROM category_tree WHERE descendant=?;"]);
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Some(12)), "12ms");
        assert_eq!(format_elapsed(None), "-");
    }

    #[test]
    fn highlight_keeps_text_and_marks_keywords() {
        let line = highlight("select name from category_tree");
        assert_eq!(line.to_string(), "select name from category_tree");
        let styled: Vec<_> = line
            .spans
            .iter()
            .filter(|s| s.style.fg == Some(Color::Magenta))
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(styled, ["select", "from"]);
    }

    #[test]
    fn keywords_inside_identifiers_are_not_marked() {
        let line = highlight("category_tree");
        assert_eq!(line.spans.len(), 1);
    }
}
