//! Console layout.
//!
//! ```text
//!  category-console  demo_db @ http://localhost:6666/api/
//!  [1 Create] [2 Update] [3 Delete] ... [8 Sub-layer]
//! ┌ Tree ──────────┐┌ Path ─────────────────────────┐
//! │ v 0  root      ││ Ancestor ID: 0                │
//! │   v 1  A       ││ Descendant ID: 8              │
//! │       2  B     │└───────────────────────────────┘
//! │                │┌ Result ───────────────────────┐
//! │                ││ id   name                     │
//! │                │└───────────────────────────────┘
//! │                │┌ SQL (3ms) ────────────────────┐
//! │                ││ SELECT ... ;                  │
//! └────────────────┘└───────────────────────────────┘
//!  [idle] Enter:Submit ←/→:Operation Tab:Focus F5:Reload F2:Filter Esc:Quit
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use super::app::{Focus, ResultView, TuiApp};
use super::statements::{format_elapsed, highlight};
use super::tree;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &mut TuiApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // operation tabs
            Constraint::Min(8),    // panes
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_title(f, app, outer[0]);
    draw_tab_bar(f, app, outer[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(outer[2]);

    draw_tree(f, app, columns[0]);

    let form_rows = app
        .controller
        .registry()
        .current()
        .map_or(1, |e| e.form.fields.len() as u16);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(form_rows + 2),
            Constraint::Min(3),
            Constraint::Length(7),
        ])
        .split(columns[1]);

    draw_form(f, app, right[0]);
    draw_result(f, app, right[1]);
    draw_statements(f, app, right[2]);
    draw_status(f, app, outer[3]);
}

fn draw_title(f: &mut Frame, app: &TuiApp, area: Rect) {
    let mut spans = vec![Span::styled(
        " category-console ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(name) = &app.database_name {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            name.clone(),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::styled(" @", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(
        format!(" {}", app.base_url),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_tab_bar(f: &mut Frame, app: &TuiApp, area: Rect) {
    let current = app.controller.current();
    let spans: Vec<Span> = app
        .controller
        .registry()
        .entries()
        .iter()
        .enumerate()
        .flat_map(|(i, entry)| {
            let style = if Some(entry.definition.key) == current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::raw(" "),
                Span::styled(
                    format!("[{} {}]", i + 1, entry.definition.display_name),
                    style,
                ),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn draw_tree(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    let title = if app.results.tree_loading {
        " Tree (loading…) ".to_string()
    } else {
        " Tree ".to_string()
    };
    let block = pane_block(title, app.focus == Focus::Tree);

    if app.results.tree_nodes.is_empty() {
        let para = Paragraph::new(Span::styled(
            "No categories loaded. F5 to reload.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let items = match tree::build_category_tree(&app.results.tree_nodes) {
        Ok(items) => items,
        Err(_) => {
            let para = Paragraph::new("Error building category tree").block(block);
            f.render_widget(para, area);
            return;
        }
    };
    if let Ok(widget) = tui_tree_widget::Tree::new(&items) {
        let widget = widget
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        f.render_stateful_widget(widget, area, &mut app.results.tree_state);
    } else {
        let para = Paragraph::new("Error building category tree").block(block);
        f.render_widget(para, area);
    }
}

fn draw_form(f: &mut Frame, app: &TuiApp, area: Rect) {
    let Some(entry) = app.controller.registry().current() else {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };
    let focused = app.focus == Focus::Form;
    let block = pane_block(format!(" {} ", entry.definition.display_name), focused);

    let lines: Vec<Line> = entry
        .form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let active = focused && i == entry.form.focused;
            let value_style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(
                    format!(" {}: ", field.spec.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(field.display(), value_style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_result(f: &mut Frame, app: &TuiApp, area: Rect) {
    let block = pane_block(" Result ".into(), false);
    match &app.results.view {
        ResultView::Empty => {
            let para = Paragraph::new(Span::styled(
                "Enter to run the selected operation.",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            f.render_widget(para, area);
        }
        ResultView::Value(text) => {
            let para = Paragraph::new(text.as_str())
                .wrap(Wrap { trim: false })
                .block(block);
            f.render_widget(para, area);
        }
        ResultView::Table(nodes) => {
            let header = Row::new(vec![Cell::from("id"), Cell::from("name")])
                .style(Style::default().add_modifier(Modifier::BOLD));
            let rows: Vec<Row> = nodes
                .iter()
                .map(|n| Row::new(vec![Cell::from(n.id.to_string()), Cell::from(n.name.clone())]))
                .collect();
            let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(10)])
                .header(header)
                .block(block);
            f.render_widget(table, area);
        }
        ResultView::Error(error) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Failed: {}", error.kind),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    error.message.clone(),
                    Style::default().fg(Color::Red),
                )),
            ];
            let para = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(block);
            f.render_widget(para, area);
        }
    }
}

fn draw_statements(f: &mut Frame, app: &TuiApp, area: Rect) {
    let filter = if app.results.tree_only {
        format!(" [{} only]", app.results.statement_filter)
    } else {
        String::new()
    };
    let title = format!(
        " SQL ({}){} ",
        format_elapsed(app.results.elapsed_ms),
        filter
    );
    let lines: Vec<Line> = app
        .results
        .visible_statements()
        .iter()
        .map(|s| highlight(s))
        .collect();
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(pane_block(title, false));
    f.render_widget(para, area);
}

fn draw_status(f: &mut Frame, app: &TuiApp, area: Rect) {
    let state = if app.in_flight > 0 {
        Span::styled(
            format!("running {}", app.in_flight),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled("idle", Style::default().fg(Color::Green))
    };

    let mut spans = vec![
        Span::styled(" [", Style::default().fg(Color::DarkGray)),
        state,
        Span::styled("]", Style::default().fg(Color::DarkGray)),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("error: {status}"),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "  Enter:Submit ←/→:Operation Tab:Focus F5:Reload F2:Filter Esc:Quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CategoryNode, ErrorResult};
    use crate::console::ResultRenderer;
    use crate::tui::app::tests::test_app;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut TuiApp) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_tabs_and_form() {
        let mut app = test_app();
        let screen = render(&mut app);
        assert!(screen.contains("[1 Create]"));
        assert!(screen.contains("[8 Sub-layer]"));
        assert!(screen.contains("Name: New category"));
        assert!(screen.contains("No categories loaded"));
    }

    #[test]
    fn renders_table_and_statements() {
        let mut app = test_app();
        app.results.render_list(&[CategoryNode::new(7, "Toys", Some(0))]);
        app.results
            .render_statements(&["SELECT * FROM category_tree".into()], 12);
        let screen = render(&mut app);
        assert!(screen.contains("Toys"));
        assert!(screen.contains("SQL (12ms)"));
        assert!(screen.contains("SELECT * FROM category_tree;"));
    }

    #[test]
    fn renders_error_result() {
        let mut app = test_app();
        app.results.render_error(&ErrorResult {
            kind: "IllegalArgument".into(),
            message: "no such node".into(),
        });
        let screen = render(&mut app);
        assert!(screen.contains("Failed: IllegalArgument"));
        assert!(screen.contains("no such node"));
    }

    #[test]
    fn renders_tree_and_database_name() {
        let mut app = test_app();
        app.database_name = Some("demo_db".into());
        app.results.render_tree(&[
            CategoryNode::new(0, "root", None),
            CategoryNode::new(1, "Electronics", Some(0)),
        ]);
        let screen = render(&mut app);
        assert!(screen.contains("demo_db"));
        assert!(screen.contains("1  Electronics"));
    }

    #[test]
    fn renders_in_flight_and_status() {
        let mut app = test_app();
        app.in_flight = 2;
        app.status = Some("connection refused".into());
        let screen = render(&mut app);
        assert!(screen.contains("running 2"));
        assert!(screen.contains("error: connection refused"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = test_app();
        let backend = TestBackend::new(10, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
    }
}
