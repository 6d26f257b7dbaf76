//! TuiApp: the TEA model.
//!
//! All state lives here. Update receives TuiMessages, mutates state.
//! View reads state to produce ratatui widgets. No side effects in view:
//! calls are queued as `Request`s and started by the runner.

use tracing::warn;
use tui_tree_widget::TreeState;

use crate::api::{CategoryNode, ErrorResult};
use crate::config::ConsoleConfig;
use crate::console::render::value_text;
use crate::console::{ConsoleController, Effect, ResultRenderer};

use super::event::{Request, TuiMessage};
use super::input;
use super::tree;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Tree,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Form => Focus::Tree,
            Focus::Tree => Focus::Form,
        }
    }
}

/// What the result pane currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    Value(String),
    Table(Vec<CategoryNode>),
    Error(ErrorResult),
}

/// Display surfaces the controller renders into.
#[derive(Debug)]
pub struct ResultsPane {
    pub view: ResultView,
    /// Statements of the last successful call.
    pub statements: Vec<String>,
    pub elapsed_ms: Option<u64>,
    /// Last fetched forest.
    pub tree_nodes: Vec<CategoryNode>,
    pub tree_loading: bool,
    pub tree_state: TreeState<String>,
    /// Show only statements touching `statement_filter`.
    pub tree_only: bool,
    pub statement_filter: String,
}

impl ResultsPane {
    pub fn new(statement_filter: String, tree_only: bool) -> Self {
        Self {
            view: ResultView::Empty,
            statements: Vec::new(),
            elapsed_ms: None,
            tree_nodes: Vec::new(),
            tree_loading: false,
            tree_state: TreeState::default(),
            tree_only,
            statement_filter,
        }
    }

    /// Statements as shown, after the tree-only filter.
    pub fn visible_statements(&self) -> Vec<String> {
        let filter = self.tree_only.then_some(self.statement_filter.as_str());
        super::statements::visible_statements(&self.statements, filter)
    }
}

impl ResultRenderer for ResultsPane {
    fn render_value(&mut self, value: &serde_json::Value) {
        self.view = ResultView::Value(value_text(value));
    }

    fn render_list(&mut self, nodes: &[CategoryNode]) {
        self.view = ResultView::Table(nodes.to_vec());
    }

    fn render_tree(&mut self, nodes: &[CategoryNode]) {
        self.tree_nodes = nodes.to_vec();
        self.tree_state = TreeState::default();
        for path in tree::expandable_paths(nodes) {
            self.tree_state.open(path);
        }
        self.tree_state.select_first();
    }

    fn render_error(&mut self, error: &ErrorResult) {
        self.view = ResultView::Error(error.clone());
    }

    fn render_statements(&mut self, statements: &[String], elapsed_ms: u64) {
        self.statements = statements.to_vec();
        self.elapsed_ms = Some(elapsed_ms);
    }

    fn set_tree_loading(&mut self, loading: bool) {
        self.tree_loading = loading;
    }
}

/// The main TUI application state (TEA model).
pub struct TuiApp {
    pub controller: ConsoleController,
    pub results: ResultsPane,
    pub focus: Focus,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Work queued by update, drained by the runner.
    pub requests: Vec<Request>,
    /// Calls dispatched but not yet applied.
    pub in_flight: usize,
    /// Last transport problem, shown in the status bar.
    pub status: Option<String>,
    pub database_name: Option<String>,
    pub base_url: String,
}

impl TuiApp {
    pub fn new(controller: ConsoleController, config: &ConsoleConfig) -> Self {
        Self {
            controller,
            results: ResultsPane::new(config.statement_filter.clone(), config.tree_only),
            focus: Focus::Form,
            should_quit: false,
            requests: vec![Request::RefreshTree],
            in_flight: 0,
            status: None,
            database_name: None,
            base_url: config.base_url.clone(),
        }
    }

    /// Take the queued requests.
    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => input::handle_key(self, key),
            TuiMessage::CallCompleted(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match self.controller.apply(completion, &mut self.results) {
                    Ok(Effect::RefreshTree) => {
                        self.status = None;
                        self.requests.push(Request::RefreshTree);
                    }
                    Ok(Effect::None) => self.status = None,
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            TuiMessage::TreeLoaded(refresh) => {
                if let Err(e) = self.controller.apply_tree(refresh, &mut self.results) {
                    self.status = Some(e.to_string());
                }
            }
            TuiMessage::DatabaseName(name) => self.database_name = name,
            TuiMessage::Quit => self.should_quit = true,
        }
    }

    /// Queue a submission of the current operation.
    pub fn request_submit(&mut self) {
        self.requests.push(Request::Submit);
    }

    pub fn request_tree_refresh(&mut self) {
        self.requests.push(Request::RefreshTree);
    }

    /// Switch operations by tab offset.
    pub fn select_relative(&mut self, offset: isize) {
        if let Err(e) = self.controller.select_relative(offset) {
            warn!(error = %e, "cannot switch operation");
        }
    }

    /// Switch to the operation at `index` in tab order, if any.
    pub fn select_index(&mut self, index: usize) {
        let key = self
            .controller
            .registry()
            .entries()
            .get(index)
            .map(|e| e.definition.key);
        if let Some(key) = key {
            if let Err(e) = self.controller.select_operation(key) {
                warn!(error = %e, "cannot switch operation");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{Args, CallResponse, CallResult, Transport, TransportError};
    use crate::console::{Completion, OperationKey, OperationKind, TreeRefresh};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn call(&self, _: &str, _: &Args) -> Result<CallResponse, TransportError> {
            Err(TransportError::InvalidResponse {
                status: 0,
                message: "offline".into(),
            })
        }
    }

    pub(crate) fn test_app() -> TuiApp {
        let controller = ConsoleController::with_catalog(Arc::new(Offline)).unwrap();
        TuiApp::new(controller, &ConsoleConfig::default())
    }

    fn success(data: serde_json::Value) -> Result<CallResponse, TransportError> {
        Ok(CallResponse::Success(CallResult {
            data,
            sqls: vec!["SELECT * FROM category_tree".into(), "SELECT 1".into()],
            time: 3,
        }))
    }

    #[test]
    fn starts_with_tree_refresh_queued() {
        let mut app = test_app();
        assert_eq!(app.drain_requests(), vec![Request::RefreshTree]);
        assert!(app.drain_requests().is_empty());
    }

    #[test]
    fn list_completion_fills_table() {
        let mut app = test_app();
        app.in_flight = 1;
        app.update(TuiMessage::CallCompleted(Completion {
            key: OperationKey::GetTree,
            kind: OperationKind::QueryList,
            response: success(json!([{"id": 7, "name": "Toys", "parent": 0}])),
        }));
        assert_eq!(app.in_flight, 0);
        assert_eq!(
            app.results.view,
            ResultView::Table(vec![CategoryNode::new(7, "Toys", Some(0))])
        );
        assert_eq!(app.results.elapsed_ms, Some(3));
    }

    #[test]
    fn modify_completion_queues_refresh() {
        let mut app = test_app();
        app.drain_requests();
        app.update(TuiMessage::CallCompleted(Completion {
            key: OperationKey::Delete,
            kind: OperationKind::Modify,
            response: success(serde_json::Value::Null),
        }));
        assert_eq!(app.drain_requests(), vec![Request::RefreshTree]);
        assert_eq!(app.results.view, ResultView::Empty);
    }

    #[test]
    fn transport_failure_sets_status() {
        let mut app = test_app();
        app.update(TuiMessage::CallCompleted(Completion {
            key: OperationKey::GetLevel,
            kind: OperationKind::QueryValue,
            response: Err(TransportError::InvalidResponse {
                status: 502,
                message: "bad gateway".into(),
            }),
        }));
        assert!(app.status.as_deref().unwrap().contains("502"));
        assert_eq!(app.results.view, ResultView::Empty);
    }

    #[test]
    fn tree_loaded_replaces_nodes_and_expands() {
        let mut app = test_app();
        app.results.tree_loading = true;
        app.update(TuiMessage::TreeLoaded(TreeRefresh {
            response: success(json!([
                {"id": 0, "name": "root", "parentId": null},
                {"id": 1, "name": "A", "parentId": 0}
            ])),
        }));
        assert!(!app.results.tree_loading);
        assert_eq!(app.results.tree_nodes.len(), 2);
        assert!(app.results.tree_state.opened().contains(&vec!["0".to_string()]));
    }

    #[test]
    fn failed_tree_refresh_sets_status() {
        let mut app = test_app();
        app.results.render_tree(&[CategoryNode::new(0, "root", None)]);
        app.results.tree_loading = true;
        app.update(TuiMessage::TreeLoaded(TreeRefresh {
            response: Ok(CallResponse::Failure(ErrorResult {
                kind: "SQLException".into(),
                message: "database is locked".into(),
            })),
        }));
        assert!(!app.results.tree_loading);
        let status = app.status.as_deref().unwrap();
        assert!(status.contains("SQLException"));
        assert!(status.contains("database is locked"));
        assert_eq!(app.results.tree_nodes.len(), 1);
    }

    #[test]
    fn tree_only_filters_statements() {
        let mut app = test_app();
        app.results
            .render_statements(&["SELECT * FROM category_tree".into(), "SELECT 1".into()], 1);
        assert_eq!(app.results.visible_statements().len(), 2);
        app.results.tree_only = true;
        assert_eq!(
            app.results.visible_statements(),
            ["SELECT * FROM category_tree;"]
        );
    }

    #[test]
    fn select_index_out_of_range_is_ignored() {
        let mut app = test_app();
        app.select_index(5);
        assert_eq!(app.controller.current(), Some(OperationKey::GetPath));
        app.select_index(42);
        assert_eq!(app.controller.current(), Some(OperationKey::GetPath));
    }

    #[test]
    fn quit_message() {
        let mut app = test_app();
        app.update(TuiMessage::Quit);
        assert!(app.should_quit);
    }
}
