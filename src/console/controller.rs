//! ConsoleController: owns the operation registry and the current-operation
//! cursor, and routes call results to a renderer by operation kind.
//!
//! Submission is split in three so a UI can keep working while a call is
//! in flight:
//!
//! 1. `prepare_submit` snapshots the current form into a `Submission`.
//! 2. `dispatch` turns it into a `'static` future that performs the call.
//! 3. `apply` routes the finished `Completion` to a renderer.
//!
//! There is no in-flight guard. Every dispatched call completes and is
//! applied in whatever order the completions are handed back.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{
    ArgValue, Args, CallResponse, CallResult, ErrorResult, Transport, TransportError,
};

use super::error::{ConsoleError, ConsoleResult};
use super::form::FormState;
use super::operation::{catalog, OperationDefinition, OperationKey, OperationKind};
use super::registry::Registry;
use super::render::ResultRenderer;

/// Endpoint returning the whole forest, used after every modification.
pub const TREE_OPERATION: &str = "getAll";

/// Snapshot of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub key: OperationKey,
    pub kind: OperationKind,
    pub args: Args,
}

/// A finished call, ready to be applied.
#[derive(Debug)]
pub struct Completion {
    pub key: OperationKey,
    pub kind: OperationKind,
    pub response: Result<CallResponse, TransportError>,
}

/// A finished forest fetch.
#[derive(Debug)]
pub struct TreeRefresh {
    pub response: Result<CallResponse, TransportError>,
}

/// Follow-up work the caller owes after applying a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The displayed forest is stale and must be re-fetched.
    RefreshTree,
}

pub struct ConsoleController {
    registry: Registry,
    transport: Arc<dyn Transport>,
}

impl ConsoleController {
    /// Controller with an empty registry.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: Registry::new(),
            transport,
        }
    }

    /// Controller with the built-in catalog registered.
    pub fn with_catalog(transport: Arc<dyn Transport>) -> ConsoleResult<Self> {
        let mut controller = Self::new(transport);
        for def in catalog() {
            controller.register(def)?;
        }
        Ok(controller)
    }

    pub fn register(&mut self, definition: OperationDefinition) -> ConsoleResult<()> {
        debug!(key = %definition.key, "registering operation");
        self.registry.register(definition)
    }

    pub fn select_operation(&mut self, key: OperationKey) -> ConsoleResult<()> {
        self.registry.select(key)
    }

    /// Select the operation `offset` tabs away, wrapping.
    pub fn select_relative(&mut self, offset: isize) -> ConsoleResult<()> {
        match self.registry.key_at_offset(offset) {
            Some(key) => self.registry.select(key),
            None => Err(ConsoleError::EmptyRegistry),
        }
    }

    pub fn current(&self) -> Option<OperationKey> {
        self.registry.current_key()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// The form of the current operation.
    pub fn current_form_mut(&mut self) -> Option<&mut FormState> {
        self.registry.current_mut().map(|e| &mut e.form)
    }

    /// Overwrite one field of an operation's form.
    pub fn set_field(
        &mut self,
        key: OperationKey,
        field: &str,
        value: ArgValue,
    ) -> ConsoleResult<()> {
        let entry = self
            .registry
            .get_mut(key)
            .ok_or(ConsoleError::UnknownOperation(key))?;
        let ok = match &value {
            ArgValue::Text(s) => entry.form.set_text(field, s),
            ArgValue::Flag(b) => entry.form.set_checked(field, *b),
        };
        if ok {
            Ok(())
        } else {
            Err(ConsoleError::UnknownField {
                operation: key,
                field: field.to_string(),
            })
        }
    }

    /// Snapshot the current form.
    pub fn prepare_submit(&self) -> ConsoleResult<Submission> {
        let entry = self.registry.current().ok_or(ConsoleError::EmptyRegistry)?;
        Ok(Submission {
            key: entry.definition.key,
            kind: entry.definition.kind,
            args: entry.form.collect(),
        })
    }

    /// Future that performs the call. Owns everything it needs, so it can
    /// be spawned.
    pub fn dispatch(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Completion> + Send + 'static {
        let transport = self.transport();
        async move {
            info!(operation = %submission.key, "submitting");
            let response = transport
                .call(submission.key.as_str(), &submission.args)
                .await;
            Completion {
                key: submission.key,
                kind: submission.kind,
                response,
            }
        }
    }

    /// Mark the tree as loading and return the future that fetches it.
    pub fn start_tree_refresh(
        &self,
        renderer: &mut dyn ResultRenderer,
    ) -> impl Future<Output = TreeRefresh> + Send + 'static {
        renderer.set_tree_loading(true);
        let transport = self.transport();
        async move {
            debug!("refreshing tree");
            let response = transport.call(TREE_OPERATION, &Args::new()).await;
            TreeRefresh { response }
        }
    }

    /// Route a finished call to the renderer.
    ///
    /// Success always updates the statements display. Server errors go to
    /// the error renderer and leave the statements alone. Transport
    /// failures touch no renderer at all.
    pub fn apply(
        &self,
        completion: Completion,
        renderer: &mut dyn ResultRenderer,
    ) -> ConsoleResult<Effect> {
        let Completion {
            key,
            kind,
            response,
        } = completion;

        let result = match response {
            Ok(CallResponse::Success(result)) => result,
            Ok(CallResponse::Failure(error)) => {
                info!(operation = %key, kind = %error.kind, "operation failed");
                renderer.render_error(&error);
                return Ok(Effect::None);
            }
            Err(e) => {
                warn!(operation = %key, error = %e, "transport failure");
                return Err(e.into());
            }
        };

        debug!(operation = %key, elapsed_ms = result.time, "operation succeeded");
        renderer.render_statements(&result.sqls, result.time);

        match kind {
            OperationKind::QueryValue => {
                renderer.render_value(&result.data);
                Ok(Effect::None)
            }
            OperationKind::QueryList => {
                render_rows(&result, renderer);
                Ok(Effect::None)
            }
            OperationKind::Modify => Ok(Effect::RefreshTree),
        }
    }

    /// Hand a fetched forest to the tree renderer. On any failure the
    /// previous tree stays and the error is returned for the status line.
    pub fn apply_tree(
        &self,
        refresh: TreeRefresh,
        renderer: &mut dyn ResultRenderer,
    ) -> ConsoleResult<()> {
        renderer.set_tree_loading(false);
        match refresh.response {
            Ok(CallResponse::Success(result)) => match result.nodes() {
                Ok(nodes) => {
                    debug!(count = nodes.len(), "tree refreshed");
                    renderer.render_tree(&nodes);
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "tree data is not a node list");
                    Err(ConsoleError::TreeRefresh {
                        kind: "UnexpectedData".into(),
                        message: e.to_string(),
                    })
                }
            },
            Ok(CallResponse::Failure(error)) => {
                warn!(kind = %error.kind, message = %error.message, "tree refresh failed");
                Err(ConsoleError::TreeRefresh {
                    kind: error.kind,
                    message: error.message,
                })
            }
            Err(e) => {
                warn!(error = %e, "tree refresh transport failure");
                Err(e.into())
            }
        }
    }

    /// Submit the current operation and apply the result in one go,
    /// following up with a tree refresh for modifications.
    pub async fn submit(&self, renderer: &mut dyn ResultRenderer) -> ConsoleResult<()> {
        let submission = self.prepare_submit()?;
        let completion = self.dispatch(submission).await;
        if self.apply(completion, renderer)? == Effect::RefreshTree {
            self.refresh_tree(renderer).await?;
        }
        Ok(())
    }

    /// Fetch and render the whole forest.
    pub async fn refresh_tree(&self, renderer: &mut dyn ResultRenderer) -> ConsoleResult<()> {
        let refresh = self.start_tree_refresh(renderer).await;
        self.apply_tree(refresh, renderer)
    }
}

fn render_rows(result: &CallResult, renderer: &mut dyn ResultRenderer) {
    match result.nodes() {
        Ok(nodes) => renderer.render_list(&nodes),
        Err(e) => renderer.render_error(&ErrorResult {
            kind: "UnexpectedData".into(),
            message: format!("expected a list of categories: {e}"),
        }),
    }
}
