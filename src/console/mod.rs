//! Console core: operation registry, forms, and result routing.
//!
//! Knows nothing about terminals. The TUI and the one-shot `call` command
//! both drive a `ConsoleController` and supply a `ResultRenderer`.

pub mod controller;
pub mod error;
pub mod forest;
pub mod form;
pub mod operation;
pub mod registry;
pub mod render;

pub use controller::{Completion, ConsoleController, Effect, Submission, TreeRefresh};
pub use error::{ConsoleError, ConsoleResult};
pub use operation::{
    catalog, FieldDefault, FieldSpec, InputKind, OperationDefinition, OperationKey, OperationKind,
};
pub use render::ResultRenderer;
