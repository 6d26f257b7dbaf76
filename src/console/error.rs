//! Controller error types.

use thiserror::Error;

use super::operation::OperationKey;
use crate::api::TransportError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("operation already registered: {0}")]
    DuplicateOperation(OperationKey),

    #[error("operation not registered: {0}")]
    UnknownOperation(OperationKey),

    #[error("unknown operation name: {0}")]
    UnknownOperationName(String),

    #[error("no operations registered")]
    EmptyRegistry,

    #[error("operation {operation} has no field named {field}")]
    UnknownField {
        operation: OperationKey,
        field: String,
    },

    #[error("tree refresh failed: {kind}: {message}")]
    TreeRefresh { kind: String, message: String },

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
