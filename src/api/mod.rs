//! Category tree API: wire types and the HTTP transport.

pub mod client;
pub mod types;

pub use client::{HttpTransport, Transport, TransportError};
pub use types::{ArgValue, Args, CallResponse, CallResult, CategoryNode, ErrorResult};
