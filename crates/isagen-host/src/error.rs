//! Host-call errors

use crate::func::FuncSignature;
use thiserror::Error;

/// Failure while marshalling or running a host function
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Fewer values on the operand stack than the call consumes
    #[error("operand stack underflow: {needed} values needed, {available} available")]
    StackUnderflow { needed: usize, available: usize },

    /// The operand stack cannot hold the values being written
    #[error("operand stack overflow: {requested} slots requested, capacity is {capacity}")]
    StackOverflow { requested: usize, capacity: usize },

    #[error("memory access out of bounds: {len} bytes at {address:#x}, memory size is {size}")]
    OutOfBounds { address: u32, len: usize, size: usize },

    #[error("unknown function #{index}")]
    UnknownFunction { index: usize },

    #[error("function '{name}' is already registered")]
    DuplicateFunction { name: String },

    /// A declared function was called before an implementation was bound
    #[error("function '{name}' has no implementation")]
    UnboundFunction { name: String },

    #[error("function '{name}' already has an implementation")]
    AlreadyBound { name: String },

    #[error("signature mismatch: expected {expected}, got {actual}")]
    SignatureMismatch {
        expected: FuncSignature,
        actual: FuncSignature,
    },

    /// Raised by the host function itself
    #[error("host function failed: {message}")]
    Native { message: String },
}

impl HostError {
    /// Error a host function returns to abort the call
    pub fn native(message: impl Into<String>) -> Self {
        HostError::Native {
            message: message.into(),
        }
    }
}
