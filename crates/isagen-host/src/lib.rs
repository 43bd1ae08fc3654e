//! isagen host - host-call marshalling
//!
//! Binds native Rust functions of arity 1 to 16 as host callbacks that
//! exchange arguments and results through a machine's operand stack:
//! - [`StackType`] / [`StackTypes`]: values and tuples ↔ stack slots
//! - [`HostFunc`]: adapters for `Fn(T1..Tn) -> R` and `Fn(&mut Machine, T1..Tn) -> R`
//! - [`Machine`]: operand stack, linear memory and function registry

/// isagen-host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod func;
pub mod machine;
pub mod marshal;
pub mod memory;
pub mod result;
pub mod stack;
pub mod value;

// Re-export commonly used types
pub use error::HostError;
pub use func::{FuncSignature, HostFunc, HostFunction, Plain, WithMachine};
pub use machine::{FuncRef, Machine, MachineConfig};
pub use marshal::{StackTypes, MAX_ARITY};
pub use memory::{LinearMemory, MemoryValue};
pub use result::HostResult;
pub use stack::OperandStack;
pub use value::{StackType, StackValue};
