//! Execution context for host calls
//!
//! A [`Machine`] owns one operand stack, one linear memory and a registry of
//! host functions. Adapters only ever touch the stack of the machine they
//! are handed, so separate machines can run on separate threads while
//! sharing the same [`HostFunction`]s.

use crate::error::HostError;
use crate::func::{FuncSignature, HostFunction};
use crate::marshal::StackTypes;
use crate::memory::LinearMemory;
use crate::stack::OperandStack;
use isagen_config::ProjectConfig;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};

/// Sizes of a machine's stack and memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub stack_slots: usize,
    pub memory_bytes: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_slots: isagen_config::project::DEFAULT_STACK_SLOTS,
            memory_bytes: isagen_config::project::DEFAULT_MEMORY_BYTES,
        }
    }
}

impl From<&ProjectConfig> for MachineConfig {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            stack_slots: config.stack_slots(),
            memory_bytes: config.memory_bytes(),
        }
    }
}

/// Handle to a function registered with a [`Machine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(usize);

impl FuncRef {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FuncRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct FuncEntry {
    name: String,
    signature: FuncSignature,
    function: Option<HostFunction>,
}

#[derive(Debug)]
pub struct Machine {
    stack: OperandStack,
    memory: LinearMemory,
    functions: Vec<FuncEntry>,
    names: HashMap<String, FuncRef>,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        debug!(
            stack_slots = config.stack_slots,
            memory_bytes = config.memory_bytes,
            "machine created"
        );
        Self {
            stack: OperandStack::new(config.stack_slots),
            memory: LinearMemory::new(config.memory_bytes),
            functions: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    /// Add a host function under its own name
    pub fn register(&mut self, function: HostFunction) -> Result<FuncRef, HostError> {
        let func = self.insert(function.name().to_string(), function.signature())?;
        self.functions[func.0].function = Some(function);
        Ok(func)
    }

    /// Reserve a function slot whose implementation is bound later
    ///
    /// Lets a host function refer to itself (or to functions registered
    /// after it) through a handle it captures up front.
    pub fn declare<P: StackTypes, R: StackTypes>(
        &mut self,
        name: impl Into<String>,
    ) -> Result<FuncRef, HostError> {
        self.insert(name.into(), FuncSignature::of::<P, R>())
    }

    /// Supply the implementation of a declared function
    pub fn bind(&mut self, func: FuncRef, function: HostFunction) -> Result<(), HostError> {
        let entry = self
            .functions
            .get_mut(func.0)
            .ok_or(HostError::UnknownFunction { index: func.0 })?;
        if entry.function.is_some() {
            return Err(HostError::AlreadyBound {
                name: entry.name.clone(),
            });
        }
        if entry.signature != function.signature() {
            return Err(HostError::SignatureMismatch {
                expected: entry.signature,
                actual: function.signature(),
            });
        }
        entry.function = Some(function);
        Ok(())
    }

    fn insert(&mut self, name: String, signature: FuncSignature) -> Result<FuncRef, HostError> {
        if self.names.contains_key(&name) {
            return Err(HostError::DuplicateFunction { name });
        }
        let func = FuncRef(self.functions.len());
        debug!(function = %name, %signature, index = func.0, "function registered");
        self.names.insert(name.clone(), func);
        self.functions.push(FuncEntry {
            name,
            signature,
            function: None,
        });
        Ok(func)
    }

    pub fn lookup(&self, name: &str) -> Option<FuncRef> {
        self.names.get(name).copied()
    }

    pub fn signature(&self, func: FuncRef) -> Result<FuncSignature, HostError> {
        self.entry(func).map(|entry| entry.signature)
    }

    fn entry(&self, func: FuncRef) -> Result<&FuncEntry, HostError> {
        self.functions
            .get(func.0)
            .ok_or(HostError::UnknownFunction { index: func.0 })
    }

    fn function(&self, func: FuncRef) -> Result<HostFunction, HostError> {
        let entry = self.entry(func)?;
        entry
            .function
            .clone()
            .ok_or_else(|| HostError::UnboundFunction {
                name: entry.name.clone(),
            })
    }

    /// Run `func` on the arguments already on the operand stack
    ///
    /// This is the interpreter's entry point: arguments were pushed by
    /// preceding instructions and the results stay on the stack.
    pub fn invoke(&mut self, func: FuncRef) -> Result<(), HostError> {
        let function = self.function(func)?;
        function.invoke(self)
    }

    /// Call `func` with typed arguments and return its typed results
    ///
    /// Whatever this call pushed is dropped again, also on failure, so the
    /// stack is never left taller than it was found. Values below the
    /// arguments that a `WithMachine` function pops itself stay popped.
    #[instrument(level = "trace", skip(self, args))]
    pub fn call<P: StackTypes, R: StackTypes>(
        &mut self,
        func: FuncRef,
        args: P,
    ) -> Result<R, HostError> {
        let function = self.function(func)?;
        let expected = function.signature();
        let actual = FuncSignature::of::<P, R>();
        if expected != actual {
            return Err(HostError::SignatureMismatch { expected, actual });
        }

        let base = self.stack.len();
        self.stack.push_values(args)?;
        let results = function
            .invoke(self)
            .and_then(|()| self.stack.pop_values::<R>());
        self.stack.truncate(base);
        results
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StackValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_project() {
        let project = ProjectConfig::parse("[machine]\nstack_slots = 8\n").unwrap();
        assert_eq!(
            MachineConfig::from(&project),
            MachineConfig {
                stack_slots: 8,
                memory_bytes: 65536
            }
        );
    }

    #[test]
    fn test_duplicate_name() {
        let mut machine = Machine::default();
        machine.register(HostFunction::new("f", |x: i32| x)).unwrap();
        assert_eq!(
            machine.register(HostFunction::new("f", |x: i64| x)),
            Err(HostError::DuplicateFunction {
                name: "f".to_string()
            })
        );
    }

    #[test]
    fn test_call_drops_only_what_it_pushed() {
        let mut machine = Machine::default();
        let fail = machine
            .register(HostFunction::new(
                "fail",
                |m: &mut Machine, x: i32| -> Result<i32, HostError> {
                    m.stack_mut().push(StackValue::from_i32(x))?;
                    Err(HostError::native("boom"))
                },
            ))
            .unwrap();
        let steal = machine
            .register(HostFunction::new(
                "steal",
                |m: &mut Machine, x: i32| -> Result<i32, HostError> {
                    Ok(m.stack_mut().pop()?.as_i32() + x)
                },
            ))
            .unwrap();

        machine.stack_mut().push_values((1i32, 2i32)).unwrap();
        assert!(machine.call::<_, i32>(fail, 5).is_err());
        assert_eq!(machine.stack().len(), 2);

        assert_eq!(machine.call::<_, i32>(steal, 10), Ok(12));
        assert_eq!(machine.stack().len(), 1);
        assert_eq!(machine.stack().peek(), Some(StackValue::from_i32(1)));
    }

    #[test]
    fn test_lookup() {
        let mut machine = Machine::default();
        let f = machine.register(HostFunction::new("f", |x: i32| x)).unwrap();
        assert_eq!(machine.lookup("f"), Some(f));
        assert_eq!(machine.lookup("g"), None);
    }
}
