//! Host function adapters
//!
//! Any `Fn(T1, ..., Tn) -> R` (or `Fn(&mut Machine, T1, ..., Tn) -> R`) with
//! 1 to 16 [`StackType`] parameters can be wrapped in a [`HostFunction`].
//! The adapter follows one calling convention:
//!
//! 1. lower the stack length by `n`
//! 2. read the arguments from the slots just released
//! 3. call the function
//! 4. write the results at the stack top and raise the length by their count
//!
//! Because the length drops before the call, a function that re-enters the
//! machine pushes above its own arguments' old slots, never onto them.
//!
//! # Example
//!
//! ```
//! use isagen_host::{HostFunction, Machine, MachineConfig};
//!
//! let mut machine = Machine::new(MachineConfig::default());
//! let add = machine
//!     .register(HostFunction::new("add", |a: i32, b: i32| a.wrapping_add(b)))
//!     .unwrap();
//! assert_eq!(machine.call::<_, i32>(add, (3, 4)).unwrap(), 7);
//! ```

use crate::error::HostError;
use crate::machine::Machine;
use crate::marshal::StackTypes;
use crate::result::HostResult;
use crate::value::StackType;
use isagen_tables::ValueType;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Adapter mode for functions that only see their arguments
pub struct Plain;

/// Adapter mode for functions that also receive `&mut Machine`
pub struct WithMachine;

/// A native function callable with `Params` and returning `Results`
///
/// Implemented for closures and fn items of arity 1 to 16. `Mode` only
/// disambiguates the two adapter shapes during inference.
pub trait HostFunc<Params, Results, Mode>: Send + Sync + 'static {
    /// Run the adapter against the machine's operand stack
    fn call(&self, machine: &mut Machine) -> Result<(), HostError>;
}

macro_rules! impl_host_func {
    ($($t:ident $v:ident),+) => {
        impl<F, R, $($t: StackType),+> HostFunc<($($t,)+), R::Types, Plain> for F
        where
            F: Fn($($t),+) -> R + Send + Sync + 'static,
            R: HostResult,
        {
            #[inline]
            fn call(&self, machine: &mut Machine) -> Result<(), HostError> {
                let ($($v,)+) = machine.stack_mut().pop_values::<($($t,)+)>()?;
                let results = (self)($($v),+).into_result()?;
                machine.stack_mut().push_values(results)
            }
        }

        impl<F, R, $($t: StackType),+> HostFunc<($($t,)+), R::Types, WithMachine> for F
        where
            F: Fn(&mut Machine, $($t),+) -> R + Send + Sync + 'static,
            R: HostResult,
        {
            #[inline]
            fn call(&self, machine: &mut Machine) -> Result<(), HostError> {
                let ($($v,)+) = machine.stack_mut().pop_values::<($($t,)+)>()?;
                let results = (self)(machine, $($v),+).into_result()?;
                machine.stack_mut().push_values(results)
            }
        }
    };
}

impl_host_func!(T0 a0);
impl_host_func!(T0 a0, T1 a1);
impl_host_func!(T0 a0, T1 a1, T2 a2);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10, T11 a11);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10, T11 a11, T12 a12);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10, T11 a11, T12 a12, T13 a13);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10, T11 a11, T12 a12, T13 a13, T14 a14);
impl_host_func!(T0 a0, T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8, T9 a9, T10 a10, T11 a11, T12 a12, T13 a13, T14 a14, T15 a15);

/// Parameter and result kinds of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncSignature {
    pub params: &'static [ValueType],
    pub results: &'static [ValueType],
}

impl FuncSignature {
    pub fn of<P: StackTypes, R: StackTypes>() -> Self {
        Self {
            params: P::KINDS,
            results: R::KINDS,
        }
    }
}

impl fmt::Display for FuncSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, types: &[ValueType]) -> fmt::Result {
            f.write_str("(")?;
            for (i, ty) in types.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", ty)?;
            }
            f.write_str(")")
        }
        list(f, self.params)?;
        f.write_str(" -> ")?;
        list(f, self.results)
    }
}

type Adapter = dyn Fn(&mut Machine) -> Result<(), HostError> + Send + Sync;

/// A named, type-erased host function
#[derive(Clone)]
pub struct HostFunction {
    name: String,
    signature: FuncSignature,
    adapter: Arc<Adapter>,
}

impl HostFunction {
    /// Wrap `func`; parameter and result kinds are taken from its type
    pub fn new<P, R, M, F>(name: impl Into<String>, func: F) -> Self
    where
        P: StackTypes + 'static,
        R: StackTypes + 'static,
        M: 'static,
        F: HostFunc<P, R, M>,
    {
        Self {
            name: name.into(),
            signature: FuncSignature::of::<P, R>(),
            adapter: Arc::new(move |machine: &mut Machine| {
                <F as HostFunc<P, R, M>>::call(&func, machine)
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> FuncSignature {
        self.signature
    }

    /// Run against the arguments already on `machine`'s stack
    #[inline]
    pub fn invoke(&self, machine: &mut Machine) -> Result<(), HostError> {
        trace!(function = %self.name, signature = %self.signature, "host call");
        (self.adapter)(machine)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_from_closure_type() {
        let f = HostFunction::new("mix", |_: i32, _: f64, _: u64| (1.0f32, 2i64));
        assert_eq!(
            f.signature(),
            FuncSignature {
                params: &[ValueType::I32, ValueType::F64, ValueType::I64],
                results: &[ValueType::F32, ValueType::I64],
            }
        );
        assert_eq!(f.signature().to_string(), "(i32, f64, i64) -> (f32, i64)");
    }

    #[test]
    fn test_unit_and_fallible_results() {
        let f = HostFunction::new("log", |_: i32| {});
        assert_eq!(f.signature().results, &[] as &[ValueType]);

        let g = HostFunction::new("check", |x: i32| -> Result<i32, HostError> {
            if x < 0 {
                Err(HostError::native("negative"))
            } else {
                Ok(x)
            }
        });
        assert_eq!(g.signature().to_string(), "(i32) -> (i32)");
    }
}
