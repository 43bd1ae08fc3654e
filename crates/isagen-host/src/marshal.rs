//! Tuple ↔ stack-slot marshalling
//!
//! [`StackTypes`] is implemented for `()`, for every single [`StackType`],
//! and for tuples of 1 to 16 of them. Values occupy consecutive slots left
//! to right, one slot each.

use crate::value::{StackType, StackValue};
use isagen_tables::ValueType;

/// Largest tuple arity with a marshalling implementation
pub const MAX_ARITY: usize = 16;

/// An ordered group of stack values
pub trait StackTypes: Sized {
    /// Slot kinds, left to right
    const KINDS: &'static [ValueType];

    /// Write into `dst`, which holds exactly `KINDS.len()` slots
    fn write_slots(self, dst: &mut [StackValue]);

    /// Read back from `src`, which holds exactly `KINDS.len()` slots
    fn read_slots(src: &[StackValue]) -> Self;
}

impl StackTypes for () {
    const KINDS: &'static [ValueType] = &[];

    #[inline(always)]
    fn write_slots(self, _dst: &mut [StackValue]) {}

    #[inline(always)]
    fn read_slots(_src: &[StackValue]) -> Self {}
}

impl<T: StackType> StackTypes for T {
    const KINDS: &'static [ValueType] = &[T::KIND];

    #[inline(always)]
    fn write_slots(self, dst: &mut [StackValue]) {
        dst[0] = self.to_stack();
    }

    #[inline(always)]
    fn read_slots(src: &[StackValue]) -> Self {
        T::from_stack(src[0])
    }
}

macro_rules! impl_stack_types {
    ($($t:ident $v:ident $i:tt),+) => {
        impl<$($t: StackType),+> StackTypes for ($($t,)+) {
            const KINDS: &'static [ValueType] = &[$($t::KIND),+];

            #[inline(always)]
            fn write_slots(self, dst: &mut [StackValue]) {
                let ($($v,)+) = self;
                $(dst[$i] = $v.to_stack();)+
            }

            #[inline(always)]
            fn read_slots(src: &[StackValue]) -> Self {
                ($($t::from_stack(src[$i]),)+)
            }
        }
    };
}

impl_stack_types!(T0 a0 0);
impl_stack_types!(T0 a0 0, T1 a1 1);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10, T11 a11 11);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10, T11 a11 11, T12 a12 12);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10, T11 a11 11, T12 a12 12, T13 a13 13);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10, T11 a11 11, T12 a12 12, T13 a13 13, T14 a14 14);
impl_stack_types!(T0 a0 0, T1 a1 1, T2 a2 2, T3 a3 3, T4 a4 4, T5 a5 5, T6 a6 6, T7 a7 7, T8 a8 8, T9 a9 9, T10 a10 10, T11 a11 11, T12 a12 12, T13 a13 13, T14 a14 14, T15 a15 15);
