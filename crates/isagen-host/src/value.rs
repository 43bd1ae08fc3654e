//! Stack slot representation of values

use isagen_tables::ValueType;

/// One operand-stack slot, holding the raw bits of a value
///
/// Integers are stored zero-extended, floats by their bit pattern, so a
/// round trip through a slot is bit-exact (NaN payloads included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StackValue(u64);

impl StackValue {
    #[inline(always)]
    pub fn from_bits(bits: u64) -> Self {
        StackValue(bits)
    }

    #[inline(always)]
    pub fn bits(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn from_i32(value: i32) -> Self {
        StackValue(value as u32 as u64)
    }

    #[inline(always)]
    pub fn as_i32(self) -> i32 {
        self.0 as u32 as i32
    }

    #[inline(always)]
    pub fn from_i64(value: i64) -> Self {
        StackValue(value as u64)
    }

    #[inline(always)]
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    #[inline(always)]
    pub fn from_f32(value: f32) -> Self {
        StackValue(value.to_bits() as u64)
    }

    #[inline(always)]
    pub fn as_f32(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }

    #[inline(always)]
    pub fn from_f64(value: f64) -> Self {
        StackValue(value.to_bits())
    }

    #[inline(always)]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// A Rust type that occupies exactly one stack slot
pub trait StackType: Copy + 'static {
    /// Value type the slot holds, as seen by the validator
    const KIND: ValueType;

    fn to_stack(self) -> StackValue;
    fn from_stack(value: StackValue) -> Self;
}

impl StackType for i32 {
    const KIND: ValueType = ValueType::I32;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_i32(self)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_i32()
    }
}

impl StackType for u32 {
    const KIND: ValueType = ValueType::I32;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_i32(self as i32)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_i32() as u32
    }
}

impl StackType for i64 {
    const KIND: ValueType = ValueType::I64;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_i64(self)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_i64()
    }
}

impl StackType for u64 {
    const KIND: ValueType = ValueType::I64;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_i64(self as i64)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_i64() as u64
    }
}

impl StackType for f32 {
    const KIND: ValueType = ValueType::F32;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_f32(self)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_f32()
    }
}

impl StackType for f64 {
    const KIND: ValueType = ValueType::F64;

    #[inline(always)]
    fn to_stack(self) -> StackValue {
        StackValue::from_f64(self)
    }

    #[inline(always)]
    fn from_stack(value: StackValue) -> Self {
        value.as_f64()
    }
}
