//! Write-then-read properties for every marshalled arity

use isagen_host::{OperandStack, StackType, StackTypes, StackValue, MAX_ARITY};
use proptest::prelude::*;

/// Build a value from raw bits and compare values bit for bit
trait Bits: StackType {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

impl Bits for i32 {
    fn from_raw(raw: u64) -> Self {
        raw as u32 as i32
    }
    fn raw(self) -> u64 {
        self as u32 as u64
    }
}

impl Bits for u32 {
    fn from_raw(raw: u64) -> Self {
        raw as u32
    }
    fn raw(self) -> u64 {
        self as u64
    }
}

impl Bits for i64 {
    fn from_raw(raw: u64) -> Self {
        raw as i64
    }
    fn raw(self) -> u64 {
        self as u64
    }
}

impl Bits for u64 {
    fn from_raw(raw: u64) -> Self {
        raw
    }
    fn raw(self) -> u64 {
        self
    }
}

impl Bits for f32 {
    fn from_raw(raw: u64) -> Self {
        f32::from_bits(raw as u32)
    }
    fn raw(self) -> u64 {
        self.to_bits() as u64
    }
}

impl Bits for f64 {
    fn from_raw(raw: u64) -> Self {
        f64::from_bits(raw)
    }
    fn raw(self) -> u64 {
        self.to_bits()
    }
}

fn raw_words() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(any::<u64>(), MAX_ARITY)
}

macro_rules! round_trip {
    ($name:ident: $($t:ty => $i:tt),+) => {
        proptest! {
            #[test]
            fn $name(raw in raw_words(), below in 0usize..4) {
                type Tuple = ($($t,)+);
                let values: Tuple = ($(<$t as Bits>::from_raw(raw[$i]),)+);
                let n = <Tuple as StackTypes>::KINDS.len();

                // slice level
                let mut slots = vec![StackValue::default(); n];
                values.write_slots(&mut slots);
                let back = <Tuple as StackTypes>::read_slots(&slots);
                $(prop_assert_eq!(back.$i.raw(), values.$i.raw());)+

                // through the operand stack, above unrelated values
                let mut stack = OperandStack::new(n + below);
                for k in 0..below {
                    stack.push(StackValue::from_bits(k as u64)).unwrap();
                }
                stack.push_values(values).unwrap();
                prop_assert_eq!(stack.len(), below + n);
                let back: Tuple = stack.pop_values().unwrap();
                $(prop_assert_eq!(back.$i.raw(), values.$i.raw());)+
                prop_assert_eq!(stack.len(), below);
            }
        }
    };
}

round_trip!(arity_1: i32 => 0);
round_trip!(arity_2: i32 => 0, i32 => 1);
round_trip!(arity_3: f64 => 0, u64 => 1, f32 => 2);
round_trip!(arity_4: i64 => 0, u32 => 1, f32 => 2, f64 => 3);
round_trip!(arity_5: u32 => 0, i32 => 1, f64 => 2, i64 => 3, u64 => 4);
round_trip!(arity_6: i32 => 0, f64 => 1, u64 => 2, f32 => 3, i64 => 4, u32 => 5);
round_trip!(arity_7: f32 => 0, f32 => 1, i32 => 2, i64 => 3, f64 => 4, u32 => 5, u64 => 6);
round_trip!(arity_8: i64 => 0, i32 => 1, i64 => 2, i32 => 3, f64 => 4, f32 => 5, f64 => 6, f32 => 7);
round_trip!(arity_9: u64 => 0, u32 => 1, f64 => 2, f32 => 3, i64 => 4, i32 => 5, u64 => 6, u32 => 7, f64 => 8);
round_trip!(arity_10: i32 => 0, f64 => 1, u64 => 2, f32 => 3, i64 => 4, u32 => 5, i32 => 6, f64 => 7, u64 => 8, f32 => 9);
round_trip!(arity_11: f64 => 0, f64 => 1, f64 => 2, i32 => 3, i32 => 4, i32 => 5, f32 => 6, f32 => 7, u64 => 8, u64 => 9, i64 => 10);
round_trip!(arity_12: i32 => 0, i64 => 1, f32 => 2, f64 => 3, u32 => 4, u64 => 5, i32 => 6, i64 => 7, f32 => 8, f64 => 9, u32 => 10, u64 => 11);
round_trip!(arity_13: u64 => 0, i32 => 1, f64 => 2, f32 => 3, i64 => 4, u32 => 5, u64 => 6, i32 => 7, f64 => 8, f32 => 9, i64 => 10, u32 => 11, i32 => 12);
round_trip!(arity_14: f32 => 0, i64 => 1, u32 => 2, f64 => 3, i32 => 4, u64 => 5, f32 => 6, i64 => 7, u32 => 8, f64 => 9, i32 => 10, u64 => 11, f32 => 12, f64 => 13);
round_trip!(arity_15: i32 => 0, i32 => 1, i32 => 2, i32 => 3, i32 => 4, i64 => 5, i64 => 6, i64 => 7, i64 => 8, i64 => 9, f64 => 10, f64 => 11, f64 => 12, f64 => 13, f64 => 14);
round_trip!(arity_16: i32 => 0, f64 => 1, u64 => 2, f32 => 3, i64 => 4, u32 => 5, i32 => 6, f64 => 7, u64 => 8, f32 => 9, i64 => 10, u32 => 11, i32 => 12, f64 => 13, u64 => 14, f32 => 15);

#[test]
fn test_kinds_have_arity_length() {
    assert_eq!(<(i32,) as StackTypes>::KINDS.len(), 1);
    assert_eq!(
        <(i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32) as StackTypes>::KINDS.len(),
        MAX_ARITY
    );
}
