//! Operand stack
//!
//! A fixed-capacity slot buffer with a recorded length. Slots above the
//! length stay addressable: host adapters shrink the length before reading
//! their arguments, and write results at the top before growing it again.

use crate::error::HostError;
use crate::marshal::StackTypes;
use crate::value::StackValue;

#[derive(Debug, Clone)]
pub struct OperandStack {
    slots: Box<[StackValue]>,
    len: usize,
}

impl OperandStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![StackValue::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live values, bottom first
    pub fn as_slice(&self) -> &[StackValue] {
        &self.slots[..self.len]
    }

    /// Lower the recorded length by `n` without touching the slots
    #[inline]
    pub fn shrink(&mut self, n: usize) -> Result<(), HostError> {
        if n > self.len {
            return Err(HostError::StackUnderflow {
                needed: n,
                available: self.len,
            });
        }
        self.len -= n;
        Ok(())
    }

    /// Raise the recorded length by `n`; the slots must already hold values
    #[inline]
    pub fn grow(&mut self, n: usize) -> Result<(), HostError> {
        let requested = self.len.saturating_add(n);
        if requested > self.capacity() {
            return Err(HostError::StackOverflow {
                requested,
                capacity: self.capacity(),
            });
        }
        self.len = requested;
        Ok(())
    }

    /// Drop everything above `len`
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub fn push(&mut self, value: StackValue) -> Result<(), HostError> {
        self.slots_mut(self.len, 1)?[0] = value;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<StackValue, HostError> {
        self.shrink(1)?;
        Ok(self.slots[self.len])
    }

    pub fn peek(&self) -> Option<StackValue> {
        self.as_slice().last().copied()
    }

    /// `n` consecutive slots starting at `at`, live or not
    #[inline]
    pub fn slots(&self, at: usize, n: usize) -> Result<&[StackValue], HostError> {
        let end = self.end_of(at, n)?;
        Ok(&self.slots[at..end])
    }

    #[inline]
    pub fn slots_mut(&mut self, at: usize, n: usize) -> Result<&mut [StackValue], HostError> {
        let end = self.end_of(at, n)?;
        Ok(&mut self.slots[at..end])
    }

    fn end_of(&self, at: usize, n: usize) -> Result<usize, HostError> {
        match at.checked_add(n) {
            Some(end) if end <= self.capacity() => Ok(end),
            _ => Err(HostError::StackOverflow {
                requested: at.saturating_add(n),
                capacity: self.capacity(),
            }),
        }
    }

    /// Write `values` at the top, left to right, then grow
    #[inline]
    pub fn push_values<T: StackTypes>(&mut self, values: T) -> Result<(), HostError> {
        let n = T::KINDS.len();
        values.write_slots(self.slots_mut(self.len, n)?);
        self.grow(n)
    }

    /// Shrink, then read the values that were on top, left to right
    #[inline]
    pub fn pop_values<T: StackTypes>(&mut self) -> Result<T, HostError> {
        let n = T::KINDS.len();
        self.shrink(n)?;
        Ok(T::read_slots(self.slots(self.len, n)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_pop() {
        let mut stack = OperandStack::new(2);
        stack.push(StackValue::from_i32(1)).unwrap();
        stack.push(StackValue::from_i32(2)).unwrap();

        assert_eq!(
            stack.push(StackValue::from_i32(3)),
            Err(HostError::StackOverflow {
                requested: 3,
                capacity: 2
            })
        );
        assert_eq!(stack.pop().map(StackValue::as_i32), Ok(2));
        assert_eq!(stack.pop().map(StackValue::as_i32), Ok(1));
        assert_eq!(
            stack.pop(),
            Err(HostError::StackUnderflow {
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_slots_above_len_stay_readable() {
        let mut stack = OperandStack::new(4);
        stack.push_values((7i32, 8i64)).unwrap();
        stack.shrink(2).unwrap();

        assert!(stack.is_empty());
        assert_eq!(stack.slots(0, 2).unwrap()[1].as_i64(), 8);
    }

    #[test]
    fn test_values_are_left_to_right() {
        let mut stack = OperandStack::new(4);
        stack.push(StackValue::from_i32(-1)).unwrap();
        stack.push_values((1i32, 2i32, 3i32)).unwrap();

        let bits: Vec<i32> = stack.as_slice().iter().map(|v| v.as_i32()).collect();
        assert_eq!(bits, vec![-1, 1, 2, 3]);
        assert_eq!(stack.pop_values::<(i32, i32)>(), Ok((2, 3)));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_truncate_never_grows() {
        let mut stack = OperandStack::new(4);
        stack.push_values((1i32, 2i32)).unwrap();
        stack.truncate(3);
        assert_eq!(stack.len(), 2);
        stack.truncate(1);
        assert_eq!(stack.len(), 1);
    }
}
