//! Byte-addressed linear memory

use crate::error::HostError;

/// A fixed-size, zero-initialized byte array addressed by `u32`
///
/// Multi-byte values are little-endian and may be unaligned. Every access is
/// bounds-checked; nothing wraps around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearMemory {
    bytes: Vec<u8>,
}

/// A value with a fixed little-endian layout in memory
pub trait MemoryValue: Copy {
    const SIZE: usize;

    fn read_le(bytes: &[u8]) -> Self;
    fn write_le(self, bytes: &mut [u8]);
}

macro_rules! impl_memory_value {
    ($($t:ty),+) => {
        $(
            impl MemoryValue for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(bytes);
                    <$t>::from_le_bytes(buf)
                }

                #[inline]
                fn write_le(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_memory_value!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow `len` bytes at `address`
    pub fn read(&self, address: u32, len: usize) -> Result<&[u8], HostError> {
        let range = self.range(address, len)?;
        Ok(&self.bytes[range])
    }

    /// Copy `data` to `address`
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<(), HostError> {
        let range = self.range(address, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    pub fn load<T: MemoryValue>(&self, address: u32) -> Result<T, HostError> {
        self.read(address, T::SIZE).map(T::read_le)
    }

    pub fn store<T: MemoryValue>(&mut self, address: u32, value: T) -> Result<(), HostError> {
        let range = self.range(address, T::SIZE)?;
        value.write_le(&mut self.bytes[range]);
        Ok(())
    }

    /// Set `len` bytes at `address` to `value`
    pub fn fill(&mut self, address: u32, value: u8, len: usize) -> Result<(), HostError> {
        let range = self.range(address, len)?;
        self.bytes[range].fill(value);
        Ok(())
    }

    /// Copy `len` bytes from `src` to `dst`; the ranges may overlap
    pub fn copy_within(&mut self, src: u32, dst: u32, len: usize) -> Result<(), HostError> {
        let from = self.range(src, len)?;
        let to = self.range(dst, len)?;
        self.bytes.copy_within(from, to.start);
        Ok(())
    }

    fn range(&self, address: u32, len: usize) -> Result<std::ops::Range<usize>, HostError> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(HostError::OutOfBounds {
                address,
                len,
                size: self.bytes.len(),
            }),
        }
    }
}
