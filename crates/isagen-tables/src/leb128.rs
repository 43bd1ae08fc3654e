//! Unsigned LEB128 reading for prefixed-opcode suffixes

use crate::error::DecodeError;

/// Read an unsigned 32-bit LEB128 integer starting at `offset`
///
/// Returns the value and the number of bytes consumed. At most five bytes
/// are read, and unused high bits of the fifth byte must be zero.
pub fn read_u32(bytes: &[u8], offset: usize) -> Result<(u32, usize), DecodeError> {
    let mut result: u32 = 0;
    let mut shift = 0;
    let mut len = 0;

    loop {
        let at = offset + len;
        let byte = *bytes.get(at).ok_or(DecodeError::UnexpectedEnd { offset: at })?;
        len += 1;

        if shift == 28 && byte & 0xf0 != 0 {
            return Err(DecodeError::MalformedInteger { offset });
        }
        result |= u32::from(byte & 0x7f) << shift;

        if byte & 0x80 == 0 {
            return Ok((result, len));
        }
        shift += 7;
        if shift > 28 {
            return Err(DecodeError::MalformedInteger { offset });
        }
    }
}
