//! Low-level bit read and write utilities for byte slices.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte,
//! and multi-bit values are stored big-endian across byte boundaries.

use crate::errors::{ReadError, WriteError};

/// Number of significant bits in `value` (0 for 0).
pub fn bit_length(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

fn range_fits(data: &[u8], bit_pos: usize, n: usize) -> bool {
    bit_pos
        .checked_add(n)
        .is_some_and(|end| end <= data.len() * 8)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, ReadError> {
    if n > 64 {
        return Err(ReadError::TooManyBits(n));
    }

    if !range_fits(data, bit_pos, n) {
        return Err(ReadError::OutOfBounds);
    }

    let mut value = 0u64;
    let mut pos = bit_pos;
    let mut remaining = n;

    while remaining > 0 {
        let bit_in_byte = pos % 8;
        let take = remaining.min(8 - bit_in_byte);
        let shift = 8 - bit_in_byte - take;
        let mask = (0xFFu16 >> (8 - take)) as u8;
        let part = (data[pos / 8] >> shift) & mask;

        // `take` is at most 8, so this never shifts a full u64 out.
        value = (value << take) | part as u64;
        pos += take;
        remaining -= take;
    }

    Ok(value)
}

/// Writes the low `n` bits of `value` starting at `bit_pos`. MSB-first.
///
/// Bits outside `[bit_pos, bit_pos + n)` are left untouched. Fails without
/// modifying `data` if `value` needs more than `n` bits or the range does not
/// fit in the buffer.
pub fn write_bits_at(data: &mut [u8], bit_pos: usize, n: usize, value: u64) -> Result<(), WriteError> {
    if n > 64 {
        return Err(WriteError::TooManyBits(n));
    }

    if bit_length(value) > n {
        return Err(WriteError::Overflow { value, bits: n });
    }

    if !range_fits(data, bit_pos, n) {
        return Err(WriteError::OutOfBounds);
    }

    let mut pos = bit_pos;
    let mut remaining = n;

    while remaining > 0 {
        let bit_in_byte = pos % 8;
        let take = remaining.min(8 - bit_in_byte);
        let shift = 8 - bit_in_byte - take;
        let mask = (0xFFu16 >> (8 - take)) as u8;
        let part = ((value >> (remaining - take)) as u8) & mask;

        let byte = &mut data[pos / 8];
        *byte = (*byte & !(mask << shift)) | (part << shift);

        pos += take;
        remaining -= take;
    }

    Ok(())
}
