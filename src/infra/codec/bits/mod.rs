//! Bit cursors over byte slices. Fields are packed LSB-first: bit `n` of the
//! stream is bit `n % 8` of byte `n / 8`, and the low bits of a field land in
//! the lower-addressed byte. This is the layout the mailbox peer produces for
//! both the 15-byte receive header and the 5-byte transmit header, so no
//! compiler bitfield layout is ever relied upon.
use crate::error::{BitReaderError, BitWriterError};

/// Widest field a single call may move.
const MAX_FIELD_BITS: u8 = 64;

#[inline]
fn low_mask(width: usize) -> u8 {
    ((1u16 << width) - 1) as u8
}

//==================================================================================BITREADER
/// Reads LSB-first fields from a borrowed buffer without copying it.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Bits consumed since the start of `buffer`.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    fn check(&self, width: u8) -> Result<(), BitReaderError> {
        if !(1..=MAX_FIELD_BITS).contains(&width) {
            return Err(BitReaderError::TooLongForType {
                max: MAX_FIELD_BITS,
                asked: width,
            });
        }
        if width as usize > self.remaining_bits() {
            return Err(BitReaderError::OutOfBounds {
                asked: width as usize,
                available: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Read a `width`-bit field (1..=64) and advance past it.
    pub fn read_bits(&mut self, width: u8) -> Result<u64, BitReaderError> {
        self.check(width)?;

        let mut value = 0u64;
        let mut filled = 0usize;
        while filled < width as usize {
            let pos = self.bit_cursor + filled;
            let shift = pos % 8;
            let take = (8 - shift).min(width as usize - filled);
            let chunk = (self.buffer[pos / 8] >> shift) & low_mask(take);
            value |= (chunk as u64) << filled;
            filled += take;
        }

        self.bit_cursor += width as usize;
        Ok(value)
    }

    /// Single-bit field as a flag.
    pub fn read_flag(&mut self) -> Result<bool, BitReaderError> {
        self.read_bits(1).map(|bit| bit == 1)
    }

    pub fn read_u8(&mut self, width: u8) -> Result<u8, BitReaderError> {
        if width > 8 {
            return Err(BitReaderError::TooLongForType { max: 8, asked: width });
        }
        self.read_bits(width).map(|v| v as u8)
    }

    pub fn read_u16(&mut self, width: u8) -> Result<u16, BitReaderError> {
        if width > 16 {
            return Err(BitReaderError::TooLongForType {
                max: 16,
                asked: width,
            });
        }
        self.read_bits(width).map(|v| v as u16)
    }

    pub fn read_u32(&mut self, width: u8) -> Result<u32, BitReaderError> {
        if width > 32 {
            return Err(BitReaderError::TooLongForType {
                max: 32,
                asked: width,
            });
        }
        self.read_bits(width).map(|v| v as u32)
    }

    /// Skip reserved bits.
    pub fn skip(&mut self, width: u8) -> Result<(), BitReaderError> {
        self.check(width)?;
        self.bit_cursor += width as usize;
        Ok(())
    }

    /// Every byte after the cursor. The cursor must be byte aligned.
    pub fn tail(&mut self) -> Result<&'a [u8], BitReaderError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitReaderError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        let rest = &self.buffer[self.bit_cursor / 8..];
        self.bit_cursor = self.buffer.len() * 8;
        Ok(rest)
    }
}

//==================================================================================BITWRITER
/// Lays LSB-first fields into a mutable buffer. Bits outside the written
/// fields keep their previous value, so callers zero the buffer first when
/// reserved bits must be clear.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Cursor position in bits (useful to derive the final length).
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    fn check(&self, width: u8) -> Result<(), BitWriterError> {
        if !(1..=MAX_FIELD_BITS).contains(&width) {
            return Err(BitWriterError::TooLongForType {
                max: MAX_FIELD_BITS,
                asked: width,
            });
        }
        if width as usize > self.remaining_bits() {
            return Err(BitWriterError::OutOfBounds {
                asked: width as usize,
                available: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Write the low `width` bits of `value` (1..=64) and advance past them.
    pub fn write_bits(&mut self, value: u64, width: u8) -> Result<(), BitWriterError> {
        self.check(width)?;

        let mut pending = value;
        let mut written = 0usize;
        while written < width as usize {
            let pos = self.bit_cursor + written;
            let shift = pos % 8;
            let put = (8 - shift).min(width as usize - written);
            let mask = low_mask(put);
            let byte = &mut self.buffer[pos / 8];
            *byte &= !(mask << shift);
            *byte |= (pending as u8 & mask) << shift;
            pending >>= put;
            written += put;
        }

        self.bit_cursor += width as usize;
        Ok(())
    }

    pub fn write_flag(&mut self, flag: bool) -> Result<(), BitWriterError> {
        self.write_bits(flag as u64, 1)
    }

    /// Leave reserved bits untouched.
    pub fn skip(&mut self, width: u8) -> Result<(), BitWriterError> {
        self.check(width)?;
        self.bit_cursor += width as usize;
        Ok(())
    }

    /// Copy whole bytes at the (byte aligned) cursor.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), BitWriterError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitWriterError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        let start = self.bit_cursor / 8;
        let end = start + slice.len();
        if end > self.buffer.len() {
            return Err(BitWriterError::OutOfBounds {
                asked: slice.len(),
                available: self.buffer.len() - start,
            });
        }
        self.buffer[start..end].copy_from_slice(slice);
        self.bit_cursor = end * 8;
        Ok(())
    }
}
