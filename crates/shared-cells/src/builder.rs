//! # Cell Builder
//!
//! Bit-level writer. Every `store_*` call checks capacity first, so a failed
//! write leaves the builder unchanged.

use crate::address::MsgAddress;
use crate::cell::{ArcCell, Cell, MAX_DATA_BITS, MAX_REFS};
use crate::coins::Coins;
use crate::errors::CellError;

/// Accumulates bits and refs for a new cell.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<ArcCell>,
}

impl CellBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Free data bits.
    #[must_use]
    pub fn bits_left(&self) -> usize {
        MAX_DATA_BITS - self.bit_len
    }

    /// Free ref slots.
    #[must_use]
    pub fn refs_left(&self) -> usize {
        MAX_REFS - self.refs.len()
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        if bits > self.bits_left() {
            return Err(CellError::BitOverflow {
                requested: bits,
                available: self.bits_left(),
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Stores one bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Stores `value` as a big-endian unsigned integer of `bits` width (≤ 128).
    pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, CellError> {
        if bits > 128 {
            return Err(CellError::InvalidWidth(bits));
        }
        if bits < 128 && value >> bits != 0 {
            return Err(CellError::ValueTooWide { bits });
        }
        self.ensure_bits(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Stores an 8-bit unsigned integer.
    pub fn store_u8(&mut self, value: u8) -> Result<&mut Self, CellError> {
        self.store_uint(u128::from(value), 8)
    }

    /// Stores an 8-bit two's complement integer.
    pub fn store_i8(&mut self, value: i8) -> Result<&mut Self, CellError> {
        self.store_uint(u128::from(value as u8), 8)
    }

    /// Stores a 32-bit unsigned integer.
    pub fn store_u32(&mut self, value: u32) -> Result<&mut Self, CellError> {
        self.store_uint(u128::from(value), 32)
    }

    /// Stores a 64-bit unsigned integer.
    pub fn store_u64(&mut self, value: u64) -> Result<&mut Self, CellError> {
        self.store_uint(u128::from(value), 64)
    }

    /// Stores whole bytes.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for byte in bytes {
                for i in (0..8).rev() {
                    self.push_bit((byte >> i) & 1 == 1);
                }
            }
        }
        Ok(self)
    }

    /// Appends a child reference.
    pub fn store_ref(&mut self, cell: ArcCell) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_REFS {
            return Err(CellError::RefOverflow { max: MAX_REFS });
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Stores `Maybe ^Cell`: a presence bit, then the ref when present.
    pub fn store_maybe_ref(&mut self, cell: Option<ArcCell>) -> Result<&mut Self, CellError> {
        match cell {
            Some(cell) => {
                if self.refs.len() >= MAX_REFS {
                    return Err(CellError::RefOverflow { max: MAX_REFS });
                }
                self.store_bit(true)?;
                self.refs.push(cell);
            }
            None => {
                self.store_bit(false)?;
            }
        }
        Ok(self)
    }

    /// Stores a standard internal address.
    pub fn store_address(&mut self, address: &MsgAddress) -> Result<&mut Self, CellError> {
        address.store(self)?;
        Ok(self)
    }

    /// Stores a coin amount as `VarUInteger 16`.
    pub fn store_coins(&mut self, coins: Coins) -> Result<&mut Self, CellError> {
        coins.store(self)?;
        Ok(self)
    }

    /// Finishes the cell.
    pub fn build(&self) -> Result<Cell, CellError> {
        Cell::new(self.data.clone(), self.bit_len, self.refs.clone())
    }
}
