//! # Cell Slice
//!
//! Reading cursor over a cell. Mirrors the builder: every `store_*` has a
//! matching `load_*`. Reads past the end fail, they never pad.

use crate::address::MsgAddress;
use crate::cell::{ArcCell, Cell};
use crate::coins::Coins;
use crate::errors::CellError;

/// Cursor over the bits and refs of one cell.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    /// Opens a cursor at the start of `cell`.
    #[must_use]
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Unread data bits.
    #[must_use]
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// Unread refs.
    #[must_use]
    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    /// Returns true once all bits and refs have been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    /// Fails if anything is left unread.
    pub fn ensure_empty(&self) -> Result<(), CellError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CellError::TrailingData {
                bits: self.remaining_bits(),
                refs: self.remaining_refs(),
            })
        }
    }

    fn ensure_bits(&self, bits: usize) -> Result<(), CellError> {
        if bits > self.remaining_bits() {
            return Err(CellError::BitUnderflow {
                requested: bits,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    fn next_bit(&mut self) -> bool {
        let pos = self.bit_pos;
        self.bit_pos += 1;
        self.cell.data()[pos / 8] & (0x80 >> (pos % 8)) != 0
    }

    /// Reads one bit.
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        Ok(self.next_bit())
    }

    /// Reads a big-endian unsigned integer of `bits` width (≤ 128).
    pub fn load_uint(&mut self, bits: usize) -> Result<u128, CellError> {
        if bits > 128 {
            return Err(CellError::InvalidWidth(bits));
        }
        self.ensure_bits(bits)?;
        let mut value = 0u128;
        for _ in 0..bits {
            value = (value << 1) | u128::from(self.next_bit());
        }
        Ok(value)
    }

    /// Reads an 8-bit unsigned integer.
    pub fn load_u8(&mut self) -> Result<u8, CellError> {
        Ok(self.load_uint(8)? as u8)
    }

    /// Reads an 8-bit two's complement integer.
    pub fn load_i8(&mut self) -> Result<i8, CellError> {
        Ok(self.load_uint(8)? as u8 as i8)
    }

    /// Reads a 32-bit unsigned integer.
    pub fn load_u32(&mut self) -> Result<u32, CellError> {
        Ok(self.load_uint(32)? as u32)
    }

    /// Reads a 64-bit unsigned integer.
    pub fn load_u64(&mut self) -> Result<u64, CellError> {
        Ok(self.load_uint(64)? as u64)
    }

    /// Reads `len` whole bytes.
    pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(len * 8)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            let mut byte = 0u8;
            for _ in 0..8 {
                byte = (byte << 1) | u8::from(self.next_bit());
            }
            out.push(byte);
        }
        Ok(out)
    }

    /// Reads exactly `N` bytes into an array.
    pub fn load_array<const N: usize>(&mut self) -> Result<[u8; N], CellError> {
        let bytes = self.load_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Reads the next child reference.
    pub fn load_ref(&mut self) -> Result<ArcCell, CellError> {
        let cell = self
            .cell
            .refs()
            .get(self.ref_pos)
            .cloned()
            .ok_or(CellError::RefUnderflow)?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Reads `Maybe ^Cell`.
    pub fn load_maybe_ref(&mut self) -> Result<Option<ArcCell>, CellError> {
        if self.load_bit()? {
            Ok(Some(self.load_ref()?))
        } else {
            Ok(None)
        }
    }

    /// Reads a standard internal address.
    pub fn load_address(&mut self) -> Result<MsgAddress, CellError> {
        MsgAddress::load(self)
    }

    /// Reads a `VarUInteger 16` coin amount.
    pub fn load_coins(&mut self) -> Result<Coins, CellError> {
        Coins::load(self)
    }
}
