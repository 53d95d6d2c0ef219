//! # Cells
//!
//! An ordinary cell holds up to 1023 data bits and up to 4 references to other
//! cells. Cells are immutable once built; the representation hash and depth
//! are computed at construction.

use crate::errors::CellError;
use crate::slice::CellSlice;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Maximum number of data bits in a cell.
pub const MAX_DATA_BITS: usize = 1023;

/// Maximum number of references in a cell.
pub const MAX_REFS: usize = 4;

/// Maximum depth of a cell tree below its root.
pub const MAX_DEPTH: u16 = 1024;

/// Shared handle to a cell. Subtrees are shared, never copied.
pub type ArcCell = Arc<Cell>;

/// An immutable ordinary cell.
#[derive(Clone)]
pub struct Cell {
    /// `ceil(bit_len / 8)` bytes; bits past `bit_len` are always zero.
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<ArcCell>,
    hash: [u8; 32],
    depth: u16,
}

impl Cell {
    /// Creates a cell from raw data bits and references.
    ///
    /// Bits of `data` past `bit_len` are ignored.
    pub fn new(mut data: Vec<u8>, bit_len: usize, refs: Vec<ArcCell>) -> Result<Self, CellError> {
        if bit_len > MAX_DATA_BITS {
            return Err(CellError::BitOverflow {
                requested: bit_len,
                available: MAX_DATA_BITS,
            });
        }
        if refs.len() > MAX_REFS {
            return Err(CellError::RefOverflow { max: MAX_REFS });
        }
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CellError::BitUnderflow {
                requested: bit_len,
                remaining: data.len() * 8,
            });
        }
        data.truncate(byte_len);
        let partial = bit_len % 8;
        if partial != 0 {
            data[byte_len - 1] &= 0xFF << (8 - partial);
        }

        let depth = match refs.iter().map(|r| r.depth).max() {
            None => 0,
            Some(child) => child
                .checked_add(1)
                .filter(|&d| d <= MAX_DEPTH)
                .ok_or(CellError::DepthOverflow { max: MAX_DEPTH })?,
        };

        let mut cell = Self {
            data,
            bit_len,
            refs,
            hash: [0u8; 32],
            depth,
        };
        cell.hash = cell.compute_hash();
        Ok(cell)
    }

    /// The cell with no bits and no refs.
    #[must_use]
    pub fn empty() -> Self {
        let mut cell = Self {
            data: Vec::new(),
            bit_len: 0,
            refs: Vec::new(),
            hash: [0u8; 32],
            depth: 0,
        };
        cell.hash = cell.compute_hash();
        cell
    }

    /// Number of data bits.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Raw data bytes (last byte zero-padded).
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Child references.
    #[must_use]
    pub fn refs(&self) -> &[ArcCell] {
        &self.refs
    }

    /// Returns true if the cell has neither data nor refs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0 && self.refs.is_empty()
    }

    /// Representation hash.
    #[must_use]
    pub fn repr_hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Depth of the tree below this cell (0 for a leaf).
    #[must_use]
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Opens a reading cursor at the start of the cell.
    #[must_use]
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Descriptor bytes `d1`, `d2` of the standard encoding.
    #[must_use]
    pub fn descriptors(&self) -> [u8; 2] {
        let d1 = self.refs.len() as u8;
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data with the completion tag appended when the last byte is partial.
    #[must_use]
    pub fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let partial = self.bit_len % 8;
        if partial != 0 {
            if let Some(last) = out.last_mut() {
                *last |= 0x80 >> partial;
            }
        }
        out
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        for r in &self.refs {
            hasher.update(r.depth.to_be_bytes());
        }
        for r in &self.refs {
            hasher.update(r.hash);
        }
        hasher.finalize().into()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell {{ bits: {}, refs: {}, hash: {} }}",
            self.bit_len,
            self.refs.len(),
            hex::encode(&self.hash[..8])
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CellBuilder;

    #[test]
    fn test_empty_cell_hash() {
        // Well-known hash of the empty ordinary cell
        let hash = Cell::empty().repr_hash();
        assert_eq!(
            hex::encode(hash),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn test_descriptors_partial_byte() {
        let cell = Cell::new(vec![0b1010_0000], 3, vec![]).unwrap();
        assert_eq!(cell.descriptors(), [0, 1]);
        assert_eq!(cell.padded_data(), vec![0b1011_0000]);
    }

    #[test]
    fn test_descriptors_full_bytes() {
        let cell = Cell::new(vec![0xAB, 0xCD], 16, vec![]).unwrap();
        assert_eq!(cell.descriptors(), [0, 4]);
        assert_eq!(cell.padded_data(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_bits_past_len_are_masked() {
        let a = Cell::new(vec![0b1111_1111], 4, vec![]).unwrap();
        let b = Cell::new(vec![0b1111_0000], 4, vec![]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.data(), &[0b1111_0000]);
    }

    #[test]
    fn test_depth() {
        let leaf = Arc::new(Cell::empty());
        let mid = Arc::new(Cell::new(vec![], 0, vec![leaf.clone()]).unwrap());
        let root = Cell::new(vec![], 0, vec![leaf, mid]).unwrap();
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_depth_limit() {
        let mut cell = Arc::new(Cell::empty());
        for _ in 0..MAX_DEPTH {
            cell = Arc::new(Cell::new(vec![], 0, vec![cell]).unwrap());
        }
        assert_eq!(cell.depth(), MAX_DEPTH);
        assert_eq!(
            Cell::new(vec![], 0, vec![cell]),
            Err(CellError::DepthOverflow { max: MAX_DEPTH })
        );
    }

    #[test]
    fn test_ref_changes_hash() {
        let child_a = Arc::new(Cell::new(vec![0x01], 8, vec![]).unwrap());
        let child_b = Arc::new(Cell::new(vec![0x02], 8, vec![]).unwrap());
        let a = Cell::new(vec![], 0, vec![child_a]).unwrap();
        let b = Cell::new(vec![], 0, vec![child_b]).unwrap();
        assert_ne!(a.repr_hash(), b.repr_hash());
    }

    #[test]
    fn test_capacity_limits() {
        assert!(matches!(
            Cell::new(vec![0u8; 128], 1024, vec![]),
            Err(CellError::BitOverflow { .. })
        ));
        let refs = vec![Arc::new(Cell::empty()); 5];
        assert!(matches!(
            Cell::new(vec![], 0, refs),
            Err(CellError::RefOverflow { .. })
        ));
    }

    #[test]
    fn test_builder_and_raw_agree() {
        let mut b = CellBuilder::new();
        b.store_uint(0b101, 3).unwrap();
        let built = b.build().unwrap();
        let raw = Cell::new(vec![0b1010_0000], 3, vec![]).unwrap();
        assert_eq!(built, raw);
    }
}
