//! # Bag of Cells
//!
//! Byte serialization of a cell tree:
//!
//! ```text
//! magic:u32 = 0xb5ee9c72
//! has_idx:1 has_crc32c:1 has_cache_bits:1 flags:2 size:3
//! off_bytes:u8
//! cells:size roots:size absent:size tot_cells_size:off_bytes
//! root_list:(roots * size)
//! index:(has_idx ? cells * off_bytes : 0)
//! cell_data:tot_cells_size
//! ```
//!
//! Cells are deduplicated by representation hash and written in topological
//! order, so every reference points to a later index. Only single-root bags
//! without index or checksum are accepted.

use crate::cell::{ArcCell, Cell, MAX_REFS};
use crate::errors::CellError;
use std::collections::HashMap;
use std::sync::Arc;

/// Leading magic of a serialized bag of cells.
pub const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];

/// Serializes a cell tree rooted at `root`.
pub fn serialize_boc(root: &ArcCell) -> Vec<u8> {
    let mut visited = HashMap::new();
    let mut order = Vec::new();
    collect_post_order(root, &mut visited, &mut order);
    order.reverse();

    let index: HashMap<[u8; 32], usize> = order
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.repr_hash(), i))
        .collect();

    let size = min_bytes(order.len() as u64);
    let mut cell_data = Vec::new();
    for cell in &order {
        cell_data.extend_from_slice(&cell.descriptors());
        cell_data.extend_from_slice(&cell.padded_data());
        for r in cell.refs() {
            write_uint(&mut cell_data, index[&r.repr_hash()] as u64, size);
        }
    }
    let off_bytes = min_bytes(cell_data.len() as u64);

    let mut out = Vec::with_capacity(cell_data.len() + 32);
    out.extend_from_slice(&BOC_MAGIC);
    out.push(size as u8);
    out.push(off_bytes as u8);
    write_uint(&mut out, order.len() as u64, size);
    write_uint(&mut out, 1, size);
    write_uint(&mut out, 0, size);
    write_uint(&mut out, cell_data.len() as u64, off_bytes);
    write_uint(&mut out, 0, size);
    out.extend_from_slice(&cell_data);
    out
}

/// Deserializes a single-root bag of cells.
pub fn deserialize_boc(bytes: &[u8]) -> Result<ArcCell, CellError> {
    let mut reader = Reader::new(bytes);
    if reader.take(4)? != BOC_MAGIC {
        return Err(invalid("bad magic"));
    }

    let flags = reader.take(1)?[0];
    let has_idx = flags & 0x80 != 0;
    let has_crc = flags & 0x40 != 0;
    let size = usize::from(flags & 0x07);
    if has_idx {
        return Err(invalid("indexed bags are not supported"));
    }
    if has_crc {
        return Err(invalid("checksummed bags are not supported"));
    }
    if size == 0 || size > 4 {
        return Err(invalid("ref size out of range"));
    }
    let off_bytes = usize::from(reader.take(1)?[0]);
    if off_bytes == 0 || off_bytes > 8 {
        return Err(invalid("offset size out of range"));
    }

    let cells = reader.read_uint(size)?;
    let roots = reader.read_uint(size)?;
    let absent = reader.read_uint(size)?;
    let tot_cells_size = reader.read_uint(off_bytes)?;
    if roots != 1 {
        return Err(invalid("exactly one root expected"));
    }
    if absent != 0 {
        return Err(invalid("absent cells are not supported"));
    }
    if cells == 0 || cells > tot_cells_size {
        return Err(invalid("cell count inconsistent with data size"));
    }
    let root = reader.read_uint(size)?;
    if root >= cells {
        return Err(invalid("root index out of range"));
    }
    let data = reader.take(tot_cells_size)?;
    if !reader.is_done() {
        return Err(invalid("trailing bytes"));
    }

    let raw = parse_raw_cells(data, cells, size)?;
    let mut built: Vec<Option<ArcCell>> = vec![None; cells];
    for (i, raw_cell) in raw.into_iter().enumerate().rev() {
        let refs = raw_cell
            .refs
            .iter()
            .map(|&r| built[r].clone().ok_or_else(|| invalid("dangling reference")))
            .collect::<Result<Vec<_>, _>>()?;
        built[i] = Some(Arc::new(Cell::new(raw_cell.data, raw_cell.bit_len, refs)?));
    }
    built[root].take().ok_or_else(|| invalid("missing root"))
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

fn parse_raw_cells(data: &[u8], cells: usize, size: usize) -> Result<Vec<RawCell>, CellError> {
    let mut reader = Reader::new(data);
    let mut out = Vec::with_capacity(cells);
    for i in 0..cells {
        let d = reader.take(2)?;
        let (d1, d2) = (d[0], d[1]);
        if d1 & 0x08 != 0 || d1 >> 5 != 0 {
            return Err(invalid("exotic and higher-level cells are not supported"));
        }
        if d1 & 0x10 != 0 {
            return Err(invalid("stored cell hashes are not supported"));
        }
        let ref_count = usize::from(d1 & 0x07);
        if ref_count > MAX_REFS {
            return Err(invalid("too many refs"));
        }
        let byte_len = usize::from(d2).div_ceil(2);
        let mut bytes = reader.take(byte_len)?.to_vec();
        let bit_len = if d2 % 2 == 1 {
            let last = bytes.last().copied().unwrap_or(0);
            if last == 0 {
                return Err(invalid("missing completion tag"));
            }
            let len = byte_len * 8 - (last.trailing_zeros() as usize + 1);
            if let Some(b) = bytes.last_mut() {
                *b &= !(1u8 << last.trailing_zeros());
            }
            len
        } else {
            byte_len * 8
        };
        let mut refs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            let r = reader.read_uint(size)?;
            if r <= i || r >= cells {
                return Err(invalid("reference must point forward"));
            }
            refs.push(r);
        }
        out.push(RawCell {
            data: bytes,
            bit_len,
            refs,
        });
    }
    if !reader.is_done() {
        return Err(invalid("cell data size mismatch"));
    }
    Ok(out)
}

fn collect_post_order(
    cell: &ArcCell,
    visited: &mut HashMap<[u8; 32], ()>,
    order: &mut Vec<ArcCell>,
) {
    if visited.insert(cell.repr_hash(), ()).is_some() {
        return;
    }
    for r in cell.refs() {
        collect_post_order(r, visited, order);
    }
    order.push(cell.clone());
}

fn min_bytes(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

fn write_uint(out: &mut Vec<u8>, value: u64, bytes: usize) {
    out.extend_from_slice(&value.to_be_bytes()[8 - bytes..]);
}

fn invalid(reason: &str) -> CellError {
    CellError::InvalidBoc(reason.to_string())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CellError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| invalid("truncated"))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn read_uint(&mut self, len: usize) -> Result<usize, CellError> {
        let value = self
            .take(len)?
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        usize::try_from(value).map_err(|_| invalid("integer out of range"))
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }
}
