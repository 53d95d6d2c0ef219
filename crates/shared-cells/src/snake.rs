//! # Snake Strings
//!
//! Byte strings longer than one cell are chained: each cell carries up to
//! 127 bytes and continues in its single ref.

use crate::builder::CellBuilder;
use crate::cell::{ArcCell, Cell};
use crate::errors::CellError;
use std::sync::Arc;

/// Bytes carried by one snake cell.
pub const BYTES_PER_CELL: usize = 127;

/// Encodes bytes as a snake chain.
pub fn encode_snake(bytes: &[u8]) -> Result<ArcCell, CellError> {
    let mut tail: Option<ArcCell> = None;
    for chunk in bytes.chunks(BYTES_PER_CELL).rev() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(chunk)?;
        if let Some(next) = tail.take() {
            builder.store_ref(next)?;
        }
        tail = Some(Arc::new(builder.build()?));
    }
    Ok(tail.unwrap_or_else(|| Arc::new(Cell::empty())))
}

/// Decodes a snake chain back into bytes.
pub fn decode_snake(cell: &Cell) -> Result<Vec<u8>, CellError> {
    let mut out = Vec::new();
    read_chunk(cell, &mut out)?;
    let mut next = cell.refs().first().cloned();
    while let Some(current) = next {
        read_chunk(&current, &mut out)?;
        next = current.refs().first().cloned();
    }
    Ok(out)
}

fn read_chunk(cell: &Cell, out: &mut Vec<u8>) -> Result<(), CellError> {
    if cell.bit_len() % 8 != 0 {
        return Err(CellError::InvalidSnake(format!(
            "{} bits is not a whole number of bytes",
            cell.bit_len()
        )));
    }
    if cell.refs().len() > 1 {
        return Err(CellError::InvalidSnake(format!(
            "{} continuation refs",
            cell.refs().len()
        )));
    }
    out.extend_from_slice(cell.data());
    Ok(())
}
