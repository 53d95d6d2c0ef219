//! # Internal Addresses
//!
//! Standard internal address: `addr_std$10 anycast:(Maybe Anycast)
//! workchain_id:int8 address:bits256`. Anycast is never produced and is
//! rejected on read.

use crate::builder::CellBuilder;
use crate::errors::CellError;
use crate::slice::CellSlice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Standard internal address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MsgAddress {
    /// Workchain identifier.
    pub workchain: i8,
    /// Account id (hash of the account's initial state).
    pub hash: [u8; 32],
}

impl MsgAddress {
    /// Serialized width in bits.
    pub const BITS: usize = 267;

    /// Tag of `addr_std`.
    const STD_TAG: u128 = 0b10;

    /// Creates an address.
    #[must_use]
    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Writes the address into a builder.
    pub fn store(&self, builder: &mut CellBuilder) -> Result<(), CellError> {
        if builder.bits_left() < Self::BITS {
            return Err(CellError::BitOverflow {
                requested: Self::BITS,
                available: builder.bits_left(),
            });
        }
        builder
            .store_uint(Self::STD_TAG, 2)?
            .store_bit(false)?
            .store_i8(self.workchain)?
            .store_bytes(&self.hash)?;
        Ok(())
    }

    /// Reads an address from a slice.
    pub fn load(slice: &mut CellSlice<'_>) -> Result<Self, CellError> {
        let tag = slice.load_uint(2)?;
        if tag != Self::STD_TAG {
            return Err(CellError::InvalidAddress(format!(
                "unsupported address tag {tag:#04b}"
            )));
        }
        if slice.load_bit()? {
            return Err(CellError::InvalidAddress("anycast not supported".into()));
        }
        let workchain = slice.load_i8()?;
        let hash = slice.load_array::<32>()?;
        Ok(Self { workchain, hash })
    }
}

impl fmt::Display for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Debug for MsgAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}",
            self.workchain,
            hex::encode(&self.hash[..4]),
            hex::encode(&self.hash[30..])
        )
    }
}

impl FromStr for MsgAddress {
    type Err = CellError;

    /// Parses the raw `workchain:hex` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wc, hash) = s
            .split_once(':')
            .ok_or_else(|| CellError::InvalidAddress(format!("missing workchain in {s:?}")))?;
        let workchain = wc
            .parse::<i8>()
            .map_err(|e| CellError::InvalidAddress(format!("workchain {wc:?}: {e}")))?;
        let bytes =
            hex::decode(hash).map_err(|e| CellError::InvalidAddress(format!("account id: {e}")))?;
        let hash: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            CellError::InvalidAddress(format!("account id must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self { workchain, hash })
    }
}
