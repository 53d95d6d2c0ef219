//! # Coin Amounts
//!
//! Amounts are nano-units stored as `VarUInteger 16`: a 4-bit byte length
//! followed by that many big-endian bytes. The largest encodable amount is
//! `2^120 - 1`.

use crate::builder::CellBuilder;
use crate::errors::CellError;
use crate::slice::CellSlice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nano-units per native unit.
pub const NANO_PER_UNIT: u128 = 1_000_000_000;

/// Maximum encodable byte length.
const MAX_LEN_BYTES: usize = 15;

/// An amount of the native currency, in nano-units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coins(u128);

impl Coins {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from nano-units.
    #[must_use]
    pub const fn from_nano(nano: u128) -> Self {
        Self(nano)
    }

    /// Creates an amount from whole native units.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units as u128 * NANO_PER_UNIT)
    }

    /// Amount in nano-units.
    #[must_use]
    pub const fn as_nano(self) -> u128 {
        self.0
    }

    /// Returns true if the amount fits in `VarUInteger 16`.
    #[must_use]
    pub const fn is_encodable(self) -> bool {
        self.0 >> (MAX_LEN_BYTES * 8) == 0
    }

    /// Writes the amount into a builder.
    pub fn store(self, builder: &mut CellBuilder) -> Result<(), CellError> {
        if !self.is_encodable() {
            return Err(CellError::CoinsOverflow);
        }
        let len = (128 - self.0.leading_zeros() as usize).div_ceil(8);
        let needed = 4 + len * 8;
        if builder.bits_left() < needed {
            return Err(CellError::BitOverflow {
                requested: needed,
                available: builder.bits_left(),
            });
        }
        builder.store_uint(len as u128, 4)?.store_uint(self.0, len * 8)?;
        Ok(())
    }

    /// Reads an amount from a slice.
    pub fn load(slice: &mut CellSlice<'_>) -> Result<Self, CellError> {
        let len = slice.load_uint(4)? as usize;
        Ok(Self(slice.load_uint(len * 8)?))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / NANO_PER_UNIT;
        let frac = self.0 % NANO_PER_UNIT;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:09}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl FromStr for Coins {
    type Err = CellError;

    /// Parses a decimal amount in native units, e.g. `"0.065"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CellError::InvalidAmount(s.to_string());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() || frac.len() > 9 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let frac: u128 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<9}").parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(NANO_PER_UNIT)
            .and_then(|n| n.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl From<u64> for Coins {
    fn from(nano: u64) -> Self {
        Self(u128::from(nano))
    }
}
