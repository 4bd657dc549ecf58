//! Sub-byte code packing.
//!
//! Packed storage holds `8 / bits` unsigned codes per byte, low-bits-first:
//! sub-value 0 occupies bits `[0, bits)`, sub-value 1 bits `[bits, 2*bits)`,
//! and so on. [`extract`] and [`insert`] are exact structural inverses; the
//! packing stage and the dot-product engine must agree on this order or
//! dequantized values silently corrupt.

use crate::error::{KernelError, KernelResult};

/// Supported packed bit widths. A closed set: 4-bit (two codes per byte)
/// and 8-bit (identity packing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedBits {
    Int4,
    Int8,
}

impl PackedBits {
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Int4 => 4,
            Self::Int8 => 8,
        }
    }

    #[inline(always)]
    pub const fn values_per_byte(self) -> usize {
        match self {
            Self::Int4 => 2,
            Self::Int8 => 1,
        }
    }

    /// Largest representable code, `2^bits - 1`.
    #[inline(always)]
    pub const fn max_code(self) -> u8 {
        match self {
            Self::Int4 => 0x0F,
            Self::Int8 => 0xFF,
        }
    }

    /// Validate a caller-supplied bit width.
    pub fn from_bits(bits: u32) -> KernelResult<Self> {
        match bits {
            4 => Ok(Self::Int4),
            8 => Ok(Self::Int8),
            other => Err(KernelError::UnsupportedBits(other)),
        }
    }
}

impl TryFrom<u32> for PackedBits {
    type Error = KernelError;

    fn try_from(bits: u32) -> KernelResult<Self> {
        Self::from_bits(bits)
    }
}

/// Pull one unsigned code out of a packed byte.
///
/// `sub` is the lane index within the byte and is caller-controlled; for
/// `Int8` it is always 0, for `Int4` lane 0 is the low nibble and lane 1
/// the high nibble.
#[inline(always)]
pub const fn extract(byte: u8, sub: usize, bits: PackedBits) -> u8 {
    let shift = (sub as u32) * bits.bits();
    let mask = ((1u16 << bits.bits()) - 1) as u8;
    (byte >> shift) & mask
}

/// Write one unsigned code into a packed byte, leaving the other lanes
/// untouched. Inverse of [`extract`].
#[inline(always)]
pub const fn insert(byte: u8, sub: usize, bits: PackedBits, code: u8) -> u8 {
    let shift = (sub as u32) * bits.bits();
    let mask = ((1u16 << bits.bits()) - 1) as u8;
    (byte & !(mask << shift)) | ((code & mask) << shift)
}

/// Bytes needed to store `k_logical` packed codes.
#[inline(always)]
pub const fn packed_row_bytes(k_logical: usize, bits: PackedBits) -> usize {
    let per_byte = bits.values_per_byte();
    (k_logical + per_byte - 1) / per_byte
}
