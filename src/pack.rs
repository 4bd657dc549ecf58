//! Packing stage: quantize a dense f32 matrix into packed codes, and the
//! inverse unpack-and-dequantize.
//!
//! The packer is the exact structural inverse of the dot-product engine's
//! extraction: `code = clamp(round(value / scale) + zero_point, 0, 2^bits-1)`
//! placed low-bits-first, `8/bits` codes per byte.

use crate::bitpack::{extract, insert, PackedBits};
use crate::error::{KernelError, KernelResult};
use crate::tensor::{Matrix, MatrixView};

/// Owned packed quantized matrix of shape `(rows, cols_bytes)`, holding
/// `cols_bytes * 8/bits` logical codes per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedMatrix {
    data: Vec<u8>,
    rows: usize,
    cols_bytes: usize,
    bits: PackedBits,
}

impl PackedMatrix {
    /// Wrap an existing packed buffer.
    pub fn from_raw(
        data: Vec<u8>,
        rows: usize,
        cols_bytes: usize,
        bits: PackedBits,
    ) -> KernelResult<Self> {
        if data.len() != rows * cols_bytes {
            return Err(KernelError::ShapeMismatch(format!(
                "buffer of {} bytes cannot back a {rows}x{cols_bytes} packed matrix",
                data.len()
            )));
        }
        Ok(Self {
            data,
            rows,
            cols_bytes,
            bits,
        })
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Packed width in bytes.
    #[inline(always)]
    pub fn cols_bytes(&self) -> usize {
        self.cols_bytes
    }

    /// Logical width in codes.
    #[inline(always)]
    pub fn cols_logical(&self) -> usize {
        self.cols_bytes * self.bits.values_per_byte()
    }

    #[inline(always)]
    pub fn bits(&self) -> PackedBits {
        self.bits
    }

    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a contiguous strided view for the matmul driver.
    pub fn view(&self) -> MatrixView<'_, u8> {
        // contiguous by construction, the view check cannot fail
        MatrixView::from_slice(&self.data, self.rows, self.cols_bytes)
            .expect("packed buffer sized at construction")
    }
}

/// Quantize a dense `(n, k)` f32 matrix into a packed `(n, k / (8/bits))`
/// code matrix.
///
/// Rounding is to the nearest integer (half away from zero); codes are
/// clamped to `[0, 2^bits - 1]`. `k` must be a multiple of the codes-per-byte
/// count, `scale` must be a positive finite float, and the input view may
/// carry arbitrary strides.
pub fn quantize_and_pack(
    a: &MatrixView<'_, f32>,
    bits: u32,
    scale: f32,
    zero_point: f32,
) -> KernelResult<PackedMatrix> {
    let bits = PackedBits::from_bits(bits)?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(KernelError::InvalidConfig(format!(
            "quantization scale must be a positive finite float, got {scale}"
        )));
    }
    let per_byte = bits.values_per_byte();
    let n = a.rows();
    let k = a.cols();
    if k % per_byte != 0 {
        return Err(KernelError::ShapeMismatch(format!(
            "cannot pack {k} columns at {} bits: not a multiple of {per_byte} codes per byte",
            bits.bits()
        )));
    }
    let k_bytes = k / per_byte;
    let max_code = bits.max_code() as f32;

    let mut data = vec![0u8; n * k_bytes];
    for i in 0..n {
        for kb in 0..k_bytes {
            let mut byte = 0u8;
            for sub in 0..per_byte {
                let value = a.get(i, kb * per_byte + sub);
                let code = ((value / scale).round() + zero_point).clamp(0.0, max_code);
                byte = insert(byte, sub, bits, code as u8);
            }
            data[i * k_bytes + kb] = byte;
        }
    }
    PackedMatrix::from_raw(data, n, k_bytes, bits)
}

/// Unpack a packed code view of shape `(n, k_bytes)` into the dense
/// `(n, k_bytes * 8/bits)` matrix `scale * (code - zero_point)`.
pub fn dequantize_and_unpack(
    a: &MatrixView<'_, u8>,
    bits: u32,
    scale: f32,
    zero_point: f32,
) -> KernelResult<Matrix> {
    let bits = PackedBits::from_bits(bits)?;
    let per_byte = bits.values_per_byte();
    let n = a.rows();
    let k_bytes = a.cols();
    let k_logical = k_bytes * per_byte;

    let mut out = Matrix::zeros(n, k_logical);
    let out_slice = out.as_mut_slice();
    for i in 0..n {
        for kb in 0..k_bytes {
            let byte = a.get(i, kb);
            for sub in 0..per_byte {
                let code = extract(byte, sub, bits);
                out_slice[i * k_logical + kb * per_byte + sub] =
                    scale * (code as f32 - zero_point);
            }
        }
    }
    Ok(out)
}
