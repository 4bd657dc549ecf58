//! Quantized matmul driver: validation, output allocation, row-parallel
//! dispatch into the dot-product engine.

use crate::bitpack::PackedBits;
use crate::dot::{dot, select_strategy};
use crate::error::{KernelError, KernelResult};
use crate::parallel::parallel_for;
use crate::tensor::{Matrix, MatrixView};

/// Multiply a packed quantized matrix `a` of shape `(n, k_bytes)` by a dense
/// matrix `b` of shape `(k_bytes * 8/bits, m)`, dequantizing with
/// `scale * (code - zero_point)`, into a freshly allocated `(n, m)` matrix.
///
/// Preconditions are checked once, synchronously, before any parallel work:
/// `bits` must be 4 or 8, and the packed width of `a` must unpack to exactly
/// `b.rows()` logical elements. Operand storage types are enforced by the
/// view types. Either the full output is produced or the call fails with no
/// output; nothing inside the parallel region fails under valid inputs.
pub fn matmul_quant(
    a: &MatrixView<'_, u8>,
    b: &MatrixView<'_, f32>,
    bits: u32,
    scale: f32,
    zero_point: f32,
) -> KernelResult<Matrix> {
    let bits = PackedBits::from_bits(bits)?;
    let n = a.rows();
    let k_bytes = a.cols();
    let m = b.cols();
    let k_logical = k_bytes * bits.values_per_byte();
    if k_logical != b.rows() {
        return Err(KernelError::ShapeMismatch(format!(
            "packed lhs unpacks to {k_logical} elements per row but rhs has {} rows",
            b.rows()
        )));
    }

    let mut c = Matrix::zeros(n, m);
    if n == 0 || m == 0 || k_bytes == 0 {
        return Ok(c);
    }

    // a walks col_stride per packed byte; b walks row_stride per sub-value
    let a_stride = a.col_stride();
    let b_stride = b.row_stride();
    let strategy = select_strategy(bits, a_stride, b_stride);
    log::debug!(
        "matmul_quant: n={n} m={m} k={k_logical} bits={} strategy={strategy:?}",
        bits.bits()
    );

    let a_view = *a;
    let b_view = *b;
    // Workers write disjoint row ranges of c; smuggle the base pointer as
    // usize across the closure. No locks, no atomics.
    let c_base = c.as_mut_slice().as_mut_ptr() as usize;
    parallel_for(0, n, 0, move |i0, i1| {
        let c_ptr = c_base as *mut f32;
        for i in i0..i1 {
            let a_row = a_view.offset_slice(i, 0);
            for j in 0..m {
                let b_col = b_view.offset_slice(0, j);
                let value = dot(
                    strategy, bits, a_row, b_col, k_bytes, a_stride, b_stride, scale, zero_point,
                );
                // rows [i0, i1) belong to this worker only
                unsafe { *c_ptr.add(i * m + j) = value };
            }
        }
    });

    Ok(c)
}
