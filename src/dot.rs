//! Quantized dot-product engine: one dequantized scalar from one packed row
//! and one dense column.
//!
//! Two interchangeable strategies implement the same
//! `(packed_row, dense_col, k_bytes, strides, scale, zero_point) -> f32`
//! contract:
//!
//! - **Vector**: 8-bit codes only, unit strides only. Processes
//!   [`VECTOR_BLOCK`] codes per iteration with AVX2 (x86_64) or NEON
//!   (aarch64); any remainder past the last full block is accumulated through
//!   the scalar tail, never dropped.
//! - **Scalar**: any supported bit width and strides. Walks packed bytes,
//!   extracting `8/bits` sub-values per byte via [`crate::bitpack::extract`].
//!
//! Both multiply the accumulated sum by `scale` exactly once at the end, so
//! scale distributes over the whole sum. Reduction order inside one dot is
//! fixed; there is no intra-dot threading, which keeps results deterministic.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::bitpack::{extract, PackedBits};
use crate::isa::{get_isa_level, IsaLevel};

/// Codes consumed per vector-strategy iteration (128 bits of 8-bit codes).
pub const VECTOR_BLOCK: usize = 16;

/// Tagged selection between the two statically specialized strategies.
/// Resolved once per matmul call, never per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStrategy {
    Vector,
    Scalar,
}

/// Pick the strategy for a `(bits, strides)` combination.
///
/// The vector path is restricted to 8-bit codes with unit strides on both
/// operands; everything else routes to the scalar path. The ISA level is
/// cached process-wide, so this is cheap to call per matmul.
pub fn select_strategy(bits: PackedBits, a_stride: usize, b_stride: usize) -> DotStrategy {
    let unit_strides = a_stride == 1 && b_stride == 1;
    let vector_isa = matches!(get_isa_level(), IsaLevel::Avx2 | IsaLevel::Neon);
    if bits == PackedBits::Int8 && unit_strides && vector_isa {
        DotStrategy::Vector
    } else {
        DotStrategy::Scalar
    }
}

/// Dequantized dot product of one packed row against one dense column.
///
/// `a` starts at the row base and is walked `a_stride` elements per packed
/// byte; `b` starts at the column base and is walked `b_stride` elements per
/// *extracted sub-value* (each sub-value corresponds to one logical index).
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn dot(
    strategy: DotStrategy,
    bits: PackedBits,
    a: &[u8],
    b: &[f32],
    k_bytes: usize,
    a_stride: usize,
    b_stride: usize,
    scale: f32,
    zero_point: f32,
) -> f32 {
    match strategy {
        DotStrategy::Vector => dot_vector_u8(a, b, k_bytes, scale, zero_point),
        DotStrategy::Scalar => dot_scalar(bits, a, b, k_bytes, a_stride, b_stride, scale, zero_point),
    }
}

/// Scalar strategy: bit-shifting extraction, any bit width, any strides.
#[allow(clippy::too_many_arguments)]
pub fn dot_scalar(
    bits: PackedBits,
    a: &[u8],
    b: &[f32],
    k_bytes: usize,
    a_stride: usize,
    b_stride: usize,
    scale: f32,
    zero_point: f32,
) -> f32 {
    let per_byte = bits.values_per_byte();
    let mut sum = 0.0f32;
    let mut ai = 0usize;
    let mut bi = 0usize;
    for _ in 0..k_bytes {
        let byte = a[ai];
        for sub in 0..per_byte {
            let code = extract(byte, sub, bits);
            sum += (code as f32 - zero_point) * b[bi];
            bi += b_stride;
        }
        ai += a_stride;
    }
    scale * sum
}

/// Vector strategy: 8-bit codes, unit strides. Falls back to the scalar
/// path when the detected ISA has no wide-vector support, so calling it is
/// always safe.
pub fn dot_vector_u8(a: &[u8], b: &[f32], k_bytes: usize, scale: f32, zero_point: f32) -> f32 {
    debug_assert!(a.len() >= k_bytes && b.len() >= k_bytes);
    #[cfg(target_arch = "x86_64")]
    if get_isa_level() == IsaLevel::Avx2 {
        return scale * unsafe { dot_u8_avx2(a, b, k_bytes, zero_point) };
    }
    #[cfg(target_arch = "aarch64")]
    if get_isa_level() == IsaLevel::Neon {
        return scale * unsafe { dot_u8_neon(a, b, k_bytes, zero_point) };
    }
    dot_scalar(PackedBits::Int8, a, b, k_bytes, 1, 1, scale, zero_point)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn dot_u8_avx2(a: &[u8], b: &[f32], k_bytes: usize, zero_point: f32) -> f32 {
    let zp = _mm256_set1_ps(zero_point);
    let mut acc_lo = _mm256_setzero_ps();
    let mut acc_hi = _mm256_setzero_ps();
    let mut i = 0usize;
    while i + VECTOR_BLOCK <= k_bytes {
        let codes = _mm_loadu_si128(a.as_ptr().add(i) as *const __m128i);
        // widen 16 u8 codes to two lanes of 8 x i32, convert to f32
        let lo = _mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(codes));
        let hi = _mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(_mm_srli_si128(codes, 8)));
        let b_lo = _mm256_loadu_ps(b.as_ptr().add(i));
        let b_hi = _mm256_loadu_ps(b.as_ptr().add(i + 8));
        acc_lo = _mm256_add_ps(acc_lo, _mm256_mul_ps(_mm256_sub_ps(lo, zp), b_lo));
        acc_hi = _mm256_add_ps(acc_hi, _mm256_mul_ps(_mm256_sub_ps(hi, zp), b_hi));
        i += VECTOR_BLOCK;
    }
    let mut tmp = [0f32; 8];
    _mm256_storeu_ps(tmp.as_mut_ptr(), _mm256_add_ps(acc_lo, acc_hi));
    let mut sum = tmp.iter().sum::<f32>();
    // remainder past the last full block
    while i < k_bytes {
        sum += (a[i] as f32 - zero_point) * b[i];
        i += 1;
    }
    sum
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn dot_u8_neon(a: &[u8], b: &[f32], k_bytes: usize, zero_point: f32) -> f32 {
    let zp = vdupq_n_f32(zero_point);
    let mut acc = vdupq_n_f32(0.0);
    let mut i = 0usize;
    while i + VECTOR_BLOCK <= k_bytes {
        let codes = vld1q_u8(a.as_ptr().add(i));
        let lo16 = vmovl_u8(vget_low_u8(codes));
        let hi16 = vmovl_u8(vget_high_u8(codes));
        let quarters = [
            vmovl_u16(vget_low_u16(lo16)),
            vmovl_u16(vget_high_u16(lo16)),
            vmovl_u16(vget_low_u16(hi16)),
            vmovl_u16(vget_high_u16(hi16)),
        ];
        for (q, codes_u32) in quarters.into_iter().enumerate() {
            let av = vsubq_f32(vcvtq_f32_u32(codes_u32), zp);
            let bv = vld1q_f32(b.as_ptr().add(i + q * 4));
            acc = vmlaq_f32(acc, av, bv);
        }
        i += VECTOR_BLOCK;
    }
    let mut sum = vaddvq_f32(acc);
    // remainder past the last full block
    while i < k_bytes {
        sum += (a[i] as f32 - zero_point) * b[i];
        i += 1;
    }
    sum
}
