//! quant-matmul-kernels: CPU kernels for affine-quantized matrix
//! multiplication.
//!
//! One operand (typically weights) is stored as unsigned 4- or 8-bit codes
//! packed multiple-per-byte; the other (activations) stays f32. The product
//! is dequantized on the fly with a single affine scheme,
//! `real = scale * (code - zero_point)`, applied uniformly across the packed
//! matrix. This crate provides:
//!
//! - **Runtime strategy selection**: a wide-vector dot product (AVX2/NEON,
//!   16 codes per iteration) for 8-bit unit-stride operands, and a portable
//!   bit-shifting path for everything else, detected once per process
//! - **Row-parallel dispatch**: the output is partitioned by rows across the
//!   rayon pool with lock-free disjoint writes
//! - **Strided operands**: transposed and non-contiguous activation views
//!   are first-class inputs
//!
//! # Quick Start
//!
//! ```
//! use quant_matmul_kernels::{matmul_quant, quantize_and_pack, MatrixView};
//!
//! let weights: Vec<f32> = (0..8 * 16).map(|i| (i as f32 - 64.0) * 0.01).collect();
//! let acts = vec![1.0f32; 16 * 4];
//!
//! let w = MatrixView::from_slice(&weights, 8, 16).unwrap();
//! let packed = quantize_and_pack(&w, 8, 0.01, 128.0).unwrap();
//!
//! let b = MatrixView::from_slice(&acts, 16, 4).unwrap();
//! let c = matmul_quant(&packed.view(), &b, 8, 0.01, 128.0).unwrap();
//! assert_eq!((c.rows(), c.cols()), (8, 4));
//! ```

pub mod bitpack;
pub mod device;
pub mod dot;
pub mod error;
pub mod isa;
pub mod matmul;
pub mod pack;
pub mod parallel;
pub mod tensor;

pub use bitpack::{extract, insert, packed_row_bytes, PackedBits};
pub use device::{DeviceKernels, DeviceOperand};
pub use dot::{dot, select_strategy, DotStrategy, VECTOR_BLOCK};
pub use error::{KernelError, KernelResult};
pub use isa::{get_isa_level, IsaLevel};
pub use matmul::matmul_quant;
pub use pack::{dequantize_and_unpack, quantize_and_pack, PackedMatrix};
pub use tensor::{DType, Element, Matrix, MatrixView};
