use thiserror::Error;

use crate::tensor::DType;

/// Errors surfaced by the kernel entry points.
///
/// All variants are caller-contract violations detected before any parallel
/// work is scheduled; nothing inside the row-parallel region is expected to
/// fail under valid preconditions.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("unsupported quantization bit width {0} (expected 4 or 8)")]
    UnsupportedBits(u32),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: DType, actual: DType },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unimplemented kernel feature: {0}")]
    Unimplemented(&'static str),
}

pub type KernelResult<T> = Result<T, KernelError>;
