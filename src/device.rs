//! Accelerated-device seam.
//!
//! An off-host backend implements the same two entry points as the host
//! kernels against a dynamically typed operand descriptor. Every method
//! defaults to `Unimplemented`, so a backend only overrides what it
//! supports; the host path never goes through this trait.

use crate::error::{KernelError, KernelResult};
use crate::pack::PackedMatrix;
use crate::tensor::{DType, Matrix};

/// A raw operand crossing the device boundary: untyped bytes plus a dtype
/// tag, sizes, and element strides.
#[derive(Debug, Clone, Copy)]
pub struct DeviceOperand<'a> {
    pub data: &'a [u8],
    pub dtype: DType,
    pub rows: usize,
    pub cols: usize,
    pub row_stride: usize,
    pub col_stride: usize,
}

/// Device-side implementation of the public kernel surface.
pub trait DeviceKernels: Send + Sync {
    fn matmul_quant(
        &self,
        _a: &DeviceOperand<'_>,
        _b: &DeviceOperand<'_>,
        _bits: u32,
        _scale: f32,
        _zero_point: f32,
    ) -> KernelResult<Matrix> {
        Err(KernelError::Unimplemented("device matmul_quant"))
    }

    fn quantize_and_pack(
        &self,
        _a: &DeviceOperand<'_>,
        _bits: u32,
        _scale: f32,
        _zero_point: f32,
    ) -> KernelResult<PackedMatrix> {
        Err(KernelError::Unimplemented("device quantize_and_pack"))
    }
}

/// Check the matmul operand storage contract: packed codes must be
/// byte-coded, activations must be f32. Backends call this before any
/// transfer is scheduled.
pub fn ensure_matmul_operand_types(
    a: &DeviceOperand<'_>,
    b: &DeviceOperand<'_>,
) -> KernelResult<()> {
    if a.dtype != DType::U8 {
        return Err(KernelError::TypeMismatch {
            expected: DType::U8,
            actual: a.dtype,
        });
    }
    if b.dtype != DType::F32 {
        return Err(KernelError::TypeMismatch {
            expected: DType::F32,
            actual: b.dtype,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullDevice;
    impl DeviceKernels for NullDevice {}

    fn operand(dtype: DType) -> DeviceOperand<'static> {
        DeviceOperand {
            data: &[],
            dtype,
            rows: 0,
            cols: 0,
            row_stride: 0,
            col_stride: 0,
        }
    }

    #[test]
    fn default_device_is_unimplemented() {
        let dev = NullDevice;
        let a = operand(DType::U8);
        let b = operand(DType::F32);
        assert!(matches!(
            dev.matmul_quant(&a, &b, 8, 1.0, 0.0),
            Err(KernelError::Unimplemented(_))
        ));
        assert!(matches!(
            dev.quantize_and_pack(&b, 8, 1.0, 0.0),
            Err(KernelError::Unimplemented(_))
        ));
    }

    #[test]
    fn operand_type_contract() {
        assert!(ensure_matmul_operand_types(&operand(DType::U8), &operand(DType::F32)).is_ok());
        assert!(matches!(
            ensure_matmul_operand_types(&operand(DType::F32), &operand(DType::F32)),
            Err(KernelError::TypeMismatch {
                expected: DType::U8,
                ..
            })
        ));
        assert!(matches!(
            ensure_matmul_operand_types(&operand(DType::U8), &operand(DType::U8)),
            Err(KernelError::TypeMismatch {
                expected: DType::F32,
                ..
            })
        ));
    }
}
