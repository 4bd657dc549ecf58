//! Strided matrix views and owned output storage.
//!
//! These types are thin wrappers around slices with shape metadata, providing
//! zero-cost access through `#[inline(always)]` accessors. Strides are counted
//! in elements, never bytes, so transposed and non-contiguous views of caller
//! storage are plain stride swaps with no copying.

use std::fmt;

use crate::error::{KernelError, KernelResult};

/// Element storage tag for an operand buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// Unsigned byte-coded storage (packed quantized codes).
    U8,
    /// 32-bit float storage.
    F32,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::F32 => "f32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar types a [`MatrixView`] can be built over.
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: DType;
}

impl Element for u8 {
    const DTYPE: DType = DType::U8;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

/// A borrowed, read-only 2-D view over caller storage.
///
/// `(row_stride, col_stride)` give the element distance between consecutive
/// rows and columns. A row-major contiguous matrix has strides `(cols, 1)`;
/// its transpose is the same buffer viewed with strides `(1, cols)`.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a, T: Element> MatrixView<'a, T> {
    /// View a row-major contiguous buffer as `rows x cols`.
    pub fn from_slice(data: &'a [T], rows: usize, cols: usize) -> KernelResult<Self> {
        Self::with_strides(data, rows, cols, cols, 1)
    }

    /// View a buffer with arbitrary element strides.
    ///
    /// The highest reachable offset must fit in `data`; this is checked once
    /// here so the kernels can index without per-element bounds reasoning.
    pub fn with_strides(
        data: &'a [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> KernelResult<Self> {
        if rows > 0 && cols > 0 {
            let max_offset = (rows - 1)
                .checked_mul(row_stride)
                .and_then(|r| (cols - 1).checked_mul(col_stride).map(|c| (r, c)))
                .and_then(|(r, c)| r.checked_add(c))
                .ok_or_else(|| KernelError::InvalidConfig("view extent overflow".into()))?;
            if max_offset >= data.len() {
                return Err(KernelError::ShapeMismatch(format!(
                    "{rows}x{cols} view with strides ({row_stride}, {col_stride}) \
                     needs {} elements, backing slice has {}",
                    max_offset + 1,
                    data.len()
                )));
            }
        }
        Ok(Self {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
        })
    }

    /// The same buffer viewed with rows and columns swapped.
    #[inline(always)]
    pub fn transposed(&self) -> Self {
        Self {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    #[inline(always)]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    #[inline(always)]
    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    /// Element at `(i, j)`. Callers keep indices in range; the underlying
    /// slice access still checks.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.row_stride + j * self.col_stride]
    }

    /// The backing slice starting at element `(i, j)`, for stride-walking
    /// inner loops that begin at a row or column base.
    #[inline(always)]
    pub fn offset_slice(&self, i: usize, j: usize) -> &'a [T] {
        let data: &'a [T] = self.data;
        &data[i * self.row_stride + j * self.col_stride..]
    }
}

/// Owned, contiguous, row-major f32 matrix.
///
/// This is the output container: freshly allocated by the matmul driver,
/// never aliasing an input buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Allocate a zero-initialized `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> KernelResult<Self> {
        if data.len() != rows * cols {
            return Err(KernelError::ShapeMismatch(format!(
                "buffer of {} elements cannot back a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.cols + j]
    }

    /// Borrow as a strided view (contiguous row-major).
    pub fn view(&self) -> MatrixView<'_, f32> {
        MatrixView {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
            row_stride: self.cols,
            col_stride: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposed_view_swaps_strides() {
        let data: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let v = MatrixView::from_slice(&data, 2, 3).unwrap();
        let t = v.transposed();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(v.get(i, j), t.get(j, i));
            }
        }
    }

    #[test]
    fn oversized_view_is_rejected() {
        let data = [0u8; 4];
        assert!(MatrixView::from_slice(&data[..], 2, 3).is_err());
        // (rows-1)*rs + (cols-1)*cs == 3 fits exactly in 4 elements
        assert!(MatrixView::with_strides(&data[..], 2, 2, 2, 1).is_ok());
    }

    #[test]
    fn empty_view_needs_no_storage() {
        let data: [f32; 0] = [];
        let v = MatrixView::from_slice(&data[..], 0, 5).unwrap();
        assert_eq!(v.rows(), 0);
    }
}
