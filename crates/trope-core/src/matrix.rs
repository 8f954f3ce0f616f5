//! Dense voice × sample buffer.
//!
//! [`SampleMatrix`] is the single allocation a render writes into. Rows are
//! voices (after timbre expansion), columns are samples. Every row has the same
//! length, and the shape never changes after construction.

use alloc::vec;
use alloc::vec::Vec;
use core::slice::ChunksMut;

use crate::math::normalize_to_peak;

/// Row-major `rows × cols` buffer of `f32` samples.
///
/// # Example
///
/// ```rust
/// use trope_core::SampleMatrix;
///
/// let mut m = SampleMatrix::new(2, 3);
/// m.write_segment(1, 1, &[0.5, -0.5]);
///
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.row(1), &[0.0, 0.5, -0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl SampleMatrix {
    /// Allocate a zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix whose every row is a copy of `row`.
    pub fn from_repeated_row(row: &[f32], rows: usize) -> Self {
        let mut data = Vec::with_capacity(row.len() * rows);
        for _ in 0..rows {
            data.extend_from_slice(row);
        }
        Self {
            rows,
            cols: row.len(),
            data,
        }
    }

    /// Number of rows (voices).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (samples per row).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns `true` if the matrix holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutably borrow one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Disjoint mutable row slices, in order.
    ///
    /// A zero-width matrix yields no rows.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, f32> {
        self.data.chunks_mut(self.cols.max(1))
    }

    /// The whole buffer, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The whole buffer, row-major, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Copy `segment` into `row` starting at column `start`.
    ///
    /// # Panics
    ///
    /// Panics if the segment runs past the end of the row.
    pub fn write_segment(&mut self, row: usize, start: usize, segment: &[f32]) {
        let dest = self.row_mut(row);
        dest[start..start + segment.len()].copy_from_slice(segment);
    }

    /// Scale each row so its peak equals the matching entry of `targets`.
    ///
    /// Silent rows are skipped. Returns how many rows were rescaled.
    ///
    /// # Panics
    ///
    /// Panics if `targets.len() != self.rows()`.
    pub fn normalize_rows_to(&mut self, targets: &[f32]) -> usize {
        assert_eq!(targets.len(), self.rows, "one target per row");
        let mut scaled = 0;
        for r in 0..self.rows {
            if normalize_to_peak(self.row_mut(r), targets[r]) {
                scaled += 1;
            }
        }
        scaled
    }

    /// Scale each non-silent row to unit peak.
    pub fn normalize_rows(&mut self) -> usize {
        let targets = vec![1.0; self.rows];
        self.normalize_rows_to(&targets)
    }

    /// Sum all rows column-wise into one mono buffer of length `cols`.
    pub fn sum_rows(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.cols];
        for row in self.iter_rows() {
            for (acc, &s) in out.iter_mut().zip(row) {
                *acc += s;
            }
        }
        out
    }
}
