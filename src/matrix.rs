//! Dynamic-programming score grid.

use std::ops::Index;

/// Row-major `(|query|+1) x (|reference|+1)` grid of local-alignment scores.
///
/// Row 0 and column 0 stay at zero. Every other cell holds the best score of
/// a local alignment ending at that query/reference position, clipped at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl ScoreMatrix {
    /// Zero-filled matrix with `rows` rows and `cols` columns.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Build from an already filled row-major buffer.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<i32>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.cells[i * self.cols + j]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: i32) {
        self.cells[i * self.cols + j] = value;
    }

    /// Scores of row `i`.
    pub fn row(&self, i: usize) -> &[i32] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.iter().copied()
    }

    /// Smallest cell value, 0 for an empty grid.
    pub fn min_value(&self) -> i32 {
        self.iter().min().unwrap_or(0)
    }
}

impl Index<(usize, usize)> for ScoreMatrix {
    type Output = i32;

    fn index(&self, (i, j): (usize, usize)) -> &i32 {
        &self.cells[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_zeroed() {
        let m = ScoreMatrix::new(3, 4);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 4);
        assert!(m.iter().all(|v| v == 0));
        assert_eq!(m.min_value(), 0);
    }

    #[test]
    fn set_and_index_agree() {
        let mut m = ScoreMatrix::new(2, 3);
        m.set(1, 2, 7);
        assert_eq!(m.get(1, 2), 7);
        assert_eq!(m[(1, 2)], 7);
        assert_eq!(m.row(1), &[0, 0, 7]);
    }
}
