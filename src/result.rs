//! Result shape shared by the sequential, parallel and batch engines.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::matrix::ScoreMatrix;

/// Coordinates of a cell in the score matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

/// Best local alignment of a query against a reference.
///
/// `aligned_query` and `aligned_reference` always have equal length and never
/// carry a gap marker in the same column. `max_position` is `None` when the
/// engine did not record where the maximum was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentResult {
    #[serde(skip)]
    pub matrix: Option<ScoreMatrix>,
    pub max_score: i32,
    pub max_position: Option<CellPosition>,
    #[serde(serialize_with = "as_text")]
    pub aligned_query: Vec<u8>,
    #[serde(serialize_with = "as_text")]
    pub aligned_reference: Vec<u8>,
}

impl AlignmentResult {
    pub fn max_row(&self) -> Option<usize> {
        self.max_position.map(|p| p.row)
    }

    pub fn max_col(&self) -> Option<usize> {
        self.max_position.map(|p| p.col)
    }

    pub fn aligned_query_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.aligned_query)
    }

    pub fn aligned_reference_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.aligned_reference)
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned_query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_query.is_empty()
    }

    /// Drop the score matrix, keeping the score and aligned strings.
    pub fn without_matrix(mut self) -> Self {
        self.matrix = None;
        self
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.aligned_query_str())?;
        writeln!(f, "{}", self.aligned_reference_str())?;
        write!(f, "Score: {}", self.max_score)
    }
}

fn as_text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
