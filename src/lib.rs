//! Smith-Waterman local alignment of DNA sequences.
//!
//! Three engines share one result shape:
//!
//! - [`align`] fills the score matrix row by row and traces back from the best cell.
//! - [`align_parallel`] fills anti-diagonals concurrently, joining after each one.
//! - [`align_batch`] aligns one query against many references, a bounded number at a time.
//!
//! ```
//! let result = rustseq_sw::align(b"GATTACA", b"XXXXXXGATTACAYYYYYY");
//! assert_eq!(result.max_score, 14);
//! assert_eq!(result.aligned_reference_str(), "GATTACA");
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod matrix;
pub mod mutate;
pub mod parallel;
pub mod pool;
pub mod report;
pub mod result;
pub mod scoring;
pub mod seq_io;
pub mod smith_waterman;
pub mod system_info;

pub use batch::align_batch;
pub use error::{Error, Result};
pub use matrix::ScoreMatrix;
pub use parallel::{align_parallel, PARALLEL_THRESHOLD};
pub use result::{AlignmentResult, CellPosition};
pub use smith_waterman::{align, traceback};
