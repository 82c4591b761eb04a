// wavefront-parallel smith-waterman
// cells with the same i+j only depend on the previous anti-diagonal, so each
// diagonal is filled concurrently and joined before the next one starts

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::matrix::ScoreMatrix;
use crate::pool::{resolve_workers, with_workers};
use crate::result::{AlignmentResult, CellPosition};
use crate::smith_waterman::{align, recurrence, traceback};

/// Inputs shorter than this on either side go to the sequential aligner.
pub const PARALLEL_THRESHOLD: usize = 50;

// below this many cells a task costs more to schedule than to compute
const MIN_CELLS_PER_TASK: usize = 32;

/// Align `query` against `reference`, filling anti-diagonals concurrently.
///
/// `workers == 0` uses every available execution unit. The score and aligned
/// strings are identical to [`align`]. When either input is shorter than
/// [`PARALLEL_THRESHOLD`] the sequential result is returned with
/// `max_position` left unknown.
pub fn align_parallel(query: &[u8], reference: &[u8], workers: usize) -> AlignmentResult {
    let (m, n) = (query.len(), reference.len());

    if m < PARALLEL_THRESHOLD || n < PARALLEL_THRESHOLD {
        log::debug!(
            "{}x{} is below the parallel threshold of {}, aligning sequentially",
            m,
            n,
            PARALLEL_THRESHOLD
        );
        return AlignmentResult {
            max_position: None,
            ..align(query, reference)
        };
    }

    let workers = resolve_workers(workers);
    log::debug!("wavefront fill: {}x{} matrix, {} workers", m + 1, n + 1, workers);

    let cells = WavefrontMatrix::new(m + 1, n + 1);
    let tracker = MaxTracker::new();

    with_workers(workers, "wavefront", || {
        for diagonal in 2..=m + n {
            fill_diagonal(&cells, &tracker, query, reference, diagonal, workers);
        }
    });

    // every diagonal has joined, the matrix is complete
    let best = tracker.into_best();
    let matrix = cells.into_matrix();
    let (aligned_query, aligned_reference) = traceback(&matrix, query, reference, best.at);

    AlignmentResult {
        matrix: Some(matrix),
        max_score: best.score,
        max_position: Some(best.at),
        aligned_query,
        aligned_reference,
    }
}

/// Fill every cell `(i, j)` with `i + j == diagonal`, returning once all are written.
fn fill_diagonal(
    cells: &WavefrontMatrix,
    tracker: &MaxTracker,
    query: &[u8],
    reference: &[u8],
    diagonal: usize,
    workers: usize,
) {
    let (m, n) = (query.len(), reference.len());
    let first = diagonal.saturating_sub(n).max(1);
    let last = m.min(diagonal - 1);
    if first > last {
        return;
    }

    let len = last - first + 1;
    let per_task = len.div_ceil(workers).max(MIN_CELLS_PER_TASK);
    let tasks = len.div_ceil(per_task);

    // each task owns rows [start, end] of this diagonal and nothing else
    (0..tasks).into_par_iter().for_each(|task| {
        let start = first + task * per_task;
        let end = (start + per_task - 1).min(last);
        let mut local = Best::ZERO;

        for i in start..=end {
            let j = diagonal - i;
            let score = recurrence(
                cells.load(i - 1, j - 1),
                cells.load(i - 1, j),
                cells.load(i, j - 1),
                query[i - 1],
                reference[j - 1],
            );
            cells.store(i, j, score);

            let candidate = Best {
                score,
                at: CellPosition { row: i, col: j },
            };
            if candidate.beats(&local) {
                local = candidate;
            }
        }

        if local.score > 0 {
            tracker.offer(local);
        }
    });
}

/// Score grid written concurrently, one writer per cell.
///
/// Relaxed ordering is enough: no two tasks touch the same cell, and the
/// rayon join after each diagonal orders it before the next diagonal's reads.
struct WavefrontMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicI32>,
}

impl WavefrontMatrix {
    fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows * cols).map(|_| AtomicI32::new(0)).collect();
        Self { rows, cols, cells }
    }

    #[inline(always)]
    fn load(&self, i: usize, j: usize) -> i32 {
        self.cells[i * self.cols + j].load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn store(&self, i: usize, j: usize, value: i32) {
        self.cells[i * self.cols + j].store(value, Ordering::Relaxed)
    }

    fn into_matrix(self) -> ScoreMatrix {
        let cells = self.cells.into_iter().map(AtomicI32::into_inner).collect();
        ScoreMatrix::from_cells(self.rows, self.cols, cells)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Best {
    score: i32,
    at: CellPosition,
}

impl Best {
    const ZERO: Best = Best {
        score: 0,
        at: CellPosition { row: 0, col: 0 },
    };

    // equal scores go to the lowest (row, col), the cell a row-major scan meets first
    fn beats(&self, other: &Best) -> bool {
        self.score > other.score || (self.score == other.score && self.at < other.at)
    }
}

/// Running maximum shared by all wavefront tasks.
struct MaxTracker {
    best: Mutex<Best>,
}

impl MaxTracker {
    fn new() -> Self {
        Self {
            best: Mutex::new(Best::ZERO),
        }
    }

    /// Replace the recorded maximum if `candidate` beats it.
    fn offer(&self, candidate: Best) {
        let mut best = self.best.lock().unwrap_or_else(PoisonError::into_inner);
        if candidate.beats(&best) {
            *best = candidate;
        }
    }

    fn into_best(self) -> Best {
        self.best.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate::{multiple_mutations, random_sequence};

    #[test]
    fn short_inputs_fall_back_without_position() {
        let r = align_parallel(b"GATTACA", b"GATTACA", 4);
        assert_eq!(r.max_score, 14);
        assert_eq!(r.max_position, None);
        assert_eq!(r.aligned_query, b"GATTACA");
    }

    #[test]
    fn matches_sequential_on_long_inputs() {
        let mut rng = fastrand::Rng::with_seed(7);
        let reference = random_sequence(&mut rng, 180);
        let query = multiple_mutations(&mut rng, &reference[20..150], 6);

        let seq = align(query.as_bytes(), reference.as_bytes());
        for workers in [0, 1, 2, 3, 8] {
            let par = align_parallel(query.as_bytes(), reference.as_bytes(), workers);
            assert_eq!(par.max_score, seq.max_score, "workers={}", workers);
            assert_eq!(par.max_position, seq.max_position, "workers={}", workers);
            assert_eq!(par.aligned_query, seq.aligned_query);
            assert_eq!(par.aligned_reference, seq.aligned_reference);
            assert_eq!(par.matrix, seq.matrix);
        }
    }

    #[test]
    fn unrelated_long_inputs_score_zero() {
        let a = vec![b'A'; 64];
        let t = vec![b'T'; 80];
        let r = align_parallel(&a, &t, 3);
        assert_eq!(r.max_score, 0);
        assert!(r.is_empty());
        assert_eq!(r.max_position, Some(CellPosition { row: 0, col: 0 }));
    }

    #[test]
    fn tie_break_prefers_lowest_cell() {
        let best = Best {
            score: 5,
            at: CellPosition { row: 3, col: 9 },
        };
        let earlier = Best {
            score: 5,
            at: CellPosition { row: 2, col: 40 },
        };
        assert!(earlier.beats(&best));
        assert!(!best.beats(&earlier));

        let tracker = MaxTracker::new();
        tracker.offer(best);
        tracker.offer(earlier);
        tracker.offer(Best {
            score: 4,
            at: CellPosition { row: 1, col: 1 },
        });
        assert_eq!(tracker.into_best(), earlier);
    }
}
