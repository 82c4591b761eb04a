//! One query against many references, a bounded number at a time.
//!
//! Each reference is an independent sequential alignment with its own matrix.
//! The width of a dedicated rayon pool is the concurrency bound, and each
//! alignment writes only its own slot of a pre-sized result vector, so
//! `results[k]` always belongs to `references[k]` whatever order they finish in.

use rayon::prelude::*;

use crate::pool::{resolve_workers, with_workers};
use crate::result::AlignmentResult;
use crate::smith_waterman::align;

/// Align `query` against every reference with at most `max_concurrency`
/// alignments in flight.
///
/// `max_concurrency == 0` uses the available parallelism. The bound never
/// exceeds the number of references. Empty references give a zero-score,
/// empty alignment in their slot.
pub fn align_batch<R>(
    query: &[u8],
    references: &[R],
    max_concurrency: usize,
) -> Vec<AlignmentResult>
where
    R: AsRef<[u8]> + Sync,
{
    align_batch_with(query, references, max_concurrency, align)
}

/// Batch driver with the per-reference aligner supplied by the caller.
pub(crate) fn align_batch_with<R, F>(
    query: &[u8],
    references: &[R],
    max_concurrency: usize,
    unit: F,
) -> Vec<AlignmentResult>
where
    R: AsRef<[u8]> + Sync,
    F: Fn(&[u8], &[u8]) -> AlignmentResult + Sync,
{
    if references.is_empty() {
        return Vec::new();
    }

    let permits = resolve_workers(max_concurrency).min(references.len());
    log::debug!(
        "Aligning query of {} bases against {} references, {} at a time",
        query.len(),
        references.len(),
        permits
    );

    let mut results = vec![AlignmentResult::default(); references.len()];

    with_workers(permits, "batch", || {
        results
            .par_iter_mut()
            .zip(references.par_iter())
            .with_max_len(1)
            .for_each(|(slot, reference)| {
                *slot = unit(query, reference.as_ref());
            });
    });

    results
}
