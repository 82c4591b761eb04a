// core alignment logic
// smith-waterman local alignment: fill the score matrix, then walk back from the best cell

use crate::matrix::ScoreMatrix;
use crate::result::{AlignmentResult, CellPosition};
use crate::scoring::{match_score, GAP, GAP_PENALTY};

/// Align `query` against `reference` with the sequential Smith-Waterman fill.
///
/// Empty inputs are valid and give a zero score with empty aligned strings.
/// The maximum is replaced only on a strictly greater score during the
/// row-major scan, so the traceback starts from the first cell to reach it.
pub fn align(query: &[u8], reference: &[u8]) -> AlignmentResult {
    let (m, n) = (query.len(), reference.len());
    log::trace!("sequential fill: {}x{} matrix", m + 1, n + 1);

    let mut matrix = ScoreMatrix::new(m + 1, n + 1);
    let mut best = 0;
    let mut best_at = CellPosition { row: 0, col: 0 };

    for i in 1..=m {
        for j in 1..=n {
            let score = cell_score(&matrix, query, reference, i, j);
            matrix.set(i, j, score);

            if score > best {
                best = score;
                best_at = CellPosition { row: i, col: j };
            }
        }
    }

    let (aligned_query, aligned_reference) = traceback(&matrix, query, reference, best_at);

    AlignmentResult {
        matrix: Some(matrix),
        max_score: best,
        max_position: Some(best_at),
        aligned_query,
        aligned_reference,
    }
}

/// Recurrence for cell `(i, j)`, reading its three already filled neighbours.
#[inline(always)]
pub(crate) fn recurrence(diag: i32, up: i32, left: i32, a: u8, b: u8) -> i32 {
    (diag + match_score(a, b))
        .max(up + GAP_PENALTY)
        .max(left + GAP_PENALTY)
        .max(0)
}

#[inline(always)]
fn cell_score(matrix: &ScoreMatrix, query: &[u8], reference: &[u8], i: usize, j: usize) -> i32 {
    recurrence(
        matrix.get(i - 1, j - 1),
        matrix.get(i - 1, j),
        matrix.get(i, j - 1),
        query[i - 1],
        reference[j - 1],
    )
}

/// Rebuild the alignment ending at `start` from a fully populated matrix.
///
/// Moves are tried diagonal, then up, then left. The walk stops on a zero
/// cell or at row/column 0.
pub fn traceback(
    matrix: &ScoreMatrix,
    query: &[u8],
    reference: &[u8],
    start: CellPosition,
) -> (Vec<u8>, Vec<u8>) {
    let mut aligned_query = Vec::new();
    let mut aligned_reference = Vec::new();
    let (mut i, mut j) = (start.row, start.col);

    while i > 0 && j > 0 && matrix.get(i, j) > 0 {
        let current = matrix.get(i, j);

        if current == matrix.get(i - 1, j - 1) + match_score(query[i - 1], reference[j - 1]) {
            aligned_query.push(query[i - 1]);
            aligned_reference.push(reference[j - 1]);
            i -= 1;
            j -= 1;
        } else if current == matrix.get(i - 1, j) + GAP_PENALTY {
            // gap in reference
            aligned_query.push(query[i - 1]);
            aligned_reference.push(GAP);
            i -= 1;
        } else if current == matrix.get(i, j - 1) + GAP_PENALTY {
            // gap in query
            aligned_query.push(GAP);
            aligned_reference.push(reference[j - 1]);
            j -= 1;
        } else {
            log::warn!("traceback found no predecessor for cell ({}, {}), stopping", i, j);
            break;
        }
    }

    aligned_query.reverse();
    aligned_reference.reverse();
    (aligned_query, aligned_reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MATCH_SCORE;

    fn strip(s: &[u8]) -> Vec<u8> {
        s.iter().copied().filter(|&c| c != GAP).collect()
    }

    fn contains(hay: &[u8], needle: &[u8]) -> bool {
        hay.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn perfect_match() {
        let r = align(b"GATTACA", b"GATTACA");
        assert_eq!(r.max_score, 14);
        assert_eq!(r.aligned_query, b"GATTACA");
        assert_eq!(r.aligned_reference, b"GATTACA");
        assert_eq!(r.max_position, Some(CellPosition { row: 7, col: 7 }));
    }

    #[test]
    fn one_mismatch() {
        let r = align(b"GATTACA", b"GATTTCA");
        assert_eq!(r.max_score, 11);
        assert_eq!(r.aligned_query, b"GATTACA");
        assert_eq!(r.aligned_reference, b"GATTTCA");
    }

    #[test]
    fn single_deletion() {
        let r = align(b"GATTACA", b"GATACA");
        assert_eq!(r.max_score, 10);
        assert_eq!(r.aligned_query.len(), r.aligned_reference.len());
        let gaps_q = r.aligned_query.iter().filter(|&&c| c == GAP).count();
        let gaps_r = r.aligned_reference.iter().filter(|&&c| c == GAP).count();
        assert_eq!(gaps_q + gaps_r, 1);
        assert!(contains(&strip(&r.aligned_query), b"GAT"));
        assert!(contains(&strip(&r.aligned_reference), b"ACA"));
    }

    #[test]
    fn partial_matches_at_either_end() {
        assert_eq!(align(b"GATTACA", b"GATXXXX").max_score, 6);
        assert_eq!(align(b"GATTACA", b"XXXXACA").max_score, 6);
    }

    #[test]
    fn local_region_inside_flanks() {
        let r = align(b"XXGATTACAXX", b"YYGATTACAYY");
        assert_eq!(r.max_score, 14);
        assert_eq!(r.aligned_query, b"GATTACA");

        let r = align(b"GATTACA", b"XXXXXXGATTACAYYYYYY");
        assert_eq!(r.max_score, 7 * MATCH_SCORE);
        assert_eq!(strip(&r.aligned_reference), b"GATTACA");
    }

    #[test]
    fn empty_inputs() {
        for (q, r) in [(&b""[..], &b"ACGT"[..]), (b"ACGT", b""), (b"", b"")] {
            let res = align(q, r);
            assert_eq!(res.max_score, 0);
            assert!(res.is_empty());
            assert!(res.aligned_reference.is_empty());
        }
    }

    #[test]
    fn no_shared_symbols() {
        let r = align(b"AAAA", b"TTTT");
        assert_eq!(r.max_score, 0);
        assert!(r.is_empty());
        assert_eq!(r.max_position, Some(CellPosition { row: 0, col: 0 }));
    }

    #[test]
    fn first_maximum_wins_ties() {
        // "AC" appears twice in the reference; the earlier column is kept
        let r = align(b"AC", b"ACGGAC");
        assert_eq!(r.max_score, 4);
        assert_eq!(r.max_position, Some(CellPosition { row: 2, col: 2 }));
    }

    #[test]
    fn matrix_has_expected_shape() {
        let r = align(b"ACG", b"AC");
        let m = r.matrix.unwrap();
        assert_eq!((m.rows(), m.cols()), (4, 3));
        assert!(m.row(0).iter().all(|&v| v == 0));
        assert!((0..m.rows()).all(|i| m.get(i, 0) == 0));
    }
}
