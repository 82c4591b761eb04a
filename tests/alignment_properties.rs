//! Randomised invariants shared by all three engines.

use proptest::prelude::*;
use rustseq_sw::scoring::{GAP, MATCH_SCORE};
use rustseq_sw::{align, align_batch, align_parallel};

fn dna_seq(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
        min_len..=max_len,
    )
}

fn strip(seq: &[u8]) -> Vec<u8> {
    seq.iter().copied().filter(|&c| c != GAP).collect()
}

fn is_substring(hay: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || hay.windows(needle.len()).any(|w| w == needle)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matrix_cells_are_never_negative(q in dna_seq(0, 40), r in dna_seq(0, 40)) {
        let result = align(&q, &r);
        let matrix = result.matrix.expect("sequential keeps the matrix");
        prop_assert_eq!(matrix.rows(), q.len() + 1);
        prop_assert_eq!(matrix.cols(), r.len() + 1);
        prop_assert!(matrix.min_value() >= 0);
    }

    #[test]
    fn score_is_symmetric(a in dna_seq(0, 40), b in dna_seq(0, 40)) {
        prop_assert_eq!(align(&a, &b).max_score, align(&b, &a).max_score);
    }

    #[test]
    fn self_alignment_is_identity(s in dna_seq(1, 60)) {
        let result = align(&s, &s);
        prop_assert_eq!(result.max_score, s.len() as i32 * MATCH_SCORE);
        prop_assert_eq!(&result.aligned_query, &s);
        prop_assert_eq!(&result.aligned_reference, &s);
    }

    #[test]
    fn aligned_strings_are_well_formed(q in dna_seq(0, 50), r in dna_seq(0, 50)) {
        let result = align(&q, &r);
        prop_assert_eq!(result.aligned_query.len(), result.aligned_reference.len());
        for (&a, &b) in result.aligned_query.iter().zip(&result.aligned_reference) {
            prop_assert!(!(a == GAP && b == GAP));
        }
        prop_assert!(is_substring(&q, &strip(&result.aligned_query)));
        prop_assert!(is_substring(&r, &strip(&result.aligned_reference)));
    }

    #[test]
    fn wavefront_matches_sequential(
        q in dna_seq(50, 90),
        r in dna_seq(50, 90),
        workers in 1usize..6,
    ) {
        let seq = align(&q, &r);
        let par = align_parallel(&q, &r, workers);
        prop_assert_eq!(par.max_score, seq.max_score);
        prop_assert_eq!(par.max_position, seq.max_position);
        prop_assert_eq!(&par.aligned_query, &seq.aligned_query);
        prop_assert_eq!(&par.aligned_reference, &seq.aligned_reference);
    }

    #[test]
    fn parallel_score_matches_on_short_inputs(
        q in dna_seq(0, 49),
        r in dna_seq(0, 80),
        workers in 1usize..4,
    ) {
        prop_assert_eq!(align_parallel(&q, &r, workers).max_score, align(&q, &r).max_score);
    }

    #[test]
    fn batch_results_are_index_aligned(
        q in dna_seq(0, 30),
        refs in proptest::collection::vec(dna_seq(0, 30), 0..12),
        k in 0usize..8,
    ) {
        let results = align_batch(&q, &refs, k);
        prop_assert_eq!(results.len(), refs.len());
        for (result, reference) in results.iter().zip(&refs) {
            prop_assert_eq!(result, &align(&q, reference));
        }
    }
}
