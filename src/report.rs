// text rendering and mutation calls for finished alignments
// only reads AlignmentResult fields

use std::fmt::Write as _;

use serde::Serialize;

use crate::result::AlignmentResult;
use crate::scoring::GAP;

/// Column counts for a pair of aligned strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    /// columns with a gap marker in the aligned query
    pub query_gaps: usize,
    /// columns with a gap marker in the aligned reference
    pub reference_gaps: usize,
    pub length: usize,
}

impl AlignmentStats {
    pub fn from_aligned(aligned_query: &[u8], aligned_reference: &[u8]) -> Self {
        let mut stats = AlignmentStats::default();
        for (&q, &r) in aligned_query.iter().zip(aligned_reference) {
            stats.length += 1;
            if q == GAP {
                stats.query_gaps += 1;
            } else if r == GAP {
                stats.reference_gaps += 1;
            } else if q == r {
                stats.matches += 1;
            } else {
                stats.mismatches += 1;
            }
        }
        stats
    }

    pub fn of(result: &AlignmentResult) -> Self {
        Self::from_aligned(&result.aligned_query, &result.aligned_reference)
    }

    /// Fraction of columns that are matches, 0 for an empty alignment.
    pub fn identity(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            self.matches as f64 / self.length as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Snp,
    Insertion,
    Deletion,
}

/// One difference between the query and the reference inside the aligned region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutation {
    pub kind: MutationKind,
    /// reference offset for deletions, query offset otherwise, from the region start
    pub position: usize,
    pub length: usize,
    pub original: String,
    pub mutated: String,
}

/// Call SNPs, insertions and deletions from an aligned pair.
///
/// A gap in the query is a deletion, a gap in the reference an insertion.
/// Adjacent gap columns of the same kind merge into one event.
pub fn detect_mutations(aligned_query: &[u8], aligned_reference: &[u8]) -> Vec<Mutation> {
    let mut mutations: Vec<Mutation> = Vec::new();
    let (mut query_pos, mut ref_pos) = (0usize, 0usize);
    let mut open_gap: Option<MutationKind> = None;

    for (&q, &r) in aligned_query.iter().zip(aligned_reference) {
        if q == GAP {
            match (open_gap, mutations.last_mut()) {
                (Some(MutationKind::Deletion), Some(last)) => {
                    last.original.push(r as char);
                    last.length += 1;
                }
                _ => mutations.push(Mutation {
                    kind: MutationKind::Deletion,
                    position: ref_pos,
                    length: 1,
                    original: (r as char).to_string(),
                    mutated: "-".to_string(),
                }),
            }
            open_gap = Some(MutationKind::Deletion);
            ref_pos += 1;
        } else if r == GAP {
            match (open_gap, mutations.last_mut()) {
                (Some(MutationKind::Insertion), Some(last)) => {
                    last.mutated.push(q as char);
                    last.length += 1;
                }
                _ => mutations.push(Mutation {
                    kind: MutationKind::Insertion,
                    position: query_pos,
                    length: 1,
                    original: "-".to_string(),
                    mutated: (q as char).to_string(),
                }),
            }
            open_gap = Some(MutationKind::Insertion);
            query_pos += 1;
        } else {
            if q != r {
                mutations.push(Mutation {
                    kind: MutationKind::Snp,
                    position: query_pos,
                    length: 1,
                    original: (r as char).to_string(),
                    mutated: (q as char).to_string(),
                });
            }
            open_gap = None;
            query_pos += 1;
            ref_pos += 1;
        }
    }

    mutations
}

/// `|` for a match, `.` for a mismatch, space for a gap column.
pub fn match_line(aligned_query: &[u8], aligned_reference: &[u8]) -> String {
    aligned_query
        .iter()
        .zip(aligned_reference)
        .map(|(&q, &r)| {
            if q == GAP || r == GAP {
                ' '
            } else if q == r {
                '|'
            } else {
                '.'
            }
        })
        .collect()
}

/// Score line plus the query, match and reference rows.
///
/// With `width = Some(w)` only the first `w` columns are shown, followed by `...`.
pub fn render_alignment(result: &AlignmentResult, width: Option<usize>) -> String {
    let shown = width.map_or(result.len(), |w| w.min(result.len()));
    let ellipsis = if shown < result.len() { "..." } else { "" };
    let query = &result.aligned_query[..shown];
    let reference = &result.aligned_reference[..shown];

    let mut out = String::new();
    let _ = writeln!(out, "Score: {}", result.max_score);
    let _ = writeln!(out, "Query:     {}{}", String::from_utf8_lossy(query), ellipsis);
    let _ = writeln!(out, "           {}", match_line(query, reference));
    let _ = writeln!(out, "Reference: {}{}", String::from_utf8_lossy(reference), ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smith_waterman::align;

    #[test]
    fn stats_count_every_column() {
        let s = AlignmentStats::from_aligned(b"GAT-ACA", b"GATTAGA");
        assert_eq!(s.length, 7);
        assert_eq!(s.matches, 5);
        assert_eq!(s.mismatches, 1);
        assert_eq!(s.query_gaps, 1);
        assert_eq!(s.reference_gaps, 0);
        assert!((s.identity() - 5.0 / 7.0).abs() < 1e-12);
        assert_eq!(AlignmentStats::default().identity(), 0.0);
    }

    #[test]
    fn match_line_marks_columns() {
        assert_eq!(match_line(b"GA-TC", b"GATTA"), "|| |.");
    }

    #[test]
    fn mutations_are_merged_and_positioned() {
        let muts = detect_mutations(b"GA--TACCA", b"GATTTAC-G");
        assert_eq!(muts.len(), 3);

        assert_eq!(muts[0].kind, MutationKind::Deletion);
        assert_eq!(muts[0].position, 2);
        assert_eq!(muts[0].length, 2);
        assert_eq!(muts[0].original, "TT");

        assert_eq!(muts[1].kind, MutationKind::Insertion);
        assert_eq!(muts[1].position, 5);
        assert_eq!(muts[1].mutated, "C");

        assert_eq!(muts[2].kind, MutationKind::Snp);
        assert_eq!(muts[2].position, 6);
        assert_eq!((muts[2].original.as_str(), muts[2].mutated.as_str()), ("G", "A"));
    }

    #[test]
    fn serializes_kind_lowercase() {
        let muts = detect_mutations(b"A", b"C");
        let json = serde_json::to_string(&muts).unwrap();
        assert!(json.contains("\"kind\":\"snp\""));
    }

    #[test]
    fn renders_truncated_alignment() {
        let r = align(b"GATTACA", b"GATTTCA");
        let full = render_alignment(&r, None);
        assert!(full.contains("Score: 11"));
        assert!(full.contains("Query:     GATTACA\n"));
        assert!(full.contains("           ||||.||\n"));

        let short = render_alignment(&r, Some(3));
        assert!(short.contains("Query:     GAT...\n"));
        assert!(short.contains("Reference: GAT...\n"));
    }
}
