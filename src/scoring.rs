// fixed linear scoring for DNA local alignment
// +2 if the bases match, -1 if they dont, -2 per gap position

/// Reward for two identical symbols.
pub const MATCH_SCORE: i32 = 2;

/// Penalty for two differing symbols.
pub const MISMATCH_SCORE: i32 = -1;

/// Penalty for one inserted or deleted symbol.
pub const GAP_PENALTY: i32 = -2;

/// Placeholder written on the side of an alignment that did not consume a symbol.
pub const GAP: u8 = b'-';

/// Substitution score for a pair of symbols.
#[inline(always)]
pub fn match_score(a: u8, b: u8) -> i32 {
    if a == b {
        MATCH_SCORE
    } else {
        MISMATCH_SCORE
    }
}
