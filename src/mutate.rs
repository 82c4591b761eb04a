//! Synthetic DNA sequences and mutations for exercising the aligners.
//!
//! Every function that needs randomness takes the generator explicitly, so a
//! seeded `fastrand::Rng` reproduces the same sequences on every run.

use fastrand::Rng;

/// DNA bases used in sequence generation.
pub const BASES: [u8; 4] = [b'A', b'T', b'C', b'G'];

/// Random DNA sequence of `len` bases.
pub fn random_sequence(rng: &mut Rng, len: usize) -> String {
    (0..len).map(|_| random_base(rng) as char).collect()
}

/// Replace the base at `position` with a different random base.
///
/// An out-of-range position returns the input unchanged.
pub fn snp(rng: &mut Rng, original: &str, position: usize) -> String {
    let mut seq = original.as_bytes().to_vec();
    match seq.get_mut(position) {
        Some(base) => *base = different_base(rng, *base),
        None => return original.to_string(),
    }
    into_string(seq)
}

/// Insert `inserted` before `position`. `position == len` appends.
pub fn insertion(original: &str, position: usize, inserted: &str) -> String {
    if position > original.len() {
        return original.to_string();
    }
    let bytes = original.as_bytes();
    let mut seq = Vec::with_capacity(bytes.len() + inserted.len());
    seq.extend_from_slice(&bytes[..position]);
    seq.extend_from_slice(inserted.as_bytes());
    seq.extend_from_slice(&bytes[position..]);
    into_string(seq)
}

/// Remove up to `len` bases starting at `position`.
///
/// An out-of-range start returns the input unchanged; the run is clipped at the end.
pub fn deletion(original: &str, position: usize, len: usize) -> String {
    let bytes = original.as_bytes();
    if position >= bytes.len() {
        return original.to_string();
    }
    let end = position.saturating_add(len).min(bytes.len());
    let mut seq = bytes[..position].to_vec();
    seq.extend_from_slice(&bytes[end..]);
    into_string(seq)
}

/// Substitute each base independently with probability `rate`.
///
/// A rate outside `(0, 1]` returns the input unchanged.
pub fn mutate_at_rate(rng: &mut Rng, original: &str, rate: f64) -> String {
    if !(rate > 0.0 && rate <= 1.0) {
        return original.to_string();
    }
    let seq = original
        .bytes()
        .map(|base| {
            if rng.f64() < rate {
                different_base(rng, base)
            } else {
                base
            }
        })
        .collect();
    into_string(seq)
}

/// Substitute exactly `count` distinct positions.
///
/// `count == 0` or `count > len` returns the input unchanged.
pub fn multiple_mutations(rng: &mut Rng, original: &str, count: usize) -> String {
    let mut seq = original.as_bytes().to_vec();
    if count == 0 || count > seq.len() {
        return original.to_string();
    }

    let mut positions: Vec<usize> = (0..seq.len()).collect();
    rng.shuffle(&mut positions);
    for &pos in &positions[..count] {
        seq[pos] = different_base(rng, seq[pos]);
    }
    into_string(seq)
}

/// Majority base at each position, over the length of the shortest sequence.
///
/// Ties go to the base that appears first, in input order, at that position.
pub fn consensus<S: AsRef<str>>(sequences: &[S]) -> String {
    let min_len = match sequences.iter().map(|s| s.as_ref().len()).min() {
        Some(len) => len,
        None => return String::new(),
    };

    let mut out = Vec::with_capacity(min_len);
    // (base, count) in first-seen order; at most a handful of distinct bases per column
    let mut counts: Vec<(u8, usize)> = Vec::with_capacity(BASES.len());
    for i in 0..min_len {
        counts.clear();
        for seq in sequences {
            let base = seq.as_ref().as_bytes()[i];
            match counts.iter_mut().find(|(b, _)| *b == base) {
                Some((_, n)) => *n += 1,
                None => counts.push((base, 1)),
            }
        }
        let mut winner = counts[0];
        for &(base, n) in &counts[1..] {
            if n > winner.1 {
                winner = (base, n);
            }
        }
        out.push(winner.0);
    }
    into_string(out)
}

/// True for a non-empty sequence of A, C, G and T (either case).
pub fn is_valid_dna(seq: &str) -> bool {
    !seq.is_empty()
        && seq
            .bytes()
            .all(|c| matches!(c.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
}

fn random_base(rng: &mut Rng) -> u8 {
    BASES[rng.usize(..BASES.len())]
}

fn different_base(rng: &mut Rng, original: u8) -> u8 {
    loop {
        let base = random_base(rng);
        if base != original {
            return base;
        }
    }
}

// inputs are sliced and spliced at byte offsets; non-ASCII input degrades lossily
fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
