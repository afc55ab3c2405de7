//! Lenient CIGAR arithmetic.
//!
//! CIGAR strings are never validated here. They are only measured so that a
//! record can be given the right number of bases; parsing stops at the first
//! malformed operation and whatever was read up to that point is used.

/// Iterate `(length, operation)` pairs until the text stops being a CIGAR.
fn operations(cigar: &str) -> impl Iterator<Item = (u64, u8)> + '_ {
    let mut bytes = cigar.bytes();
    std::iter::from_fn(move || {
        let mut length: Option<u64> = None;
        for b in bytes.by_ref() {
            if b.is_ascii_digit() {
                let digit = u64::from(b - b'0');
                length = Some(length.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            } else {
                return length.map(|n| (n, b));
            }
        }
        None
    })
}

/// Number of read bases described by the CIGAR (M, I, S, = and X).
#[must_use]
pub fn read_length(cigar: &str) -> usize {
    let total: u64 = operations(cigar)
        .filter(|(_, op)| matches!(op, b'M' | b'I' | b'S' | b'=' | b'X'))
        .fold(0, |total: u64, (n, _)| total.saturating_add(n));
    usize::try_from(total).unwrap_or(usize::MAX)
}

/// Number of reference bases covered by the CIGAR (M, D, N, = and X).
#[must_use]
pub fn reference_span(cigar: &str) -> u64 {
    operations(cigar)
        .filter(|(_, op)| matches!(op, b'M' | b'D' | b'N' | b'=' | b'X'))
        .fold(0, |total: u64, (n, _)| total.saturating_add(n))
}
