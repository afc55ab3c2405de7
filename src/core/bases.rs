//! Where the bases of aligned records come from.
//!
//! Aligned records are built without bases; they are filled in when a batch
//! is written, from a [`BaseSource`]. A FASTA-backed source lives in
//! [`crate::io::fasta`]; [`SyntheticBases`] is the fallback when no reference
//! file is available.

const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Bases per md5 digest block (16 bytes, 2 bits per base).
const BLOCK_LEN: u64 = 64;

/// Upper bound on the buffer reserved up front for one request.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Supplies reference bases for aligned records.
pub trait BaseSource {
    /// Return `length` bases starting at the 1-based `position` on the
    /// sequence known as `reference` (or `alias` in the SAM batch).
    fn bases(&self, reference: &str, alias: &str, position: u64, length: usize) -> Vec<u8>;

    /// Length of the sequence, when the source knows it.
    fn sequence_length(&self, _reference: &str, _alias: &str) -> Option<u64> {
        None
    }

    /// Lowercase hex MD5 of the uppercase sequence, when the source knows it.
    fn checksum(&self, _reference: &str, _alias: &str) -> Option<String> {
        None
    }
}

/// Deterministic pseudo-reference derived from md5 digests.
///
/// Every absolute position of a sequence always yields the same base, so
/// overlapping reads agree with each other.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticBases;

impl SyntheticBases {
    fn block(reference: &str, index: u64) -> [u8; 16] {
        md5::compute(format!("{reference}:{index}")).0
    }
}

impl BaseSource for SyntheticBases {
    fn bases(&self, reference: &str, _alias: &str, position: u64, length: usize) -> Vec<u8> {
        let start = position.saturating_sub(1);
        let mut out = Vec::with_capacity(length.min(MAX_PREALLOCATED));
        let mut cached: Option<(u64, [u8; 16])> = None;

        for offset in 0..length as u64 {
            let pos = start.saturating_add(offset);
            let index = pos / BLOCK_LEN;
            let digest = match cached {
                Some((i, d)) if i == index => d,
                _ => {
                    let d = Self::block(reference, index);
                    cached = Some((index, d));
                    d
                }
            };
            let within = (pos % BLOCK_LEN) as usize;
            let code = (digest[within / 4] >> ((within % 4) * 2)) & 0b11;
            out.push(NUCLEOTIDES[code as usize]);
        }

        out
    }
}
