//! Reference bases from FASTA files using noodles.
//!
//! Loads every sequence of a FASTA file into memory so aligned records can
//! carry the bases they are placed on. Supports both uncompressed and
//! gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::bases::{BaseSource, SyntheticBases};

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("No sequences found in FASTA file: {0}")]
    Empty(String),
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
        || path_str.ends_with(".fa.bgz")
        || path_str.ends_with(".fasta.bgz")
        || path_str.ends_with(".fna.bgz")
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// In-memory reference sequences keyed by FASTA record name.
///
/// Lookups try the accession first and then the SAM alias. Positions that
/// fall outside a known sequence, or sequences that are not present at all,
/// are served by [`SyntheticBases`].
#[derive(Debug, Default)]
pub struct ReferenceBases {
    sequences: HashMap<String, Vec<u8>>,
}

impl ReferenceBases {
    /// Load all sequences from a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Io` if the file cannot be read,
    /// `ReferenceError::Noodles` if parsing fails, or `ReferenceError::Empty`
    /// if the file holds no sequences.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceError> {
        let file = std::fs::File::open(path)?;

        let reference = if is_gzipped(path) {
            let mut reader = fasta::io::Reader::new(BufReader::new(GzDecoder::new(file)));
            Self::from_reader(&mut reader)?
        } else {
            let mut reader = fasta::io::Reader::new(BufReader::new(file));
            Self::from_reader(&mut reader)?
        };

        if reference.sequences.is_empty() {
            return Err(ReferenceError::Empty(path.display().to_string()));
        }

        debug!(
            path = %path.display(),
            sequences = reference.sequences.len(),
            "Loaded reference FASTA"
        );

        Ok(reference)
    }

    fn from_reader<R: BufRead>(reader: &mut fasta::io::Reader<R>) -> Result<Self, ReferenceError> {
        let mut sequences = HashMap::new();

        for result in reader.records() {
            let record = result.map_err(|e| {
                ReferenceError::Noodles(format!("Failed to parse FASTA record: {e}"))
            })?;

            let name = String::from_utf8_lossy(record.name()).to_string();
            let bases: Vec<u8> = record
                .sequence()
                .as_ref()
                .iter()
                .map(u8::to_ascii_uppercase)
                .collect();

            sequences.insert(name, bases);
        }

        Ok(Self { sequences })
    }

    /// Add or replace a sequence.
    pub fn insert(&mut self, name: impl Into<String>, bases: impl Into<Vec<u8>>) {
        self.sequences.insert(name.into(), bases.into());
    }

    fn lookup(&self, reference: &str, alias: &str) -> Option<&[u8]> {
        self.sequences
            .get(reference)
            .or_else(|| self.sequences.get(alias))
            .map(Vec::as_slice)
    }
}

impl BaseSource for ReferenceBases {
    fn bases(&self, reference: &str, alias: &str, position: u64, length: usize) -> Vec<u8> {
        let window = self.lookup(reference, alias).and_then(|sequence| {
            let start = usize::try_from(position.checked_sub(1)?).ok()?;
            sequence.get(start..start.checked_add(length)?)
        });

        if let Some(window) = window {
            return window.to_vec();
        }

        warn!(
            reference,
            position,
            length,
            "Region not covered by the reference FASTA, using synthetic bases"
        );
        SyntheticBases.bases(reference, alias, position, length)
    }

    fn sequence_length(&self, reference: &str, alias: &str) -> Option<u64> {
        self.lookup(reference, alias).map(|s| s.len() as u64)
    }

    fn checksum(&self, reference: &str, alias: &str) -> Option<String> {
        // stored uppercase already
        self.lookup(reference, alias)
            .map(|s| format!("{:x}", md5::compute(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/NC_011752.1.FA")));

        assert!(!is_fasta_file(Path::new("test.sam")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_load_and_slice() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b">NC_011752.1 plasmid\nacgtACGT\nTTTT\n>other\nGGGG\n")
            .unwrap();
        temp.flush().unwrap();

        let reference = ReferenceBases::from_path(temp.path()).unwrap();
        assert_eq!(reference.sequence_length("NC_011752.1", "c1"), Some(12));
        assert_eq!(reference.bases("NC_011752.1", "c1", 3, 6), b"GTACGT".to_vec());
        assert_eq!(reference.bases("NC_011752.1", "c1", 9, 4), b"TTTT".to_vec());
    }

    #[test]
    fn test_lookup_by_alias() {
        let mut reference = ReferenceBases::default();
        reference.insert("c1", b"ACGTACGT".to_vec());
        assert_eq!(reference.bases("NC_011752.1", "c1", 1, 4), b"ACGT".to_vec());
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let mut reference = ReferenceBases::default();
        reference.insert("r", b"ACGT".to_vec());

        let bases = reference.bases("r", "r", 3, 10);
        assert_eq!(bases, SyntheticBases.bases("r", "r", 3, 10));

        let bases = reference.bases("missing", "m", 1, 5);
        assert_eq!(bases.len(), 5);
    }

    #[test]
    fn test_checksum_uses_uppercase() {
        // "ACGT" uppercase -> MD5 = f1f8f4bf413b16ad135722aa4591043e
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b">chr1\nacgt\n").unwrap();
        temp.flush().unwrap();

        let reference = ReferenceBases::from_path(temp.path()).unwrap();
        assert_eq!(
            reference.checksum("chr1", "c1"),
            Some("f1f8f4bf413b16ad135722aa4591043e".to_string())
        );
    }

    #[test]
    fn test_empty_fasta() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b"").unwrap();
        temp.flush().unwrap();

        assert!(matches!(
            ReferenceBases::from_path(temp.path()),
            Err(ReferenceError::Empty(_))
        ));
    }
}
