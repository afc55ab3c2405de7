//! Rendering a record list as a loader batch.
//!
//! A batch is two files: a SAM file whose header is built with noodles and
//! whose records are written column by column, and the loader's alias
//! configuration mapping each SAM reference name to its accession.
//!
//! Records are not routed through the noodles record types because those
//! validate CIGARs, names and positions; the batch has to carry malformed
//! values to the loader untouched.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use noodles::sam;
use noodles::sam::header::record::value::map::{self, tag::Other, ReferenceSequence};
use noodles::sam::header::record::value::Map;
use tracing::{debug, warn};

use crate::core::alignment::Alignment;
use crate::core::bases::BaseSource;

/// Quality character written for every base (Phred 30).
pub const QUALITY: u8 = b'?';

/// Largest `@SQ LN` the SAM format allows
pub const MAX_REFERENCE_LENGTH: u64 = (1 << 31) - 1;

/// Longest read whose bases are generated; longer reads are written as `*`.
pub const MAX_GENERATED_READ_LENGTH: usize = 1 << 20;

/// File name of the SAM batch inside the work directory
pub const SAM_FILE_NAME: &str = "batch.sam";

/// File name of the alias configuration inside the work directory
pub const ALIAS_CONFIG_FILE_NAME: &str = "batch.config";

/// Paths of a written batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFiles {
    pub sam: PathBuf,
    pub alias_config: PathBuf,
}

/// A reference sequence referenced by the batch, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReference {
    pub alias: String,
    pub reference: String,
    pub length: u64,
    pub md5: Option<String>,
}

/// Collect the distinct references of a batch.
///
/// Lengths come from the base source when it knows them, otherwise they are
/// the furthest position any record on that alias reaches, clamped to
/// [`MAX_REFERENCE_LENGTH`].
pub fn batch_references(records: &[Alignment], bases: &dyn BaseSource) -> Vec<BatchReference> {
    let mut references: Vec<BatchReference> = Vec::new();

    for record in records {
        let Some(placement) = &record.placement else {
            continue;
        };
        let end = record.end().unwrap_or(placement.position);

        if let Some(existing) = references.iter_mut().find(|r| r.alias == placement.alias) {
            if bases
                .sequence_length(&existing.reference, &existing.alias)
                .is_none()
            {
                existing.length = existing.length.max(end.min(MAX_REFERENCE_LENGTH));
            }
            continue;
        }

        let length = bases
            .sequence_length(&placement.reference, &placement.alias)
            .unwrap_or(end);

        references.push(BatchReference {
            alias: placement.alias.clone(),
            reference: placement.reference.clone(),
            length: length.clamp(1, MAX_REFERENCE_LENGTH),
            md5: bases.checksum(&placement.reference, &placement.alias),
        });
    }

    references
}

/// Build the SAM header for a batch.
///
/// # Errors
///
/// Returns an `InvalidInput` error if a reference length does not fit the
/// platform's `usize`.
pub fn build_header(references: &[BatchReference]) -> io::Result<sam::Header> {
    let mut builder = sam::Header::builder().set_header(Map::<map::Header>::default());

    for reference in references {
        let length = usize::try_from(reference.length)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid length for {}: {}", reference.alias, reference.length),
                )
            })?;

        let mut map = Map::<ReferenceSequence>::new(length);
        if let Some(md5) = &reference.md5 {
            if let Ok(m5_tag) = Other::try_from(*b"M5") {
                map.other_fields_mut().insert(m5_tag, md5.clone().into());
            }
        }

        builder = builder.add_reference_sequence(reference.alias.as_str(), map);
    }

    Ok(builder.build())
}

/// Render one record as a SAM line (without the trailing newline).
pub fn format_record(record: &Alignment, bases: &dyn BaseSource) -> String {
    let sequence: Vec<u8> = match (&record.bases, &record.placement) {
        (Some(own), _) => own.as_bytes().to_vec(),
        (None, Some(placement)) => {
            let length = record.read_length();
            if length > MAX_GENERATED_READ_LENGTH {
                warn!(
                    name = %record.name,
                    cigar = %record.cigar,
                    "Read too long to generate bases for, writing '*'"
                );
                Vec::new()
            } else {
                bases.bases(&placement.reference, &placement.alias, placement.position, length)
            }
        }
        (None, None) => Vec::new(),
    };

    let (sequence, qualities) = if sequence.is_empty() {
        ("*".to_string(), "*".to_string())
    } else {
        (
            String::from_utf8_lossy(&sequence).into_owned(),
            String::from_utf8(vec![QUALITY; sequence.len()]).unwrap_or_default(),
        )
    };

    let (rname, pos) = match &record.placement {
        Some(placement) => (placement.alias.as_str(), placement.position),
        None => ("*", 0),
    };
    let (rnext, pnext) = match &record.mate {
        Some(mate) => (mate.reference.as_str(), mate.position),
        None => ("*", 0),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.name,
        record.flags.bits(),
        rname,
        pos,
        record.mapq,
        record.cigar,
        rnext,
        pnext,
        record.template_length,
        sequence,
        qualities,
    )
}

/// Write the SAM text of a batch.
///
/// # Errors
///
/// Returns any error from the underlying writer or from building the header.
pub fn write_sam<W: Write>(
    mut writer: W,
    records: &[Alignment],
    bases: &dyn BaseSource,
) -> io::Result<()> {
    let references = batch_references(records, bases);
    let header = build_header(&references)?;

    {
        let mut sam_writer = sam::io::Writer::new(&mut writer);
        sam_writer.write_header(&header)?;
    }

    for record in records {
        writeln!(writer, "{}", format_record(record, bases))?;
    }

    writer.flush()
}

/// Write the alias configuration: one `alias<TAB>accession` line per reference.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_alias_config<W: Write>(
    mut writer: W,
    records: &[Alignment],
    bases: &dyn BaseSource,
) -> io::Result<()> {
    for reference in batch_references(records, bases) {
        writeln!(writer, "{}\t{}", reference.alias, reference.reference)?;
    }
    writer.flush()
}

/// Write both batch files into `dir`, replacing earlier ones.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_batch(
    dir: &Path,
    records: &[Alignment],
    bases: &dyn BaseSource,
) -> io::Result<BatchFiles> {
    std::fs::create_dir_all(dir)?;

    let files = BatchFiles {
        sam: dir.join(SAM_FILE_NAME),
        alias_config: dir.join(ALIAS_CONFIG_FILE_NAME),
    };

    write_sam(BufWriter::new(File::create(&files.sam)?), records, bases)?;
    write_alias_config(
        BufWriter::new(File::create(&files.alias_config)?),
        records,
        bases,
    )?;

    debug!(
        sam = %files.sam.display(),
        config = %files.alias_config.display(),
        records = records.len(),
        "Wrote load batch"
    );

    Ok(files)
}
