//! Synthetic alignment records.
//!
//! Records are plain values. Builders never validate their input: positions,
//! CIGAR strings and mapping qualities are passed through to the loader
//! exactly as given, and the loader decides what is acceptable.

use serde::Serialize;
use tracing::debug;

use crate::core::cigar;
use crate::core::flags::{Flags, TEMPLATE_BITS};

/// Mate reference name meaning "same reference as this record".
pub const SAME_REFERENCE: &str = "=";

/// Which of the three record shapes a value was built as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    Primary,
    Secondary,
    Unaligned,
}

impl std::fmt::Display for AlignmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Unaligned => write!(f, "unaligned"),
        }
    }
}

/// Placement of an aligned record on a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Reference sequence accession (e.g. `NC_011752.1`)
    pub reference: String,

    /// Name used for the reference inside the SAM batch (e.g. `c1`)
    pub alias: String,

    /// 1-based leftmost position
    pub position: u64,
}

/// Where the other segment of the template sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MateInfo {
    /// RNEXT column, `=` for the same reference
    pub reference: String,

    /// PNEXT column, 1-based
    pub position: u64,
}

/// One synthetic alignment record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub kind: AlignmentKind,

    /// Read name (QNAME)
    pub name: String,

    pub flags: Flags,

    /// `None` for unaligned reads
    pub placement: Option<Placement>,

    /// Mapping quality
    pub mapq: u8,

    /// CIGAR text, `*` for unaligned reads
    pub cigar: String,

    pub mate: Option<MateInfo>,

    /// TLEN column
    pub template_length: i64,

    /// Explicit bases. Aligned records leave this empty and take their bases
    /// from a [`crate::core::bases::BaseSource`] when written.
    pub bases: Option<String>,
}

impl Alignment {
    #[allow(clippy::too_many_arguments)]
    fn aligned(
        kind: AlignmentKind,
        name: &str,
        flags: Flags,
        reference: &str,
        alias: &str,
        position: u64,
        mapq: u8,
        cigar: &str,
    ) -> Self {
        Self {
            kind,
            name: name.to_string(),
            flags,
            placement: Some(Placement {
                reference: reference.to_string(),
                alias: alias.to_string(),
                position,
            }),
            mapq,
            cigar: cigar.to_string(),
            mate: None,
            template_length: 0,
            bases: None,
        }
    }

    /// Number of read bases this record should carry
    #[must_use]
    pub fn read_length(&self) -> usize {
        match &self.bases {
            Some(bases) => bases.len(),
            None => cigar::read_length(&self.cigar),
        }
    }

    /// 1-based position of the last reference base covered, if aligned.
    ///
    /// Saturates at `u64::MAX` for out-of-range positions or spans.
    #[must_use]
    pub fn end(&self) -> Option<u64> {
        let placement = self.placement.as_ref()?;
        let span = cigar::reference_span(&self.cigar).max(1);
        Some(placement.position.saturating_add(span - 1))
    }

    #[must_use]
    pub fn is_secondary(&self) -> bool {
        self.flags.contains(Flags::SECONDARY)
    }
}

/// Build a primary alignment.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn make_primary(
    name: &str,
    flags: Flags,
    reference: &str,
    alias: &str,
    position: u64,
    mapq: u8,
    cigar: &str,
) -> Alignment {
    Alignment::aligned(
        AlignmentKind::Primary,
        name,
        flags,
        reference,
        alias,
        position,
        mapq,
        cigar,
    )
}

/// Build a primary alignment that is the second segment of `mate`'s template.
///
/// Segments of one template share a read name, so the new record takes
/// `mate`'s name; `name` only labels the call site. Both records get the
/// paired bit, `mate` becomes the first segment and the new record the last,
/// and each one points at the other's position with mirrored template lengths.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn make_mate(
    name: &str,
    flags: Flags,
    reference: &str,
    alias: &str,
    position: u64,
    mapq: u8,
    cigar: &str,
    mate: &mut Alignment,
) -> Alignment {
    if name != mate.name {
        debug!(name, mate = %mate.name, "Mate keeps the template's read name");
    }

    let mut record = Alignment::aligned(
        AlignmentKind::Primary,
        &mate.name,
        flags,
        reference,
        alias,
        position,
        mapq,
        cigar,
    );

    mate.flags |= Flags::SEGMENTED | Flags::FIRST_SEGMENT;
    record.flags |= Flags::SEGMENTED | Flags::LAST_SEGMENT;

    if let (Some(ours), Some(theirs)) = (record.placement.clone(), mate.placement.clone()) {
        let same_reference = ours.reference == theirs.reference;
        let reference_of = |p: &Placement| {
            if same_reference {
                SAME_REFERENCE.to_string()
            } else {
                p.alias.clone()
            }
        };

        record.mate = Some(MateInfo {
            reference: reference_of(&theirs),
            position: theirs.position,
        });
        mate.mate = Some(MateInfo {
            reference: reference_of(&ours),
            position: ours.position,
        });

        if same_reference {
            let template_length = template_length(mate, &record);
            mate.template_length = template_length;
            record.template_length = -template_length;
        }
    }

    record
}

/// Observed template length, signed from `first`'s point of view.
fn template_length(first: &Alignment, second: &Alignment) -> i64 {
    let (Some(a), Some(b)) = (first.placement.as_ref(), second.placement.as_ref()) else {
        return 0;
    };
    let (Some(a_end), Some(b_end)) = (first.end(), second.end()) else {
        return 0;
    };

    let left = a.position.min(b.position);
    let right = a_end.max(b_end);
    let length =
        i64::try_from(right.saturating_sub(left).saturating_add(1)).unwrap_or(i64::MAX);

    if a.position <= b.position {
        length
    } else {
        -length
    }
}

/// Build a secondary alignment, optionally linked to a `parent` record.
///
/// A parent is only read: its read name, template bits and mate position are
/// copied so the secondary describes another placement of the same read.
/// Without a parent the record keeps its own name and belongs to no primary.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn make_secondary(
    name: &str,
    flags: Flags,
    reference: &str,
    alias: &str,
    position: u64,
    mapq: u8,
    cigar: &str,
    parent: Option<&Alignment>,
) -> Alignment {
    let mut record = Alignment::aligned(
        AlignmentKind::Secondary,
        name,
        flags | Flags::SECONDARY,
        reference,
        alias,
        position,
        mapq,
        cigar,
    );

    if let Some(parent) = parent {
        record.name.clone_from(&parent.name);
        record.flags |= parent.flags & TEMPLATE_BITS;
        record.mate.clone_from(&parent.mate);
    }

    record
}

/// Build an unaligned read carrying its own bases.
#[must_use]
pub fn make_unaligned(name: &str, flags: Flags, bases: &str) -> Alignment {
    Alignment {
        kind: AlignmentKind::Unaligned,
        name: name.to_string(),
        flags: flags | Flags::UNMAPPED,
        placement: None,
        mapq: 0,
        cigar: "*".to_string(),
        mate: None,
        template_length: 0,
        bases: Some(bases.to_string()),
    }
}
