//! The scenarios: secondary alignments that have no primary to belong to.
//!
//! Two of them are known to trip defects in the external tools. Scenario 2
//! makes the SEQUENCE table unable to reconstruct READ. Scenario 3 does the
//! same on the loaded database, and the dumper crashes on the sorted one.
//! A passing run only says the loader and sorter succeeded; the dumps are
//! there to be compared by hand.

use crate::core::alignment::{make_mate, make_primary, make_secondary, make_unaligned, Alignment};
use crate::core::flags::{Flags, NEXT_UNMAPPED};

/// Reference accession all scenarios align to
pub const REFERENCE: &str = "NC_011752.1";

/// Name of [`REFERENCE`] inside the SAM batch
pub const REFERENCE_ALIAS: &str = "c1";

const MAPQ: u8 = 20;

/// One batch of records and how to report it
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub number: usize,

    /// Lines printed under the banner
    pub notes: &'static [&'static str],

    /// Known misbehavior of the external tools on this batch
    pub known_issue: Option<&'static str>,

    /// Whether the SEC table is dumped too
    pub with_secondary: bool,

    build: fn() -> Vec<Alignment>,
}

impl Scenario {
    /// Build the scenario's records, in load order.
    #[must_use]
    pub fn records(&self) -> Vec<Alignment> {
        (self.build)()
    }

    #[must_use]
    pub fn banner(&self) -> String {
        format!("test #{} {}", self.number, "-".repeat(50))
    }

    /// First note, or a generic label
    #[must_use]
    pub fn title(&self) -> String {
        self.notes.first().map_or_else(
            || format!("scenario {}", self.number),
            |note| note.trim_start_matches('.').to_string(),
        )
    }
}

fn primary(name: &str, position: u64, cigar: &str) -> Alignment {
    make_primary(
        name,
        Flags::empty(),
        REFERENCE,
        REFERENCE_ALIAS,
        position,
        MAPQ,
        cigar,
    )
}

fn secondary(name: &str, position: u64, cigar: &str, parent: Option<&Alignment>) -> Alignment {
    make_secondary(
        name,
        Flags::empty(),
        REFERENCE,
        REFERENCE_ALIAS,
        position,
        MAPQ,
        cigar,
        parent,
    )
}

fn orphan_secondary() -> Vec<Alignment> {
    let mut a1 = primary("A1", 17000, "60M");
    let a2 = make_mate(
        "A2",
        Flags::empty(),
        REFERENCE,
        REFERENCE_ALIAS,
        12500,
        MAPQ,
        "50M",
        &mut a1,
    );
    let a3 = primary("A3", 33000, "60M");
    let u1 = make_unaligned("U1", Flags::empty(), "ACTTTAGTAAGGGGTTNN");
    let a4 = secondary("A4", 19000, "60M", Some(&a1));
    let a5 = secondary("A5", 22000, "30M", None);

    vec![a1, a2, a3, a4, u1, a5]
}

fn primary_with_secondary() -> Vec<Alignment> {
    let a1 = primary("A1", 17000, "60M");
    let a2 = secondary("A2", 12500, "50M", Some(&a1));

    vec![a1, a2]
}

fn secondary_with_unmapped_mate() -> Vec<Alignment> {
    let a1 = primary("A1", 1000, "53M");
    let a2 = secondary("A2", 3500, "50M", Some(&a1));
    let mut a3 = secondary("A3", 6800, "55M", None);
    a3.flags |= NEXT_UNMAPPED;

    vec![a3, a1, a2]
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        number: 1,
        notes: &["...having a single secondary alignment without a primary it belongs to"],
        known_issue: None,
        with_secondary: true,
        build: orphan_secondary,
    },
    Scenario {
        number: 2,
        notes: &[
            "...having a pair of a prim. and a sec. alignment",
            "= SEQUENCE-table cannot reconstruct READ",
        ],
        known_issue: Some("READ reconstruction errors in both databases"),
        with_secondary: false,
        build: primary_with_secondary,
    },
    Scenario {
        number: 3,
        notes: &[],
        known_issue: Some(
            "READ reconstruction errors in the loaded database, vdb-dump crashes on the sorted one",
        ),
        with_secondary: false,
        build: secondary_with_unmapped_mate,
    },
];

/// All scenarios in run order
#[must_use]
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

/// Look a scenario up by its 1-based number
#[must_use]
pub fn by_number(number: usize) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.number == number)
}
