//! # samline-harness
//!
//! A regression harness for secondary alignments that have no primary
//! alignment to belong to.
//!
//! The harness builds small synthetic alignment batches in memory, loads each
//! one with `bam-load`, re-sorts the resulting database with `sra-sort`, and
//! dumps both databases with `vdb-dump` so they can be compared side by side.
//! The tools themselves are opaque: they are only reached through their
//! command line.
//!
//! ## Features
//!
//! - **Record builders**: primary, secondary (optionally linked to a parent) and unaligned records
//! - **Batch writing**: SAM batches with a noodles-built header plus the loader's alias config
//! - **Reference bases**: read bases from a FASTA reference or a deterministic synthetic sequence
//! - **Short-circuit runs**: scenarios run in order and stop at the first load or sort failure
//!
//! ## Example
//!
//! ```rust,no_run
//! use samline_harness::core::alignment::{make_primary, make_secondary};
//! use samline_harness::core::flags::Flags;
//! use samline_harness::harness::runner::Runner;
//! use samline_harness::harness::HarnessConfig;
//! use samline_harness::toolchain::process::{ProcessToolchain, ToolPaths};
//! use samline_harness::core::bases::SyntheticBases;
//!
//! let a1 = make_primary("A1", Flags::empty(), "NC_011752.1", "c1", 17000, 20, "60M");
//! let a2 = make_secondary("A2", Flags::empty(), "NC_011752.1", "c1", 19000, 20, "60M", Some(&a1));
//!
//! let toolchain = ProcessToolchain::new(ToolPaths::default(), "batch", Box::new(SyntheticBases));
//! let mut runner = Runner::new(toolchain, HarnessConfig::default(), std::io::stdout());
//! let passed = runner.run_and_compare(&[a1, a2], true).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: alignment records, flags, CIGAR arithmetic and base sources
//! - [`io`]: FASTA reference loading and SAM batch writing
//! - [`toolchain`]: the external tool seam and its process-backed implementation
//! - [`harness`]: scenarios, the runner and the suite
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod harness;
pub mod io;
pub mod toolchain;

// Re-export commonly used types for convenience
pub use crate::core::alignment::{
    make_mate, make_primary, make_secondary, make_unaligned, Alignment, AlignmentKind,
};
pub use crate::core::flags::Flags;
pub use crate::harness::runner::{Outcome, Runner};
pub use crate::harness::suite::{run_all, SuiteReport};
pub use crate::harness::HarnessConfig;
pub use crate::toolchain::{Tool, ToolError, Toolchain};
