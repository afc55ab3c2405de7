//! Command-line interface for samline-harness.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: load, sort and dump every scenario, stopping at the first failure
//! - **emit**: write one scenario's SAM batch and alias config without running any tool
//! - **list**: show the scenarios
//!
//! ## Usage
//!
//! ```text
//! # Run all scenarios with the tools on PATH
//! samline-harness run
//!
//! # Use specific builds and a local reference
//! samline-harness run --bam-load ./bin/bam-load --reference NC_011752.1.fa
//!
//! # Inspect what scenario 3 hands to the loader
//! samline-harness emit 3 --output batch3
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::core::bases::{BaseSource, SyntheticBases};
use crate::io::fasta::{is_fasta_file, ReferenceBases};

pub mod emit;
pub mod list;
pub mod run;

#[derive(Parser)]
#[command(name = "samline-harness")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Check how bam-load, sra-sort and vdb-dump handle secondary alignments without a primary")]
#[command(
    long_about = "samline-harness builds small synthetic alignment batches, loads them with bam-load, re-sorts the result with sra-sort and dumps both databases with vdb-dump.\n\nScenarios run in order and stop at the first load or sort failure. The exit status is 0 when every scenario passed and 3 otherwise; the dumped text is meant for manual comparison."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all scenarios through the external tools
    Run(run::RunArgs),

    /// Write a scenario's load batch without running any tool
    Emit(emit::EmitArgs),

    /// List the scenarios
    List(list::ListArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Bases from `reference` when given, synthetic bases otherwise.
pub(crate) fn open_base_source(reference: Option<&Path>) -> anyhow::Result<Box<dyn BaseSource>> {
    match reference {
        Some(path) => {
            if !is_fasta_file(path) {
                warn!(path = %path.display(), "Reference does not have a FASTA extension");
            }
            Ok(Box::new(ReferenceBases::from_path(path)?))
        }
        None => Ok(Box::new(SyntheticBases)),
    }
}
