//! Scenario orchestration.
//!
//! - [`scenarios`]: the three record batches and what they exercise
//! - [`runner`]: load, sort and dump one batch
//! - [`suite`]: run the scenarios in order, stopping at the first failure
//! - [`report`]: JSON summary of a run

use std::path::PathBuf;

pub mod report;
pub mod runner;
pub mod scenarios;
pub mod suite;

/// Database written by the loader
pub const LOADED_DATABASE: &str = "AFTER_BAM_LOAD.CSRA";

/// Database written by the sorter
pub const SORTED_DATABASE: &str = "AFTER_SRA_SORT.CSRA";

/// Loader options: build spots from secondary alignments, log level 3, and
/// both error and mapping-quality thresholds at 0.
pub const LOAD_OPTIONS: &str = "--make-spots-with-secondary -L 3 -E0 -Q0";

/// Settings shared by every scenario of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Loader output. Reused, and overwritten, by every scenario.
    pub loaded: PathBuf,

    /// Sorter output. Reused, and overwritten, by every scenario.
    pub sorted: PathBuf,

    pub load_options: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            loaded: PathBuf::from(LOADED_DATABASE),
            sorted: PathBuf::from(SORTED_DATABASE),
            load_options: LOAD_OPTIONS.to_string(),
        }
    }
}
