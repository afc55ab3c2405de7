//! The external tools a scenario drives.
//!
//! The harness only sees these through the [`Toolchain`] trait: the loader
//! turns a record list into a database, the sorter reorganizes a database
//! into a new one, and the dumper prints a database as text.
//! [`process::ProcessToolchain`] runs the real executables.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::alignment::Alignment;

pub mod process;

/// One of the three external tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Loader,
    Sorter,
    Dumper,
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loader => write!(f, "bam-load"),
            Self::Sorter => write!(f, "sra-sort"),
            Self::Dumper => write!(f, "vdb-dump"),
        }
    }
}

/// Why a tool invocation did not succeed.
///
/// Every variant counts as the same kind of failure: nothing distinguishes
/// transient from permanent problems.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },

    /// `output` is whatever the tool wrote to the captured stdout before it
    /// exited; empty when stdout was not captured.
    #[error("{tool} did not succeed (exit code {})", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed {
        tool: Tool,
        code: Option<i32>,
        output: String,
    },

    #[error("failed to write the load batch: {0}")]
    Batch(#[from] std::io::Error),

    #[error("failed to remove existing database {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    /// Text a failed tool printed before it exited, if any.
    #[must_use]
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } if !output.is_empty() => Some(output.as_str()),
            _ => None,
        }
    }
}

/// Command-line contract of the loader, sorter and dumper
pub trait Toolchain {
    /// Load `records` into a new database at `output`.
    ///
    /// # Errors
    ///
    /// Any [`ToolError`] means the load failed.
    fn load(&mut self, records: &[Alignment], output: &Path, options: &str)
        -> Result<(), ToolError>;

    /// Reorganize the database at `input` into a new database at `output`.
    ///
    /// # Errors
    ///
    /// Any [`ToolError`] means the sort failed.
    fn sort(&mut self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Dump the database at `database` as text.
    ///
    /// # Errors
    ///
    /// Any [`ToolError`] means the dump failed. A dumper that printed part of
    /// the database before failing reports that text through
    /// [`ToolError::partial_output`].
    fn dump(&mut self, database: &Path, options: &str) -> Result<String, ToolError>;
}

impl<T: Toolchain + ?Sized> Toolchain for &mut T {
    fn load(
        &mut self,
        records: &[Alignment],
        output: &Path,
        options: &str,
    ) -> Result<(), ToolError> {
        (**self).load(records, output, options)
    }

    fn sort(&mut self, input: &Path, output: &Path) -> Result<(), ToolError> {
        (**self).sort(input, output)
    }

    fn dump(&mut self, database: &Path, options: &str) -> Result<String, ToolError> {
        (**self).dump(database, options)
    }
}
