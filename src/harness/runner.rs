//! Load, sort and dump one batch.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::alignment::Alignment;
use crate::harness::scenarios::Scenario;
use crate::harness::HarnessConfig;
use crate::toolchain::{Tool, Toolchain};

/// A labeled dumper invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpSection {
    pub label: &'static str,
    pub options: &'static str,
}

/// Spots and their reads
pub const SEQUENCE_DUMP: DumpSection = DumpSection {
    label: "SEQ",
    options: "-C SPOT_ID,READ -l0 -f tab",
};

/// Primary alignments
pub const PRIMARY_DUMP: DumpSection = DumpSection {
    label: "PRIM",
    options: "-T PRIM -C ALIGN_ID,READ -l0 -f tab",
};

/// Secondary alignments
pub const SECONDARY_DUMP: DumpSection = DumpSection {
    label: "SEC",
    options: "-T SEC -C ALIGN_ID,READ -l0 -f tab",
};

/// Sections dumped for each database
#[must_use]
pub fn dump_sections(with_secondary: bool) -> &'static [DumpSection] {
    static WITH_SECONDARY: [DumpSection; 3] = [SEQUENCE_DUMP, PRIMARY_DUMP, SECONDARY_DUMP];
    if with_secondary {
        &WITH_SECONDARY
    } else {
        &WITH_SECONDARY[..2]
    }
}

/// How far a batch got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    LoadFailed,
    SortFailed,
}

impl Outcome {
    #[must_use]
    pub fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Drives a [`Toolchain`] through one batch at a time, printing status lines
/// and dumps to `out`.
pub struct Runner<T, W> {
    toolchain: T,
    config: HarnessConfig,
    out: W,
}

impl<T: Toolchain, W: Write> Runner<T, W> {
    pub fn new(toolchain: T, config: HarnessConfig, out: W) -> Self {
        Self {
            toolchain,
            config,
            out,
        }
    }

    pub fn into_inner(self) -> (T, W) {
        (self.toolchain, self.out)
    }

    /// Load, sort and dump `records`; `true` only when both load and sort
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the output fails. Tool failures
    /// are reported in the output and yield `Ok(false)`.
    pub fn run_and_compare(&mut self, records: &[Alignment], with_secondary: bool) -> io::Result<bool> {
        Ok(self.load_sort_dump(records, with_secondary)?.is_passed())
    }

    /// Print the scenario banner and notes, then run its batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the output fails.
    pub fn run_scenario(&mut self, scenario: &Scenario) -> io::Result<Outcome> {
        info!(scenario = scenario.number, "Running scenario");

        writeln!(self.out, "{}", scenario.banner())?;
        for note in scenario.notes {
            writeln!(self.out, "{note}")?;
        }

        let records = scenario.records();
        let outcome = self.load_sort_dump(&records, scenario.with_secondary)?;

        info!(scenario = scenario.number, outcome = ?outcome, "Scenario finished");
        Ok(outcome)
    }

    /// Like [`Runner::run_and_compare`] but says which step failed.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the output fails.
    pub fn load_sort_dump(&mut self, records: &[Alignment], with_secondary: bool) -> io::Result<Outcome> {
        let outcome = self.load_sort(records)?;

        if outcome.is_passed() {
            let loaded = self.config.loaded.clone();
            let sorted = self.config.sorted.clone();
            self.dump(&loaded, with_secondary)?;
            self.dump(&sorted, with_secondary)?;
        }

        Ok(outcome)
    }

    fn load_sort(&mut self, records: &[Alignment]) -> io::Result<Outcome> {
        let loaded = self
            .toolchain
            .load(records, &self.config.loaded, &self.config.load_options);
        if let Err(e) = loaded {
            warn!(error = %e, "Load failed");
            self.status(Tool::Loader, false)?;
            return Ok(Outcome::LoadFailed);
        }
        self.status(Tool::Loader, true)?;

        let sorted = self.toolchain.sort(&self.config.loaded, &self.config.sorted);
        if let Err(e) = sorted {
            warn!(error = %e, "Sort failed");
            self.status(Tool::Sorter, false)?;
            return Ok(Outcome::SortFailed);
        }
        self.status(Tool::Sorter, true)?;

        Ok(Outcome::Passed)
    }

    fn status(&mut self, tool: Tool, ok: bool) -> io::Result<()> {
        writeln!(self.out, "{tool} = {}", if ok { "OK" } else { "FAILED" })?;
        self.out.flush()
    }

    /// Dump failures, crashes included, are logged and leave the outcome alone.
    /// Whatever a failing dumper printed first is still written out.
    fn dump(&mut self, database: &Path, with_secondary: bool) -> io::Result<()> {
        for section in dump_sections(with_secondary) {
            writeln!(self.out, "{}.{}", database.display(), section.label)?;
            self.out.flush()?;

            match self.toolchain.dump(database, section.options) {
                Ok(text) => self.out.write_all(text.as_bytes())?,
                Err(e) => {
                    if let Some(text) = e.partial_output() {
                        self.out.write_all(text.as_bytes())?;
                    }
                    warn!(
                        database = %database.display(),
                        section = section.label,
                        error = %e,
                        "Dump failed"
                    );
                }
            }
        }

        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_sections() {
        let labels: Vec<&str> = dump_sections(true).iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["SEQ", "PRIM", "SEC"]);

        let labels: Vec<&str> = dump_sections(false).iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["SEQ", "PRIM"]);
    }

    #[test]
    fn test_dump_options_are_unbounded_tab_output() {
        for section in dump_sections(true) {
            assert!(section.options.ends_with("-l0 -f tab"), "{}", section.label);
        }
    }

    #[test]
    fn test_outcome_is_passed() {
        assert!(Outcome::Passed.is_passed());
        assert!(!Outcome::LoadFailed.is_passed());
        assert!(!Outcome::SortFailed.is_passed());
    }
}
