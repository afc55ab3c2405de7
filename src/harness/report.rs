//! JSON summary of a run, written next to the databases for later diffing.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::harness::suite::{ScenarioResult, SuiteReport};
use crate::harness::HarnessConfig;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub loaded_database: String,
    pub sorted_database: String,
    pub load_options: String,
    pub all_passed: bool,
    pub exit_code: u8,
    pub scenarios: Vec<ScenarioResult>,
}

impl RunReport {
    #[must_use]
    pub fn new(config: &HarnessConfig, suite: &SuiteReport) -> Self {
        Self {
            generated_at: Utc::now(),
            loaded_database: config.loaded.display().to_string(),
            sorted_database: config.sorted.display().to_string(),
            load_options: config.load_options.clone(),
            all_passed: suite.all_passed(),
            exit_code: suite.exit_code(),
            scenarios: suite.scenarios.clone(),
        }
    }

    /// Write the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }
}
