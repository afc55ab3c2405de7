//! Running every scenario in order.

use std::io::{self, Write};

use serde::Serialize;
use tracing::warn;

use crate::harness::runner::{Outcome, Runner};
use crate::harness::scenarios::Scenario;
use crate::toolchain::Toolchain;

/// Process exit status when every scenario passed
pub const EXIT_ALL_PASSED: u8 = 0;

/// Process exit status when any scenario failed
pub const EXIT_SCENARIO_FAILED: u8 = 3;

/// Final state of one scenario in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    LoadFailed,
    SortFailed,
    /// Not run because an earlier scenario failed
    Skipped,
}

impl From<Outcome> for ScenarioStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Passed => Self::Passed,
            Outcome::LoadFailed => Self::LoadFailed,
            Outcome::SortFailed => Self::SortFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    pub number: usize,
    pub title: String,
    pub status: ScenarioStatus,
}

/// Results of a run, one entry per scenario given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioResult>,
}

impl SuiteReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios
            .iter()
            .all(|s| s.status == ScenarioStatus::Passed)
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            EXIT_ALL_PASSED
        } else {
            EXIT_SCENARIO_FAILED
        }
    }
}

/// Run `scenarios` in order. Once one fails, the rest are skipped.
///
/// # Errors
///
/// Returns an error only if writing to the runner's output fails.
pub fn run_all<T: Toolchain, W: Write>(
    runner: &mut Runner<T, W>,
    scenarios: &[Scenario],
) -> io::Result<SuiteReport> {
    let mut report = SuiteReport::default();
    let mut failed = false;

    for scenario in scenarios {
        let status = if failed {
            ScenarioStatus::Skipped
        } else {
            let outcome = runner.run_scenario(scenario)?;
            if !outcome.is_passed() {
                warn!(
                    scenario = scenario.number,
                    "Scenario failed, skipping the remaining scenarios"
                );
                failed = true;
            }
            outcome.into()
        };

        report.scenarios.push(ScenarioResult {
            number: scenario.number,
            title: scenario.title(),
            status,
        });
    }

    Ok(report)
}
