//! # Testing & Assertions
//!
//! Evaluates scenario rows against the live service: one fresh session per
//! row, the login fixture where the endpoint needs it, then one labelled step
//! per contract clause.

pub mod assertion;
pub mod executor;
pub mod report;

use serde::{Deserialize, Serialize};

pub use assertion::{StepResult, StepStatus};
pub use executor::{run_scenario, run_scenarios};
pub use report::{RunReport, ScenarioOutcome, ScenarioReport};

/// Execution mode for a batch of scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// One scenario after another, in table order.
    #[default]
    Serial,
    /// Every scenario on its own task. Reports keep table order.
    Parallel,
}
