use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::assertion::{StepResult, StepStatus};
use crate::scenario::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Passed,
    /// At least one contract clause was violated.
    Failed,
    /// A setup step (session or login fixture) failed; no request was sent.
    Aborted,
}

/// Result of running one scenario row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub endpoint: Endpoint,
    pub label: String,
    pub input: String,
    pub outcome: ScenarioOutcome,
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    pub duration_ms: u64,
}

impl ScenarioReport {
    pub fn step(&self, label: &str) -> Option<&StepResult> {
        self.steps.iter().find(|step| step.label.starts_with(label))
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|step| step.failed())
    }

    pub fn passed(&self) -> bool {
        self.outcome == ScenarioOutcome::Passed
    }
}

/// Summary report for a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub aborted: usize,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn new(scenarios: Vec<ScenarioReport>, duration_ms: u64) -> Self {
        let count = |outcome| scenarios.iter().filter(|s| s.outcome == outcome).count();
        Self {
            total: scenarios.len(),
            passed: count(ScenarioOutcome::Passed),
            failed: count(ScenarioOutcome::Failed),
            aborted: count(ScenarioOutcome::Aborted),
            duration_ms,
            scenarios,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.aborted == 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for scenario in &self.scenarios {
            let mark = match scenario.outcome {
                ScenarioOutcome::Passed => "PASS",
                ScenarioOutcome::Failed => "FAIL",
                ScenarioOutcome::Aborted => "ABORT",
            };
            let _ = writeln!(
                out,
                "[{mark}] {}: {} ({}, {} ms)",
                scenario.endpoint, scenario.label, scenario.input, scenario.duration_ms
            );

            if let Some(reason) = &scenario.abort_reason {
                let _ = writeln!(out, "    setup: {reason}");
            }
            for step in &scenario.steps {
                if step.status == StepStatus::Failed {
                    let _ = writeln!(
                        out,
                        "    {}: expected {}, actual {}",
                        step.label, step.expected, step.actual
                    );
                }
            }
        }

        let _ = writeln!(
            out,
            "\n{} scenarios: {} passed, {} failed, {} aborted ({} ms)",
            self.total, self.passed, self.failed, self.aborted, self.duration_ms
        );
        out
    }
}
