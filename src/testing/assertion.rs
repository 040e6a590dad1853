//! One check per contract clause. Each returns a [`StepResult`] carrying the
//! expected and actual values so reports show exactly what broke.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EXPECTED_STATUS: u16 = 200;

pub const STEP_STATUS: &str = "http status";
pub const STEP_SUCCESS: &str = "success flag";
pub const STEP_MESSAGE: &str = "message";
pub const STEP_IDENTITY: &str = "identity";

/// Rendering of a field missing from the body.
pub const ABSENT: &str = "<absent>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub label: String,
    pub status: StepStatus,
    pub expected: String,
    pub actual: String,
}

impl StepResult {
    fn new(label: &str, passed: bool, expected: String, actual: String) -> Self {
        Self {
            label: label.to_owned(),
            status: if passed {
                StepStatus::Passed
            } else {
                StepStatus::Failed
            },
            expected,
            actual,
        }
    }

    pub fn failed(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

/// HTTP status must be exactly 200.
pub fn check_status(actual: u16) -> StepResult {
    StepResult::new(
        STEP_STATUS,
        actual == EXPECTED_STATUS,
        EXPECTED_STATUS.to_string(),
        actual.to_string(),
    )
}

/// The `success` field must be the boolean `expected`.
///
/// An absent field, a `null` or a non-boolean value never passes. The actual
/// value is rendered verbatim (`<absent>` when missing), so an absent flag
/// stays distinguishable from an explicit `false` in the report.
pub fn check_success_flag(actual: Option<&Value>, expected: bool) -> StepResult {
    let passed = matches!(actual, Some(Value::Bool(flag)) if *flag == expected);
    StepResult::new(STEP_SUCCESS, passed, expected.to_string(), render(actual))
}

/// `expected` must be a substring of `actual`. `None` skips the step.
pub fn check_fragment(field: &str, actual: &str, expected: Option<&str>) -> StepResult {
    let label = format!("{STEP_MESSAGE} ({field})");
    match expected {
        None => StepResult {
            label,
            status: StepStatus::Skipped,
            expected: String::new(),
            actual: actual.to_owned(),
        },
        Some(fragment) => StepResult::new(
            &label,
            actual.contains(fragment),
            format!("contains {fragment:?}"),
            format!("{actual:?}"),
        ),
    }
}

/// The returned entity id must equal the requested one, type included.
pub fn check_identity(actual: Option<&Value>, expected: &Value) -> StepResult {
    StepResult::new(
        STEP_IDENTITY,
        actual == Some(expected),
        expected.to_string(),
        render(actual),
    )
}

fn render(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_else(|| ABSENT.to_owned())
}
