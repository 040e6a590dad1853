use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{Instrument, info, info_span, warn};

use super::RunMode;
use super::assertion::{self, StepResult, StepStatus};
use super::report::{RunReport, ScenarioOutcome, ScenarioReport};
use crate::auth::{self, Token};
use crate::config::HarnessConfig;
use crate::http::{ApiRequest, Session};
use crate::scenario::Scenario;

/// Run one scenario row in its own session.
///
/// Setup order: session, then the login fixture when the endpoint needs a
/// token. A setup failure aborts the row before its request is sent.
pub async fn run_scenario(config: &HarnessConfig, scenario: &Scenario) -> ScenarioReport {
    let span = info_span!(
        "scenario",
        endpoint = %scenario.endpoint(),
        label = scenario.label,
    );
    execute(config, scenario).instrument(span).await
}

async fn execute(config: &HarnessConfig, scenario: &Scenario) -> ScenarioReport {
    let started = Instant::now();
    let endpoint = scenario.endpoint();
    let mut report = ScenarioReport {
        endpoint,
        label: scenario.label.to_owned(),
        input: scenario.input.describe(),
        outcome: ScenarioOutcome::Passed,
        steps: Vec::new(),
        abort_reason: None,
        response_body: None,
        duration_ms: 0,
    };

    let session = match Session::open(config) {
        Ok(session) => session,
        Err(err) => {
            return abort(report, format!("session could not be opened: {err}"), started);
        }
    };

    let token = if endpoint.requires_token() {
        match auth::login_token(&session, config).await {
            Ok(token) => Some(token),
            Err(err) => return abort(report, format!("login fixture failed: {err}"), started),
        }
    } else {
        None
    };

    let request = build_request(config, scenario, token.as_ref());
    info!(url = %request.url, input = %report.input, "sending request");

    let response = match session.post_json(&request).await {
        Ok(response) => response,
        Err(err) => {
            record(
                &mut report,
                StepResult {
                    label: assertion::STEP_STATUS.to_owned(),
                    status: StepStatus::Failed,
                    expected: assertion::EXPECTED_STATUS.to_string(),
                    actual: format!("no response: {err}"),
                },
            );
            return finish(report, started);
        }
    };
    report.response_body = Some(response.raw.clone());

    let status = assertion::check_status(response.status);
    let status_failed = status.failed();
    record(&mut report, status);
    if status_failed {
        return finish(report, started);
    }

    record(
        &mut report,
        assertion::check_success_flag(response.field("success"), scenario.expect_success),
    );

    let field = endpoint.message_field();
    record(
        &mut report,
        assertion::check_fragment(field, &response.text_field(field), scenario.expect_fragment),
    );

    if scenario.expect_success {
        if let Some(expected) = scenario.input.identity() {
            record(
                &mut report,
                assertion::check_identity(response.data_field("id"), &expected),
            );
        }
    }

    finish(report, started)
}

fn build_request(config: &HarnessConfig, scenario: &Scenario, token: Option<&Token>) -> ApiRequest {
    let mut request = ApiRequest::new(
        config.endpoint_url(scenario.endpoint()),
        scenario.input.body(),
    );

    if let (Some(selector), Some(token)) = (scenario.input.token_selector(), token) {
        request = request.header("Authorization", selector.authorization(token));
    }

    request
}

fn record(report: &mut ScenarioReport, step: StepResult) {
    match step.status {
        StepStatus::Failed => warn!(
            step = %step.label,
            expected = %step.expected,
            actual = %step.actual,
            "step failed"
        ),
        StepStatus::Passed | StepStatus::Skipped => info!(
            step = %step.label,
            status = ?step.status,
            "step"
        ),
    }
    if step.failed() {
        report.outcome = ScenarioOutcome::Failed;
    }
    report.steps.push(step);
}

fn abort(mut report: ScenarioReport, reason: String, started: Instant) -> ScenarioReport {
    warn!(reason = %reason, "scenario aborted");
    report.outcome = ScenarioOutcome::Aborted;
    report.abort_reason = Some(reason);
    report.duration_ms = started.elapsed().as_millis() as u64;
    report
}

fn finish(mut report: ScenarioReport, started: Instant) -> ScenarioReport {
    report.duration_ms = started.elapsed().as_millis() as u64;
    info!(outcome = ?report.outcome, elapsed_ms = report.duration_ms, "scenario finished");
    report
}

/// Run every scenario independently and collect the reports in input order.
pub async fn run_scenarios(
    config: Arc<HarnessConfig>,
    scenarios: &[Scenario],
    mode: RunMode,
) -> RunReport {
    let started = Instant::now();

    let reports = match mode {
        RunMode::Serial => {
            let mut reports = Vec::with_capacity(scenarios.len());
            for scenario in scenarios {
                reports.push(run_scenario(&config, scenario).await);
            }
            reports
        }
        RunMode::Parallel => {
            let mut tasks = JoinSet::new();
            for (idx, scenario) in scenarios.iter().copied().enumerate() {
                let config = Arc::clone(&config);
                tasks.spawn(async move { (idx, run_scenario(&config, &scenario).await) });
            }

            let mut indexed = Vec::with_capacity(scenarios.len());
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(entry) => indexed.push(entry),
                    Err(err) => warn!(error = %err, "scenario task did not complete"),
                }
            }
            indexed.sort_by_key(|(idx, _)| *idx);
            indexed.into_iter().map(|(_, report)| report).collect()
        }
    };

    let report = RunReport::new(reports, started.elapsed().as_millis() as u64);
    info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        aborted = report.aborted,
        "run finished"
    );
    report
}
