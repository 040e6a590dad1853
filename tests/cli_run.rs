//! `probeman run` end to end: config file, suites, report file, exit codes.

mod support;

use std::fs;

use clap::Parser;
use probeman::cli::{self, Cli, CliError};
use probeman::config::DEFAULT_SEND_CODE_PATH;
use serde_json::{Value, json};
use support::{mount_fixed, start_notes_service};
use wiremock::MockServer;

fn write_config(dir: &tempfile::TempDir, base_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("probeman.toml");
    fs::write(
        &path,
        format!(
            "base_url = \"{{{{host}}}}\"\n\n[variables]\nhost = \"http://127.0.0.1:1\"\n\n[environments.mock]\nhost = \"{base_url}\"\n"
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn run_all_suites_writes_report() {
    let server = start_notes_service().await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());
    let report_path = dir.path().join("report.json");

    let cli = Cli::try_parse_from([
        "probeman",
        "--config",
        config.to_str().unwrap(),
        "run",
        "--env",
        "mock",
        "--report",
        report_path.to_str().unwrap(),
        "--mode",
        "parallel",
    ])
    .unwrap();

    cli::execute(cli).await.unwrap();

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["total"], 17);
    assert_eq!(report["passed"], 17);
    assert_eq!(report["scenarios"][0]["endpoint"], "send-code");
}

#[tokio::test]
async fn failing_suite_exits_with_code_1() {
    let server = MockServer::start().await;
    mount_fixed(&server, DEFAULT_SEND_CODE_PATH, 200, json!({ "success": true })).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());

    let cli = Cli::try_parse_from([
        "probeman",
        "--config",
        config.to_str().unwrap(),
        "run",
        "--suite",
        "send-code",
        "--env",
        "mock",
    ])
    .unwrap();

    let err = cli::execute(cli).await.unwrap_err();
    assert!(matches!(err, CliError::Failures { failed: 5, aborted: 0 }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn unknown_environment_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:1");

    let cli = Cli::try_parse_from([
        "probeman",
        "--config",
        config.to_str().unwrap(),
        "run",
        "--env",
        "prod",
    ])
    .unwrap();

    let err = cli::execute(cli).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
