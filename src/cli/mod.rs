//! # CLI Support
//!
//! Runs the scenario tables from the command line for CI pipelines.
//!
//! - `probeman run --suite all --env staging`
//! - Exit codes and report file output
//! - Text or JSON output

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::scenario::{Endpoint, tables};
use crate::testing::{self, RunMode, RunReport};

/// probeman: contract tests for the notes service API
#[derive(Debug, Parser)]
#[command(name = "probeman", version, about)]
pub struct Cli {
    /// Path to a TOML config file; defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run scenario tables against the service
    Run(RunArgs),
    /// Print the scenario tables without sending anything
    List {
        #[arg(long, value_enum, default_value_t = Suite::All)]
        suite: Suite,
    },
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Which endpoint's scenarios to run
    #[arg(long, value_enum, default_value_t = Suite::All)]
    pub suite: Suite,

    /// Named environment from the config file
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Run scenarios one after another or concurrently
    #[arg(long, value_enum, default_value_t = ModeArg::Serial)]
    pub mode: ModeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    All,
    SendCode,
    Login,
    NoteDetail,
}

impl Suite {
    pub fn endpoints(self) -> Vec<Endpoint> {
        match self {
            Suite::All => Endpoint::ALL.to_vec(),
            Suite::SendCode => vec![Endpoint::SendCode],
            Suite::Login => vec![Endpoint::Login],
            Suite::NoteDetail => vec![Endpoint::NoteDetail],
        }
    }
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Serial,
    Parallel,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Serial => RunMode::Serial,
            ModeArg::Parallel => RunMode::Parallel,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(HarnessError),

    #[error("{failed} scenario(s) failed, {aborted} aborted")]
    Failures { failed: usize, aborted: usize },

    #[error("json output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 0    | All scenarios passed             |
    /// | 1    | Scenario failures or aborts      |
    /// | 2    | Configuration error              |
    /// | 10   | IO error                         |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Failures { .. } | Self::Json(_) => 1,
            Self::Config(_) => 2,
            Self::Io(_) => 10,
        }
    }
}

pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

pub async fn execute(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List { suite } => {
            print!("{}", render_tables(suite));
            Ok(())
        }
        Command::Run(args) => run(cli.config, args).await,
    }
}

async fn run(config_path: Option<PathBuf>, args: RunArgs) -> Result<(), CliError> {
    let config = HarnessConfig::load(config_path.as_deref(), args.env.as_deref())
        .map_err(CliError::Config)?;
    info!(
        base_url = %config.base_url,
        suite = ?args.suite,
        mode = ?args.mode,
        "starting run"
    );

    let scenarios = tables::select(&args.suite.endpoints());
    let report = testing::run_scenarios(Arc::new(config), &scenarios, args.mode.into()).await;

    write_output(&report, args.format, args.report.as_ref())?;

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::Failures {
            failed: report.failed,
            aborted: report.aborted,
        })
    }
}

fn write_output(
    report: &RunReport,
    format: OutputFormat,
    report_path: Option<&PathBuf>,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }

    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

pub fn render_tables(suite: Suite) -> String {
    let mut out = String::new();
    for endpoint in suite.endpoints() {
        out.push_str(&format!("{endpoint}\n"));
        for scenario in tables::scenarios(endpoint) {
            let expect = if scenario.expect_success { "success" } else { "failure" };
            let fragment = scenario.expect_fragment.unwrap_or("-");
            out.push_str(&format!(
                "  {:<34} {:<42} {expect:<8} {fragment}\n",
                scenario.label,
                scenario.input.describe()
            ));
        }
    }
    out
}
