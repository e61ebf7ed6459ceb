// ABOUTME: Command-line entry point for submitting and tracking a database copy job
// ABOUTME: Logs to stderr and prints the final result as JSON on stdout

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use db_copy_client::copy::CopyJob;
use db_copy_client::sink::{
    JsonResultSink, LogProgressSink, MultiResultSink, ProgressBarSink, ProgressSink,
    SqliteResultSink,
};
use db_copy_client::{ConfigFile, CopyJobConfig, HttpTransport};

#[derive(Parser, Debug)]
#[command(name = "db-copy-client", version, about = "Submit a database copy job and wait for it to finish")]
struct Cli {
    /// TOML file with job settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    source_db_uri: Option<String>,

    #[arg(long)]
    target_db_uri: Option<String>,

    /// Identity the copy is submitted as
    #[arg(long)]
    user: Option<String>,

    /// Copy service submission endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// HTTP method for the submission request
    #[arg(long)]
    method: Option<String>,

    /// Extra request header, repeatable
    #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Raw JSON payload used when the URIs cannot be decomposed
    #[arg(long)]
    payload: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    endpoint_timeout: Option<f64>,

    /// Seconds between status checks
    #[arg(long)]
    poll_interval: Option<f64>,

    /// Also record the result in this SQLite database
    #[arg(long)]
    results_db: Option<PathBuf>,

    /// Log progress instead of drawing a progress bar
    #[arg(long)]
    no_progress_bar: bool,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty header name in {:?}", raw));
    }
    Ok((key.trim().to_string(), value.trim().to_string()))
}

impl Cli {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            source_db_uri: self.source_db_uri.clone(),
            target_db_uri: self.target_db_uri.clone(),
            user: self.user.clone(),
            method: self.method.clone(),
            endpoint: self.endpoint.clone(),
            headers: (!self.headers.is_empty())
                .then(|| self.headers.iter().cloned().collect::<BTreeMap<_, _>>()),
            payload: self.payload.clone(),
            endpoint_timeout: self.endpoint_timeout,
            poll_interval: self.poll_interval,
        }
    }

    fn job_config(&self) -> Result<CopyJobConfig> {
        let base = match &self.config {
            Some(path) => ConfigFile::from_path(path)?,
            None => ConfigFile::default(),
        };
        CopyJobConfig::try_from(base.merge(self.overrides())).context("Invalid copy job configuration")
    }
}

/// The SQLite sink goes first so nothing reaches `out` unless the insert succeeded.
fn result_sinks<W: Write + Send + 'static>(
    results_db: Option<&Path>,
    out: W,
) -> Result<MultiResultSink> {
    let mut results = MultiResultSink::new();
    if let Some(path) = results_db {
        results.push(
            SqliteResultSink::open(path)
                .with_context(|| format!("Failed to open results database {}", path.display()))?,
        );
    }
    results.push(JsonResultSink::new(out));
    Ok(results)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.job_config()?;
    let transport = HttpTransport::new(config.clone()).context("Failed to create HTTP client")?;

    let results = result_sinks(cli.results_db.as_deref(), std::io::stdout())?;

    let bar = (!cli.no_progress_bar).then(ProgressBarSink::new);
    let progress: &dyn ProgressSink = match &bar {
        Some(bar) => bar,
        None => &LogProgressSink,
    };

    let outcome = CopyJob::new(&config, &transport, progress, &results).run().await;
    if let Some(bar) = &bar {
        bar.finish();
    }

    outcome.with_context(|| format!("Copy job against {} did not succeed", config.endpoint))?;
    Ok(())
}
