//! Shared `main()` body for the `lbtree` binary.

use std::io::{self, ErrorKind};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use super::{Args, Settings};
use crate::cloud::{CloudProfile, OctaviaClient};
use crate::colors::Painter;
use crate::config::LbtreeConfig;
use crate::progress::Spinner;
use crate::render::Renderer;
use crate::report::{self, ReportError, ReportRequest};

const CREDENTIALS_HINT: &str = "Error connecting to OpenStack. Make sure you have OpenStack \
credentials set in environment variables or configured in clouds.yaml";

/// Logs go to stderr; stdout carries only the tree.
fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.parse().unwrap_or_default()),
        )
        .try_init();
}

fn execute(settings: &Settings) -> Result<()> {
    let profile =
        CloudProfile::resolve(settings.cloud.as_deref()).context(CREDENTIALS_HINT)?;
    info!(
        cloud = %profile.name,
        region = profile.region_name.as_deref().unwrap_or("-"),
        "using cloud profile"
    );

    let spinner = Spinner::new("Authenticating");
    let client = OctaviaClient::connect(&profile, settings.timeout)
        .context("Error connecting to OpenStack")?;
    debug!(endpoint = client.endpoint(), "connected");
    spinner.set_message("Listing load balancers");

    let request = ReportRequest {
        project_id: settings.project_id.clone(),
        mode: settings.mode,
    };
    let renderer = Renderer::new(Painter::new(settings.color), settings.short_ids);

    // Buffer the report so the spinner is gone before anything hits stdout.
    let mut buf = Vec::new();
    let result = report::generate(&client, &request, &renderer, &spinner, &mut buf);
    spinner.finish_clear();
    result?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match io::Write::write_all(&mut out, &buf).and_then(|()| io::Write::flush(&mut out)) {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other.map_err(ReportError::Output).map_err(Into::into),
    }
}

/// Parse arguments, run one report and map the outcome to an exit code.
pub fn run() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match &args.config {
        Some(path) => LbtreeConfig::load_from_path(path),
        None => LbtreeConfig::load(),
    };
    let settings = Settings::resolve(&args, &config);
    debug!(?settings, "resolved settings");

    match execute(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
