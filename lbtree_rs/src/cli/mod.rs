//! Command-line interface.
//!
//! - [`Args`] - flags as parsed by clap
//! - [`Settings`] - flags merged with the config file
//! - [`entrypoint`] - the shared `main()` body

pub mod entrypoint;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::LbtreeConfig;
use crate::types::{ColorMode, DisplayMode};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug, Default)]
#[command(name = "lbtree")]
#[command(about = "Display a tree view of OpenStack loadbalancers, pools, and members")]
#[command(version)]
pub struct Args {
    /// Cloud name from clouds.yaml (default: OS_CLOUD, then OS_* environment variables)
    #[arg(long, env = "OS_CLOUD")]
    pub cloud: Option<String>,

    /// Filter by specific project ID (optional)
    #[arg(long = "project-id", value_name = "ID")]
    pub project_id: Option<String>,

    /// Filter mode: only show problematic members (not ACTIVE/ONLINE) and pools with no members
    #[arg(long)]
    pub filter: bool,

    /// Collapse mode: only show pool names without querying or displaying members (faster)
    #[arg(long)]
    pub collapse: bool,

    /// Print the first 8 characters of resource IDs
    #[arg(long)]
    pub short_ids: bool,

    /// When to use colors
    #[arg(long, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Per-request timeout in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Config file (default: <config dir>/lbtree/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Effective options for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub cloud: Option<String>,
    pub project_id: Option<String>,
    pub mode: DisplayMode,
    pub color: ColorMode,
    pub timeout: Duration,
    pub short_ids: bool,
}

impl Settings {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(args: &Args, config: &LbtreeConfig) -> Self {
        Self {
            cloud: args.cloud.clone().or_else(|| config.cloud.clone()),
            project_id: args.project_id.clone(),
            mode: DisplayMode::from_flags(args.filter, args.collapse),
            color: args.color.or(config.color).unwrap_or_default(),
            timeout: Duration::from_secs(
                args.timeout
                    .or(config.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS)
                    .max(1),
            ),
            short_ids: args.short_ids || config.short_ids.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lbtree").chain(argv.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn all_flag_combinations_parse() {
        let cases = [
            (vec![], DisplayMode::Normal),
            (vec!["--filter"], DisplayMode::Filter),
            (vec!["--collapse"], DisplayMode::Collapse),
            (vec!["--filter", "--collapse"], DisplayMode::FilterCollapse),
        ];
        for (argv, mode) in cases {
            let args = parse(&argv);
            let settings = Settings::resolve(&args, &LbtreeConfig::default());
            assert_eq!(settings.mode, mode, "{argv:?}");
        }
    }

    #[test]
    fn flags_override_config() {
        let config = LbtreeConfig {
            cloud: Some("from-config".into()),
            color: Some(ColorMode::Always),
            timeout_secs: Some(5),
            short_ids: Some(true),
        };
        let args = parse(&[
            "--cloud",
            "from-flag",
            "--color",
            "never",
            "--timeout",
            "12",
            "--project-id",
            "abc",
        ]);
        let settings = Settings::resolve(&args, &config);
        assert_eq!(settings.cloud.as_deref(), Some("from-flag"));
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.timeout, Duration::from_secs(12));
        assert_eq!(settings.project_id.as_deref(), Some("abc"));
        assert!(settings.short_ids);
    }

    #[test]
    fn config_fills_missing_flags() {
        let config = LbtreeConfig {
            cloud: Some("prod".into()),
            color: None,
            timeout_secs: Some(0),
            short_ids: None,
        };
        let settings = Settings::resolve(&Args::default(), &config);
        assert_eq!(settings.cloud.as_deref(), Some("prod"));
        assert_eq!(settings.color, ColorMode::Auto);
        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert!(!settings.short_ids);
    }

    #[test]
    fn rejects_unknown_color() {
        assert!(Args::try_parse_from(["lbtree", "--color", "sometimes"]).is_err());
    }
}
