//! Command-line arguments and logging setup.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "jobs-admin.log";

/// Environment variable overriding the log file location.
pub const LOG_FILE_ENV: &str = "JOBS_ADMIN_LOG_FILE";

/// Jobs-Admin: failed job inspector
#[derive(Parser, Debug, Clone)]
#[command(name = "jobs-admin")]
#[command(author, version, about = "TUI panel for inspecting failed jobs", long_about = None)]
pub struct Args {
    /// JSON export of failed jobs
    #[arg(short, long, required_unless_present = "demo", conflicts_with = "demo")]
    pub file: Option<PathBuf>,

    /// Run with built-in sample jobs (no export required)
    #[arg(long)]
    pub demo: bool,

    /// Log file (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Fixed refresh interval for relative times, in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

impl Args {
    /// Tick cadence override, if one was given. Zero means "use the default".
    pub fn tick_override(&self) -> Option<Duration> {
        self.tick_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Where log lines are written
    pub file: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_level: String,
}

impl LogConfig {
    /// Resolve from arguments and environment.
    ///
    /// # Environment Variables
    ///
    /// - `JOBS_ADMIN_LOG_FILE`: Log file when `--log-file` is absent
    /// - `RUST_LOG`: Filter directives (default: info)
    pub fn from_args(args: &Args) -> Self {
        Self::resolve(args.log_file.clone(), std::env::var(LOG_FILE_ENV).ok())
    }

    fn resolve(cli: Option<PathBuf>, env: Option<String>) -> Self {
        let file = cli
            .or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            file,
            default_level: "info".to_string(),
        }
    }
}

/// Install the global tracing subscriber, writing to the log file.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let file = open_log_file(&config.file)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    tracing::debug!(log_file = %config.file.display(), "Logging initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
