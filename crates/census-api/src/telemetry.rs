//! Tracing subscriber setup.
//!
//! Every event is written to stdout and appended to `<log_dir>/all.log`,
//! each line tagged with the source file and line that emitted it.

use std::path::Path;

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_appender::{
  non_blocking::WorkerGuard,
  rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub const LOG_FILE: &str = "all.log";

/// Create `log_dir` if needed and open `all.log` inside it for appending.
pub fn log_file(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
  std::fs::create_dir_all(log_dir)
    .with_context(|| format!("failed to create log directory {log_dir:?}"))?;

  RollingFileAppender::builder()
    .rotation(Rotation::NEVER)
    .filename_prefix(LOG_FILE)
    .build(log_dir)
    .with_context(|| format!("failed to open {LOG_FILE} in {log_dir:?}"))
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// level for both sinks.
///
/// The returned guard flushes the file writer when dropped; hold it until
/// the server has shut down.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
  let (file, guard) = tracing_appender::non_blocking(log_file(log_dir)?);

  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_file(true).with_line_number(true))
    .with(
      fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true),
    )
    .init();

  Ok(guard)
}
