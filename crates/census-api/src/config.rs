//! Runtime server configuration.
//!
//! Read from an optional TOML file layered under `CENSUS_`-prefixed
//! environment variables; nested keys use `__`, e.g.
//! `CENSUS_ENRICHMENT__AGE_ATTEMPTS=5`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use census_enrich::{EnrichConfig, RetryPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Directory holding `all.log`; created on startup.
  #[serde(default = "default_log_dir")]
  pub log_dir:    PathBuf,
  #[serde(default)]
  pub enrichment: EnrichmentSettings,
}

/// The `[enrichment]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
  pub age_url:            String,
  pub gender_url:         String,
  pub nationality_url:    String,
  pub age_attempts:       u32,
  pub age_retry_delay_ms: u64,
  pub timeout_secs:       u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("census.db") }

fn default_log_dir() -> PathBuf { PathBuf::from("logs") }

impl Default for EnrichmentSettings {
  fn default() -> Self {
    let defaults = EnrichConfig::default();
    Self {
      age_url:            defaults.age_url,
      gender_url:         defaults.gender_url,
      nationality_url:    defaults.nationality_url,
      age_attempts:       defaults.age_retry.max_attempts,
      age_retry_delay_ms: u64::try_from(defaults.age_retry.delay.as_millis()).unwrap_or(u64::MAX),
      timeout_secs:       defaults.timeout.as_secs(),
    }
  }
}

impl EnrichmentSettings {
  pub fn to_enrich_config(&self) -> EnrichConfig {
    EnrichConfig {
      age_url: self.age_url.clone(),
      gender_url: self.gender_url.clone(),
      nationality_url: self.nationality_url.clone(),
      age_retry: RetryPolicy::fixed(
        self.age_attempts,
        Duration::from_millis(self.age_retry_delay_ms),
      ),
      timeout: Duration::from_secs(self.timeout_secs),
      ..EnrichConfig::default()
    }
  }
}

impl ServerConfig {
  /// Load `path` (if it exists) and the `CENSUS_*` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::from_builder(
      config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
          config::Environment::with_prefix("CENSUS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
        ),
    )
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> Result<Self, config::ConfigError> {
    builder.build()?.try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
