//! Layered configuration: optional TOML file, then `FACULTY_*` environment
//! variables. Command-line flags are applied on top by `main`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use faculty_client::{ApiConfig, DEFAULT_BASE_URL, GOOGLE_USERINFO_URL};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub base_url:     String,
  pub userinfo_url: String,
  pub timeout_secs: u64,
  /// Quiet period before a live name search fires.
  pub debounce_ms:  u64,
  /// Search while typing in the name field.
  pub live_search:  bool,
  pub session_file: PathBuf,
  /// Where the TUI writes its log. Without one the TUI does not log.
  pub log_file:     Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_owned(),
      userinfo_url: GOOGLE_USERINFO_URL.to_owned(),
      timeout_secs: 30,
      debounce_ms:  500,
      live_search:  true,
      session_file: PathBuf::from("~/.config/faculty/session.toml"),
      log_file:     None,
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("FACULTY").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.session_file = expand_tilde(&settings.session_file);
    settings.log_file = settings.log_file.as_deref().map(expand_tilde);
    Ok(settings)
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url:     self.base_url.clone(),
      userinfo_url: self.userinfo_url.clone(),
      timeout:      Duration::from_secs(self.timeout_secs),
    }
  }

  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
}

/// Expand a leading `~/` to `$HOME`.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
