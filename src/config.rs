//! Injector configuration: how problems with unresolvable asset links are reported.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "assets_version.config.json";

/// Policy applied when an asset link cannot be parsed or its file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
  /// Skip the link silently.
  Ignore,
  /// Skip the link and emit a low-severity diagnostic (`tracing::info!`).
  Notice,
  /// Skip the link and emit a higher-severity diagnostic (`tracing::warn!`).
  Warning,
  /// Abort the whole rewrite with the problem as the error.
  #[default]
  Exception,
}

impl ReportMode {
  /// Lowercase name used in configuration files.
  pub fn as_str(self) -> &'static str {
    match self {
      ReportMode::Ignore => "ignore",
      ReportMode::Notice => "notice",
      ReportMode::Warning => "warning",
      ReportMode::Exception => "exception",
    }
  }
}

impl fmt::Display for ReportMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a report mode name is not one of `ignore`, `notice`, `warning`, `exception`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown problem report mode '{0}', expected one of: ignore, notice, warning, exception")]
pub struct UnknownReportMode(
  /// The rejected name.
  pub String,
);

impl FromStr for ReportMode {
  type Err = UnknownReportMode;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "ignore" => Ok(ReportMode::Ignore),
      "notice" => Ok(ReportMode::Notice),
      "warning" => Ok(ReportMode::Warning),
      "exception" => Ok(ReportMode::Exception),
      _ => Err(UnknownReportMode(value.to_string())),
    }
  }
}

/// Discoverable injector configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
  /// How unresolvable asset links are reported.
  pub problem_report: ReportMode,
}

impl InjectorConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fallback to default
  /// values, so an unconfigured project keeps failing loudly on missing assets.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }
}
