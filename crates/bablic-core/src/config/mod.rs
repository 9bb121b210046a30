mod defaults;


use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::BablicError;
use defaults::*;

/// Top-level adapter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bablic: BablicConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub reporter: ReporterConfig,
}

/// Site identity and process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BablicConfig {
    /// Deployment whose translations are served. Required.
    #[serde(default)]
    pub site_id: String,
    /// Use the `/test` CDN path and the staging report backend.
    #[serde(default)]
    pub is_debug: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where client-local state (the revision marker) lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for BablicConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            is_debug: false,
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

/// Service hosts. Overridable for self-hosted or mirrored deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
    #[serde(default = "default_report_host")]
    pub report_host: String,
    #[serde(default = "default_debug_report_host")]
    pub debug_report_host: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            cdn_host: default_cdn_host(),
            report_host: default_report_host(),
            debug_report_host: default_debug_report_host(),
        }
    }
}

/// Missing-key reporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Inactivity required before a batch is flushed.
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
    /// Page location sent along with each report.
    #[serde(default)]
    pub page_url: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            page_url: String::new(),
        }
    }
}

impl ReporterConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

impl Config {
    /// Minimal config for `site_id`, everything else default.
    pub fn for_site(site_id: impl Into<String>, is_debug: bool) -> Self {
        let mut cfg = Self::default();
        cfg.bablic.site_id = site_id.into();
        cfg.bablic.is_debug = is_debug;
        cfg
    }

    /// Reject configs the adapter cannot run with.
    pub fn validate(&self) -> Result<(), BablicError> {
        if self.bablic.site_id.trim().is_empty() {
            return Err(BablicError::Config("bablic.site_id is required".into()));
        }
        if self.endpoints.cdn_host.is_empty() || self.endpoints.report_host.is_empty() {
            return Err(BablicError::Config("endpoint hosts must not be empty".into()));
        }
        Ok(())
    }

    /// Report host for the configured mode.
    pub fn report_host(&self) -> &str {
        if self.bablic.is_debug {
            &self.endpoints.debug_report_host
        } else {
            &self.endpoints.report_host
        }
    }
}

impl BablicConfig {
    /// `data_dir` with a leading `~/` resolved against `$HOME`.
    pub fn data_dir_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

/// Resolve a leading `~/` against `$HOME`. Other paths pass through.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// Read the TOML config at `path`.
///
/// An absent file means all defaults. Overrides are applied by the caller
/// before [`Config::validate`].
pub fn load(path: impl AsRef<Path>) -> Result<Config, BablicError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("config: no file at {}, defaults apply", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(BablicError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };
    toml::from_str(&content)
        .map_err(|e| BablicError::Config(format!("{}: {e}", path.display())))
}
