// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use tracing::debug;

use crate::schema::ColumnAliases;

/// Published catalog sheet used when neither the config nor `SHEET_URL` names one.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1AfYExJcJEJVw6hOmPUUkBXBnbC16MM9vu453MpVLIpw/gviz/tq?tqx=out:csv&gid=0";

/// Environment variable overriding `source.url`.
pub const SHEET_URL_ENV: &str = "SHEET_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub columns: ColumnAliases,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub format: SourceFormat,
    /// `None` means detect from the first non-blank line.
    pub delimiter: Option<char>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SHEET_URL.to_string(),
            format: SourceFormat::Csv,
            delimiter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    /// How many leading characters to scan for HTML markers.
    pub sniff_window: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            backoff_ms: 500,
            sniff_window: 800,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // an empty file is a valid, all-defaults config
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("parsing config YAML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), url = %cfg.source.url, "loaded config");
        Ok(cfg)
    }

    /// Replace the source URL when `url` is set and non-blank.
    pub fn with_url_override(mut self, url: Option<String>) -> Self {
        if let Some(u) = url.filter(|u| !u.trim().is_empty()) {
            self.source.url = u.trim().to_string();
        }
        self
    }

    /// Apply `SHEET_URL` from the environment.
    pub fn with_env(self) -> Self {
        self.with_url_override(std::env::var(SHEET_URL_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_yaml_is_default() -> Result<()> {
        assert_eq!(Config::from_yaml("")?, Config::default());
        assert_eq!(Config::from_yaml("  \n")?, Config::default());
        Ok(())
    }

    #[test]
    fn load_partial_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            r#"
source:
  url: "https://example.org/sheet.json"
  format: json
  delimiter: ";"
fetch:
  max_retries: 0
columns:
  groupe: ["Promo"]
"#
        )?;

        let cfg = Config::load(tmp.path())?;
        assert_eq!(cfg.source.url, "https://example.org/sheet.json");
        assert_eq!(cfg.source.format, SourceFormat::Json);
        assert_eq!(cfg.source.delimiter, Some(';'));
        assert_eq!(cfg.fetch.max_retries, 0);
        assert_eq!(cfg.fetch.sniff_window, 800);
        assert_eq!(cfg.columns.get(Column::Groupe), ["Promo"]);
        assert_eq!(cfg.columns.get(Column::Pole), ["Pôle", "Pole"]);
        Ok(())
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(Config::from_yaml("fetch: [1, 2").is_err());
        assert!(Config::from_yaml("source:\n  format: xml\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn url_override() {
        let cfg = Config::default().with_url_override(Some(" https://x.test/a.csv ".into()));
        assert_eq!(cfg.source.url, "https://x.test/a.csv");

        let kept = Config::default().with_url_override(Some("   ".into()));
        assert_eq!(kept.source.url, DEFAULT_SHEET_URL);
        assert_eq!(Config::default().with_url_override(None), Config::default());
    }
}
