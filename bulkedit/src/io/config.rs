//! Editor configuration stored in `bulkedit.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::values::DEFAULT_VALUE_LIMIT;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "bulkedit.toml";

/// Editor configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to values that
/// work against a stock Omeka S install once `api.url` and the key pair are
/// filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub api: ApiConfig,
    pub values: ValuesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Site API root, e.g. `https://example.org/api` (`/api` is appended when missing).
    pub url: String,
    pub key_identity: String,
    pub key_credential: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key_identity: String::new(),
            key_credential: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValuesConfig {
    /// Maximum distinct values returned by `bulkedit values`.
    pub limit: usize,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_VALUE_LIMIT,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be > 0"));
        }
        if self.values.limit == 0 {
            return Err(anyhow!("values.limit must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EditorConfig::default()`.
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        let cfg = EditorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EditorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &EditorConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, EditorConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bulkedit.toml");
        let mut cfg = EditorConfig::default();
        cfg.api.url = "https://demo.org/api".to_string();
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bulkedit.toml");
        fs::write(&path, "[api]\nurl = \"https://demo.org\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.api.url, "https://demo.org");
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.values.limit, DEFAULT_VALUE_LIMIT);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bulkedit.toml");
        fs::write(&path, "[api]\ntimeout_secs = 0\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
