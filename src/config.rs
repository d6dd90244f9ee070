use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const APP_DIR: &str = "now-playing";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// `$XDG_CONFIG_HOME/now-playing`, else `$HOME/.config/now-playing`.
pub fn config_dir() -> PathBuf {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub asset_dir: PathBuf,
    /// Audio asset name, resolved without extension
    pub track: String,
    /// Cover art asset name; embedded art is used when it's missing
    pub artwork: String,
    pub title: String,
    pub artist: String,
    pub device_label: String,
    pub theme: String,
    pub tick_ms: u64,
    pub seek_step_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            asset_dir: PathBuf::from("assets"),
            track: "forest".into(),
            artwork: "mm".into(),
            title: "Lucid Dreams".into(),
            artist: "Juice WRLD".into(),
            device_label: "Erke".into(),
            theme: "Default".into(),
            tick_ms: 100,
            seek_step_secs: 5.0,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// `config.json` in `dir` if present; defaults otherwise. A broken file is
    /// logged and ignored.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join("config.json");
        if !path.exists() {
            return Config::default();
        }
        match Config::from_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring config file");
                Config::default()
            }
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn seek_step(&self) -> f64 {
        if self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0 {
            self.seek_step_secs
        } else {
            Config::default().seek_step_secs
        }
    }
}
