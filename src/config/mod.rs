// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for simplejam.
//!
//! Settings are read from a YAML or TOML file and passed explicitly to
//! each command.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::RenderConfig;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "simplejam.yaml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SIMPLEJAM_CONFIG";

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JamConfig {
    /// Directory the demo commands write into
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// SF2 soundfont used for playback
    #[serde(default)]
    pub soundfont: Option<PathBuf>,
    /// Tempo, meter and chord length
    #[serde(default)]
    pub render: RenderConfig,
    /// Playback completion polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}
fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for JamConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            soundfont: None,
            render: RenderConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl JamConfig {
    /// Load from a file; `.toml` files are parsed as TOML, anything else as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Load the file named by `SIMPLEJAM_CONFIG`, else `simplejam.yaml` in
    /// `dir` if present, else defaults
    pub fn discover(dir: &Path) -> Result<Self> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::load(path);
        }
        let local = dir.join(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse TOML configuration")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Path of `file_name` inside the output directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_directory.join(file_name)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
