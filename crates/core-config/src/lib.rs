//! Configuration loading and parsing.
//!
//! Parses `dim.toml` (or an override path provided by the binary). Every
//! section is optional and unknown fields are ignored so older files keep
//! loading. A file that fails to parse is reported at `warn` and replaced by
//! defaults; a missing file is not an error.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "dim.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Two identical letters typed quickly in Insert mode act as Escape.
    /// An empty string disables the sequence.
    #[serde(default = "InputConfig::default_escape_sequence")]
    pub escape_sequence: String,
    #[serde(default = "InputConfig::default_escape_timeout_ms")]
    pub escape_timeout_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            escape_sequence: Self::default_escape_sequence(),
            escape_timeout_ms: Self::default_escape_timeout_ms(),
        }
    }
}

impl InputConfig {
    fn default_escape_sequence() -> String {
        "jj".to_string()
    }
    const fn default_escape_timeout_ms() -> u64 {
        150
    }

    /// The doubled escape letter, if the configured sequence is two identical chars.
    pub fn escape_char(&self) -> Option<char> {
        let mut chars = self.escape_sequence.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) if a == b => Some(a),
            _ => None,
        }
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }
}

/// A user-defined highlighting profile (regex/state backend only).
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub name: String,
    /// Regular expression matched against the file name.
    pub file_pattern: String,
    /// Keywords; a trailing `|` marks a secondary (type) keyword.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub line_comment: Option<String>,
    #[serde(default)]
    pub block_comment: Option<(String, String)>,
    #[serde(default)]
    pub highlight_numbers: bool,
    #[serde(default)]
    pub highlight_strings: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyntaxConfig {
    #[serde(default = "SyntaxConfig::default_reparse_interval_ms")]
    pub reparse_interval_ms: u64,
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            reparse_interval_ms: Self::default_reparse_interval_ms(),
            profiles: Vec::new(),
        }
    }
}

impl SyntaxConfig {
    const fn default_reparse_interval_ms() -> u64 {
        1000
    }

    pub fn reparse_interval(&self) -> Duration {
        Duration::from_millis(self.reparse_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusConfig {
    #[serde(default = "StatusConfig::default_message_ttl_secs")]
    pub message_ttl_secs: u64,
    #[serde(default = "StatusConfig::default_quit_times")]
    pub quit_times: u8,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            message_ttl_secs: Self::default_message_ttl_secs(),
            quit_times: Self::default_quit_times(),
        }
    }
}

impl StatusConfig {
    const fn default_message_ttl_secs() -> u64 {
        5
    }
    const fn default_quit_times() -> u8 {
        3
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub syntax: SyntaxConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("dim").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                profiles = file.syntax.profiles.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let file = toml::from_str::<ConfigFile>(content)?;
        Ok(Self {
            raw: Some(content.to_string()),
            path: None,
            file,
        })
    }
}
