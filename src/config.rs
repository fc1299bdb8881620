//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILCOMPOSE_CONFIG` (environment variable)
//! 2. `~/.config/mailcompose/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailcompose\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! The delivery service base URL can additionally be supplied by the hosting
//! environment through `$MAILCOMPOSE_BASE_URL`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding `transport.base_url`.
pub const BASE_URL_ENV: &str = "MAILCOMPOSE_BASE_URL";

/// Default aggregate attachment cap: 15 MiB.
pub const DEFAULT_ATTACHMENT_CAP: u64 = 15 * 1024 * 1024;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Remote delivery service settings.
    pub transport: TransportConfig,
    /// Ingestion limits.
    pub limits: LimitsConfig,
    /// Payload assembly defaults.
    pub compose: ComposeConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Remote delivery service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL of the delivery service; `/api/email/send` is appended.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Value of the payload's `source` field.
    pub source: String,
}

/// Ingestion limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum aggregate size of all attachments in one session, in bytes.
    /// Inline images do not count against this cap.
    pub attachment_cap_bytes: u64,
}

/// Payload assembly defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Value of `additionalInfo.template_id`.
    pub template_id: String,
    /// What to do with accumulated files when sending in text mode.
    pub text_mode_files: TextModeFiles,
}

/// Handling of session files when the active mode is plain text.
///
/// Text mode never transmits attachments or inline images; this only
/// controls what the operator is told and whether the session is emptied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextModeFiles {
    /// Keep the files in the session without saying anything.
    Keep,
    /// Keep the files and warn that they will not be sent.
    #[default]
    Warn,
    /// Drop the files from the session before assembly.
    Clear,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            source: "mailcompose".to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            attachment_cap_bytes: DEFAULT_ATTACHMENT_CAP,
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            template_id: "default".to_string(),
            text_mode_files: TextModeFiles::Warn,
        }
    }
}

impl Config {
    /// Resolve the effective base URL: explicit override, then environment, then file.
    pub fn base_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override {
            return url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim().trim_end_matches('/').to_string();
            }
        }
        self.transport.base_url.trim_end_matches('/').to_string()
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILCOMPOSE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mailcompose").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailcompose")
}
