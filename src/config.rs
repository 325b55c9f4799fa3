//! Runtime configuration.
//!
//! Defaults are compiled in, an optional YAML file overrides them, and
//! `VOICEFORGE_*` environment variables override both.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the credential is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    File,
    Keyring,
    Memory,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(Error::configuration_with_context(
                format!("Unknown credential backend '{}'", other),
                ErrorContext::new()
                    .with_field_path("backend")
                    .with_details("expected file, keyring or memory"),
            )),
        }
    }
}

/// Whether the voice catalog comes from the built-in list or the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceSource {
    Static,
    Remote,
}

impl FromStr for VoiceSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "remote" => Ok(Self::Remote),
            other => Err(Error::configuration_with_context(
                format!("Unknown voice source '{}'", other),
                ErrorContext::new()
                    .with_field_path("voice_source")
                    .with_details("expected static or remote"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub backend: BackendKind,
    /// Override for the file backend location.
    pub storage_path: Option<PathBuf>,
    pub voice_source: VoiceSource,
    pub download_dir: Option<PathBuf>,
    pub proxy_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backend: BackendKind::File,
            storage_path: None,
            voice_source: VoiceSource::Static,
            download_dir: None,
            proxy_url: None,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then `path` (if given and present), then env.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            Some(p) => {
                return Err(Error::configuration_with_context(
                    "Config file not found",
                    ErrorContext::new().with_details(p.display().to_string()),
                ))
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// `<config_dir>/voiceforge/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("voiceforge").join("config.yaml"))
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("VOICEFORGE_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(raw) = env::var("VOICEFORGE_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse::<u64>().map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid timeout: {}", e),
                    ErrorContext::new()
                        .with_field_path("VOICEFORGE_TIMEOUT_SECS")
                        .with_details(raw.clone()),
                )
            })?;
        }
        if let Ok(backend) = env::var("VOICEFORGE_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Ok(source) = env::var("VOICEFORGE_VOICE_SOURCE") {
            self.voice_source = source.parse()?;
        }
        if let Ok(dir) = env::var("VOICEFORGE_DOWNLOAD_DIR") {
            self.download_dir = Some(PathBuf::from(dir));
        }
        if let Ok(proxy) = env::var("VOICEFORGE_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::configuration_with_context(
                "Base URL must use http or https",
                ErrorContext::new().with_field_path("base_url"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "Timeout must be at least one second",
                ErrorContext::new().with_field_path("timeout_secs"),
            ));
        }
        Ok(())
    }

    /// Directory for saved audio; falls back to the user's download dir, then cwd.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
