use super::backend::CredentialBackend;
use crate::Result;
use std::env;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the API key entry.
pub const CREDENTIAL_KEY: &str = "elevenlabs-api-key";

/// Runtime fallback when nothing is persisted.
pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Default credential baked in at build time, if the builder supplied one.
pub fn build_time_default() -> Option<&'static str> {
    option_env!("VOICEFORGE_DEFAULT_API_KEY").filter(|s| !s.is_empty())
}

/// Holds the provider API key and persists every change immediately.
///
/// The store never validates the key; that is the synthesis client's job.
pub struct CredentialStore {
    backend: Arc<dyn CredentialBackend>,
    value: String,
    revision: u64,
}

impl CredentialStore {
    /// Read the persisted value, falling back to the environment and then the
    /// build-time default. Fallback values are not written back.
    pub fn load(backend: Arc<dyn CredentialBackend>) -> Result<Self> {
        let persisted = backend.load(CREDENTIAL_KEY)?.filter(|v| !v.trim().is_empty());
        let value = match persisted {
            Some(v) => {
                debug!(backend = backend.name(), "loaded persisted credential");
                v
            }
            None => env::var(API_KEY_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| build_time_default().map(str::to_string))
                .unwrap_or_default(),
        };
        Ok(Self {
            backend,
            value,
            revision: 0,
        })
    }

    /// A store with a fixed starting value, bypassing env/build-time fallbacks.
    pub fn with_value(backend: Arc<dyn CredentialBackend>, value: impl Into<String>) -> Self {
        Self {
            backend,
            value: value.into(),
            revision: 0,
        }
    }

    pub fn get(&self) -> &str {
        &self.value
    }

    /// Overwrite and persist. An unchanged value is still re-persisted.
    pub fn set(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if let Err(e) = self.backend.save(CREDENTIAL_KEY, &value) {
            warn!(backend = self.backend.name(), error = %e, "failed to persist credential");
            return Err(e);
        }
        if value != self.value {
            self.revision += 1;
        }
        self.value = value;
        debug!(key = %self.masked(), "credential updated");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.backend.clear(CREDENTIAL_KEY)?;
        if !self.value.is_empty() {
            self.revision += 1;
        }
        self.value.clear();
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        !self.value.trim().is_empty()
    }

    /// Bumped whenever the stored value actually changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn masked(&self) -> String {
        mask(&self.value)
    }
}

/// Display form of a secret: at most the last four characters survive.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        n if n <= 8 => "*".repeat(n),
        n => {
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}{}", "*".repeat(n - 4), tail)
        }
    }
}
