//! Audio payloads and playable references.
//!
//! A playable reference ([`ObjectUrl`]) is a short-lived handle minted by an
//! [`ObjectUrlRegistry`] that lets a player stream bytes already fetched from
//! the provider. References hold their bytes alive in the registry until
//! revoked.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

const URL_PREFIX: &str = "blob:voiceforge/";

/// Supported audio formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Opus,
    Wav,
    Pcm,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Wav => "wav",
            Self::Pcm => "pcm",
        }
    }

    /// Parse a `Content-Type` value; unknown types are treated as MP3.
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match mime.as_str() {
            "audio/opus" | "audio/ogg" => Self::Opus,
            "audio/wav" | "audio/x-wav" | "audio/wave" => Self::Wav,
            "audio/pcm" | "audio/l16" => Self::Pcm,
            _ => Self::Mp3,
        }
    }
}

/// Raw audio returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub data: Bytes,
    pub format: AudioFormat,
}

impl AudioPayload {
    pub fn new(data: impl Into<Bytes>, format: AudioFormat) -> Self {
        Self {
            data: data.into(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Mints and resolves playable references. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, payload: &AudioPayload) -> ObjectUrl {
        let url = format!("{}{}", URL_PREFIX, uuid::Uuid::new_v4());
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone(), payload.data.clone());
        debug!(%url, bytes = payload.len(), "created playable reference");
        ObjectUrl {
            url,
            registry: self.clone(),
            revoked: false,
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(url)
    }

    /// Number of references not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn revoke(&self, url: &str) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url)
            .is_some();
        if removed {
            debug!(%url, "revoked playable reference");
        }
        removed
    }
}

impl fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning handle to a playable reference.
///
/// Release with [`ObjectUrl::revoke`]; a handle dropped without it is revoked
/// on drop.
pub struct ObjectUrl {
    url: String,
    registry: ObjectUrlRegistry,
    revoked: bool,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.registry.revoke(&self.url);
            self.revoked = true;
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A synthesis result: the payload plus the reference a player loads.
#[derive(Debug)]
pub struct PlayableAudio {
    pub payload: AudioPayload,
    pub url: ObjectUrl,
}

impl PlayableAudio {
    pub fn new(payload: AudioPayload, registry: &ObjectUrlRegistry) -> Self {
        let url = registry.create(&payload);
        Self { payload, url }
    }

    pub fn release(self) {
        self.url.revoke();
    }
}
