//! ElevenLabs HTTP client.

use super::types::SynthesisRequest;
use super::SpeechProvider;
use crate::audio::{AudioFormat, AudioPayload, ObjectUrlRegistry, PlayableAudio};
use crate::catalog::{Voice, VoicesResponse};
use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::credentials::mask;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Proxy, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const API_KEY_HEADER: &str = "xi-api-key";

pub struct ElevenLabsClient {
    http_client: reqwest::Client,
    base_url: Url,
    registry: ObjectUrlRegistry,
}

impl ElevenLabsClient {
    pub fn builder() -> ElevenLabsClientBuilder {
        ElevenLabsClientBuilder::new()
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::configuration("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /v1/voices`
    pub async fn list_voices(&self, api_key: &str) -> Result<Vec<Voice>> {
        if api_key.trim().is_empty() {
            return Err(Error::auth("Please enter your ElevenLabs API key"));
        }
        let url = self.endpoint(&["v1", "voices"])?;
        debug!(%url, key = %mask(api_key), "fetching voices");
        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| transport_error("Voice list request failed", e))?;
        let response = check_status(response, "Failed to fetch voices").await?;
        let body: VoicesResponse = response
            .json()
            .await
            .map_err(|e| transport_error("Failed to decode voice list", e))?;
        Ok(body.voices)
    }

    /// `GET /v1/user`. Resolves `false` on any failure, including transport errors.
    pub async fn validate_key(&self, api_key: &str) -> bool {
        if api_key.trim().is_empty() {
            return false;
        }
        let url = match self.endpoint(&["v1", "user"]) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot build key validation URL");
                return false;
            }
        };
        match self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status().is_success();
                debug!(status = %response.status(), key = %mask(api_key), valid = ok, "validated API key");
                ok
            }
            Err(e) => {
                warn!(error = %e, "error validating API key");
                false
            }
        }
    }

    /// `POST /v1/text-to-speech/{voice_id}`
    pub async fn synthesize(
        &self,
        request: &SynthesisRequest,
        api_key: &str,
    ) -> Result<PlayableAudio> {
        if api_key.trim().is_empty() {
            return Err(Error::auth("Please enter your ElevenLabs API key"));
        }
        if request.voice_id.is_empty() {
            return Err(Error::validation_with_context(
                "Voice must be selected",
                ErrorContext::new().with_field_path("request.voice_id"),
            ));
        }
        let url = self.endpoint(&["v1", "text-to-speech", &request.voice_id])?;
        debug!(
            %url,
            model = %request.model_id,
            chars = request.text.chars().count(),
            "requesting speech"
        );
        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .header("Accept", "audio/mpeg")
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| transport_error("TTS request failed", e))?;
        let response = check_status(response, "Speech synthesis failed").await?;
        let format = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(AudioFormat::from_content_type)
            .unwrap_or(AudioFormat::Mp3);
        let data = response
            .bytes()
            .await
            .map_err(|e| transport_error("Failed to read TTS response", e))?;
        if data.is_empty() {
            return Err(Error::resource_with_context(
                "Provider returned an empty audio body",
                ErrorContext::new().with_source("client"),
            ));
        }
        Ok(PlayableAudio::new(AudioPayload::new(data, format), &self.registry))
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsClient {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<Voice>> {
        ElevenLabsClient::list_voices(self, api_key).await
    }

    async fn validate_key(&self, api_key: &str) -> bool {
        ElevenLabsClient::validate_key(self, api_key).await
    }

    async fn synthesize(&self, request: &SynthesisRequest, api_key: &str) -> Result<PlayableAudio> {
        ElevenLabsClient::synthesize(self, request, api_key).await
    }
}

fn transport_error(what: &str, e: reqwest::Error) -> Error {
    let details = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_decode() {
        "decode"
    } else {
        "request"
    };
    Error::network_with_context(
        format!("{}: {}", what, e),
        ErrorContext::new().with_source("client").with_details(details),
    )
}

async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(status = status.as_u16(), %message, "{}", what);
    Err(Error::from_status(status.as_u16(), status_text(status), message))
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// `detail.message` when present, then a string `detail`, then the body as-is.
pub(crate) fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => {
            if let Some(msg) = json
                .get("detail")
                .and_then(|d| d.get("message"))
                .and_then(|m| m.as_str())
            {
                return msg.to_string();
            }
            if let Some(detail) = json.get("detail").and_then(|d| d.as_str()) {
                return detail.to_string();
            }
            json.to_string()
        }
        Err(_) if trimmed.is_empty() => "{}".to_string(),
        Err(_) => trimmed.to_string(),
    }
}

pub struct ElevenLabsClientBuilder {
    base_url: Option<String>,
    timeout_secs: u64,
    proxy_url: Option<String>,
    registry: Option<ObjectUrlRegistry>,
}

impl ElevenLabsClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy_url: None,
            registry: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .base_url(config.base_url.clone())
            .timeout_secs(config.timeout_secs);
        if let Some(proxy) = &config.proxy_url {
            builder = builder.proxy_url(proxy.clone());
        }
        builder
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Share a reference registry with a player.
    pub fn registry(mut self, registry: ObjectUrlRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<ElevenLabsClient> {
        let raw = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new().with_field_path("base_url").with_details(raw.clone()),
            )
        })?;
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(self.timeout_secs.max(1)));
        if let Some(proxy_url) = &self.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new().with_field_path("proxy_url"),
                )
            })?;
            builder = builder.proxy(proxy);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(ElevenLabsClient {
            http_client,
            base_url,
            registry: self.registry.unwrap_or_default(),
        })
    }
}

impl Default for ElevenLabsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail_message() {
        let body = r#"{"detail":{"status":"invalid_api_key","message":"Invalid API key"}}"#;
        assert_eq!(error_message(body), "Invalid API key");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(r#"{"detail":"Not found"}"#), "Not found");
        assert_eq!(error_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "{}");
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = ElevenLabsClient::builder()
            .base_url("http://localhost:8080/proxy/")
            .build()
            .unwrap();
        let url = client.endpoint(&["v1", "text-to-speech", "a b"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1/text-to-speech/a%20b");
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        assert!(ElevenLabsClient::builder().base_url("::nope").build().is_err());
    }
}
