//! Mock ElevenLabs server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use voiceforge::{ElevenLabsClient, ObjectUrlRegistry};

pub const TEST_KEY: &str = "sk_test_0123456789";

/// A few bytes that look like the start of an MP3 frame.
pub const FAKE_MP3: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0xff, 0xfb, 0x90, 0x64];

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
    pub registry: ObjectUrlRegistry,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server,
            base_url,
            registry: ObjectUrlRegistry::new(),
        }
    }

    /// Client pointed at the mock server, sharing the fixture's registry.
    pub fn client(&self) -> ElevenLabsClient {
        ElevenLabsClient::builder()
            .base_url(&self.base_url)
            .timeout_secs(5)
            .registry(self.registry.clone())
            .build()
            .expect("client builds")
    }

    /// `GET /v1/user` answering with `status`.
    pub async fn mock_user(&mut self, status: usize) -> Mock {
        self.server
            .mock("GET", "/v1/user")
            .match_header("xi-api-key", TEST_KEY)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"subscription":{"tier":"free"}}"#)
            .create_async()
            .await
    }

    /// Successful synthesis for `voice_id` returning [`FAKE_MP3`], expected `hits` times.
    pub async fn mock_speech(&mut self, voice_id: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", format!("/v1/text-to-speech/{}", voice_id).as_str())
            .match_header("xi-api-key", TEST_KEY)
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(FAKE_MP3)
            .expect(hits)
            .create_async()
            .await
    }

    /// Synthesis that must never be called.
    pub async fn mock_speech_unreachable(&mut self) -> Mock {
        self.server
            .mock("POST", Matcher::Regex(r"^/v1/text-to-speech/.*$".to_string()))
            .expect(0)
            .create_async()
            .await
    }

    pub async fn mock_error(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}
