//! Mock speech endpoint for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use speak_it::{ConversionClient, ResponseMode};

pub const ENDPOINT: &str = "/api/text-to-speech";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> ConversionClient {
        self.client_with_mode(ResponseMode::Binary)
    }

    pub fn client_with_mode(&self, mode: ResponseMode) -> ConversionClient {
        ConversionClient::builder()
            .base_url(&self.base_url)
            .timeout_secs(5)
            .response_mode(mode)
            .build()
            .expect("client builds")
    }

    /// Successful binary audio response, optionally requiring an exact JSON body
    pub async fn mock_audio(&mut self, body: Option<serde_json::Value>, audio: &[u8]) -> Mock {
        let mut mock = self
            .server
            .mock("POST", ENDPOINT)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(audio);
        if let Some(body) = body {
            mock = mock.match_body(Matcher::Json(body));
        }
        mock.create_async().await
    }

    pub async fn mock_json(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", ENDPOINT)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_plain(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", ENDPOINT)
            .with_status(status)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await
    }
}
