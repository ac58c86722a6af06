//! Conversion client: posts text to the speech endpoint and returns audio.

use super::types::{mime_essence, AudioFormat, AudioPayload, AudioUrlResponse, ConversionRequest};
use crate::config::{ResponseMode, SpeakConfig};
use crate::transport::{build_http_client, transport_error};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Anything that can turn a request into audio. The converter view-state only
/// depends on this.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<AudioPayload>;
}

/// HTTP client for the text-to-speech endpoint. One attempt per call, no retries.
pub struct ConversionClient {
    http_client: reqwest::Client,
    endpoint: String,
    response_mode: ResponseMode,
}

impl ConversionClient {
    pub fn builder() -> ConversionClientBuilder {
        ConversionClientBuilder::new()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn convert_text(&self, text: &str, voice_id: Option<&str>) -> Result<AudioPayload> {
        self.convert(&ConversionRequest::new(text, voice_id)).await
    }

    fn parse_audio_url(body: &[u8]) -> Result<AudioPayload> {
        let parsed: AudioUrlResponse = serde_json::from_slice(body).map_err(|e| {
            Error::transport_with_context(
                format!("Malformed audio URL response: {}", e),
                ErrorContext::new()
                    .with_field_path("response.audioUrl")
                    .with_source("conversion_client"),
            )
        })?;
        if parsed.audio_url.trim().is_empty() {
            return Err(Error::transport_with_context(
                "Empty audio URL in response",
                ErrorContext::new()
                    .with_field_path("response.audioUrl")
                    .with_source("conversion_client"),
            ));
        }
        Ok(AudioPayload::Url(parsed.audio_url))
    }
}

#[async_trait]
impl Converter for ConversionClient {
    async fn convert(&self, request: &ConversionRequest) -> Result<AudioPayload> {
        if request.is_blank() {
            return Err(Error::empty_text());
        }
        debug!(
            endpoint = %self.endpoint,
            chars = request.text.chars().count(),
            voice = request.voice_id.as_deref().unwrap_or("-"),
            "sending conversion request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error("Conversion request failed", e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            // An unreadable error body still reports the server failure.
            let body = response.bytes().await.unwrap_or_default();
            let err = Error::from_server_response(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "conversion rejected by server");
            return Err(err);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error("Failed to read conversion response", e))?;

        let is_json = mime_essence(&content_type) == "application/json";
        if self.response_mode == ResponseMode::AudioUrl || is_json {
            let payload = Self::parse_audio_url(&bytes)?;
            info!(status = status.as_u16(), "conversion returned audio URL");
            return Ok(payload);
        }

        if bytes.is_empty() {
            return Err(Error::transport_with_context(
                "Empty audio body",
                ErrorContext::new().with_source("conversion_client"),
            ));
        }
        let format = AudioFormat::from_content_type(&content_type);
        info!(
            status = status.as_u16(),
            bytes = bytes.len(),
            mime = format.mime_type(),
            "conversion returned audio"
        );
        Ok(AudioPayload::Audio {
            data: bytes,
            format,
        })
    }
}

pub struct ConversionClientBuilder {
    config: SpeakConfig,
}

impl ConversionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: SpeakConfig::default(),
        }
    }

    pub fn from_config(config: SpeakConfig) -> Self {
        Self { config }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.config.endpoint_path = path.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn response_mode(mut self, mode: ResponseMode) -> Self {
        self.config.response_mode = mode;
        self
    }

    pub fn build(self) -> Result<ConversionClient> {
        self.config.validate()?;
        let http_client = build_http_client(&self.config)?;
        Ok(ConversionClient {
            http_client,
            endpoint: self.config.endpoint_url(),
            response_mode: self.config.response_mode,
        })
    }
}

impl Default for ConversionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
