//! Conversion request and response types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Body of a single conversion submission. Built fresh per submit, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub text: String,
    #[serde(rename = "selectedVoiceId", skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

impl ConversionRequest {
    /// Build a request from raw input; the text is trimmed.
    pub fn new(text: &str, voice_id: Option<&str>) -> Self {
        Self {
            text: text.trim().to_string(),
            voice_id: voice_id.map(str::to_string),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Supported audio formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    /// Infer from a `Content-Type` header value. Unknown types are treated as mp3.
    pub fn from_content_type(content_type: &str) -> Self {
        match mime_essence(content_type).as_str() {
            "audio/opus" | "audio/ogg" => Self::Opus,
            "audio/aac" => Self::Aac,
            "audio/flac" => Self::Flac,
            "audio/wav" | "audio/x-wav" | "audio/wave" => Self::Wav,
            _ => Self::Mp3,
        }
    }
}

/// Lower-cased media type of a `Content-Type` value, parameters stripped.
pub(crate) fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Successful conversion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPayload {
    /// Synthesized audio bytes.
    Audio { data: Bytes, format: AudioFormat },
    /// Server-hosted audio, from the `{ "audioUrl": ... }` response variant.
    Url(String),
}

impl AudioPayload {
    pub fn mp3(data: impl Into<Bytes>) -> Self {
        AudioPayload::Audio {
            data: data.into(),
            format: AudioFormat::Mp3,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AudioUrlResponse {
    pub audio_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_selected_voice_id() {
        let req = ConversionRequest::new("Hello world", Some("Pw7NjARk1Tw61eca5OiP"));
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"text":"Hello world","selectedVoiceId":"Pw7NjARk1Tw61eca5OiP"}"#
        );
    }

    #[test]
    fn request_omits_missing_voice_and_trims() {
        let req = ConversionRequest::new("  hi  ", None);
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"text":"hi"}"#);
        assert!(ConversionRequest::new(" \t\n", None).is_blank());
    }

    #[test]
    fn mime_essence_ignores_case_and_parameters() {
        assert_eq!(mime_essence("Application/JSON; charset=utf-8"), "application/json");
        assert_eq!(mime_essence("  application/json"), "application/json");
        assert_eq!(mime_essence(""), "");
    }

    #[test]
    fn format_from_content_type() {
        assert_eq!(AudioFormat::from_content_type("audio/mpeg"), AudioFormat::Mp3);
        assert_eq!(
            AudioFormat::from_content_type("audio/wav; charset=binary"),
            AudioFormat::Wav
        );
        assert_eq!(AudioFormat::from_content_type(" Audio/FLAC "), AudioFormat::Flac);
        assert_eq!(
            AudioFormat::from_content_type("application/octet-stream"),
            AudioFormat::Mp3
        );
    }
}
