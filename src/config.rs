//! Client configuration: endpoint, timeouts and input limits.
//!
//! Values come from defaults, an optional YAML file, then `SPEAK_IT_*`
//! environment variables (in that order of precedence, last wins).

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/text-to-speech";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_LENGTH: usize = 1000;

/// How a successful response body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Raw `audio/mpeg` bytes.
    #[default]
    Binary,
    /// JSON `{ "audioUrl": "..." }`.
    AudioUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub timeout_secs: u64,
    pub max_length: usize,
    pub response_mode: ResponseMode,
    /// Voice id or name selected on startup.
    pub default_voice: Option<String>,
    pub proxy_url: Option<String>,
}

impl Default for SpeakConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_length: DEFAULT_MAX_LENGTH,
            response_mode: ResponseMode::Binary,
            default_voice: None,
            proxy_url: None,
        }
    }
}

impl SpeakConfig {
    /// Defaults plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cfg = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        let cfg = cfg.with_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `SPEAK_IT_*` overrides. Unparseable numbers are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SPEAK_IT_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = env::var("SPEAK_IT_ENDPOINT_PATH") {
            self.endpoint_path = v;
        }
        if let Some(v) = env::var("SPEAK_IT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = v;
        }
        if let Some(v) = env::var("SPEAK_IT_MAX_LENGTH")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.max_length = v;
        }
        if let Ok(v) = env::var("SPEAK_IT_PROXY_URL") {
            self.proxy_url = Some(v);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if self.max_length == 0 {
            return Err(Error::configuration_with_context(
                "max_length must be at least 1",
                ErrorContext::new().with_field_path("config.max_length"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout_secs must be at least 1",
                ErrorContext::new().with_field_path("config.timeout_secs"),
            ));
        }
        if let Some(voice) = &self.default_voice {
            if crate::voice::resolve(voice).is_none() {
                return Err(Error::configuration_with_context(
                    format!("Unknown voice: {}", voice),
                    ErrorContext::new().with_field_path("config.default_voice"),
                ));
            }
        }
        Ok(())
    }

    /// Full conversion endpoint URL.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            normalize_path(&self.endpoint_path)
        )
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
