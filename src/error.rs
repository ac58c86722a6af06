use thiserror::Error;

/// Notice shown when a submission is made with blank text.
pub const EMPTY_TEXT_MESSAGE: &str = "Please add some text first";

/// Fallback shown when the server fails without a readable message.
pub const SERVER_FALLBACK_MESSAGE: &str = "Failed to convert text to audio";

/// Single message every transport-level failure is normalized to.
pub const TRANSPORT_MESSAGE: &str = "Sorry, please try again";

/// Notice shown when the produced audio cannot be played.
pub const PLAYBACK_MESSAGE: &str = "Could not play audio. Please try again.";

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "request.text")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "conversion_client", "converter")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for conversion, playback and configuration failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {message}{}", format_context(.context))]
    Transport {
        message: String,
        context: ErrorContext,
    },

    /// Non-2xx response. `message` is the server-supplied text, if any was readable.
    #[error("Server error: HTTP {status}: {}", server_text(.message))]
    Server { status: u16, message: Option<String> },

    #[error("Playback error: {message}{}", format_context(.context))]
    Playback {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn server_text(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(SERVER_FALLBACK_MESSAGE)
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error without context
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Validation failure for blank text, carrying the user-facing notice.
    pub fn empty_text() -> Self {
        Self::validation_with_context(
            EMPTY_TEXT_MESSAGE,
            ErrorContext::new().with_field_path("request.text"),
        )
    }

    /// Create a new transport error with structured context
    pub fn transport_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Transport {
            message: msg.into(),
            context,
        }
    }

    /// Create a new playback error with structured context
    pub fn playback_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Playback {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error without context
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Build a server error from a non-2xx response body.
    ///
    /// The body is read as JSON and the `error` field is preferred over `message`.
    /// Anything unparseable yields a server error without a message.
    pub fn from_server_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["error", "message"].iter().find_map(|key| {
                    v.get(*key)
                        .and_then(|m| m.as_str())
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                })
            });
        Error::Server { status, message }
    }

    /// The text to surface to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message, .. } => message.clone(),
            Error::Transport { .. } => TRANSPORT_MESSAGE.to_string(),
            Error::Server { message, .. } => message
                .clone()
                .unwrap_or_else(|| SERVER_FALLBACK_MESSAGE.to_string()),
            Error::Playback { .. } => PLAYBACK_MESSAGE.to_string(),
            Error::Configuration { message, .. } => message.clone(),
            Error::Io(_) | Error::Serialization(_) | Error::Yaml(_) => TRANSPORT_MESSAGE.to_string(),
        }
    }

    /// Whether this error was raised locally before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Transport { context, .. }
            | Error::Playback { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
