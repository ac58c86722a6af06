use crate::config::SpeakConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::Proxy;
use std::time::Duration;

/// Build the shared HTTP client for conversion requests.
pub fn build_http_client(config: &SpeakConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Some(Duration::from_secs(90)));

    if let Some(proxy_url) = &config.proxy_url {
        let proxy = Proxy::all(proxy_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid proxy URL: {}", e),
                ErrorContext::new().with_field_path("config.proxy_url"),
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Normalize a reqwest failure into a transport error.
pub(crate) fn transport_error(stage: &str, err: reqwest::Error) -> Error {
    let mut ctx = ErrorContext::new().with_source("conversion_client");
    if err.is_timeout() {
        ctx = ctx.with_details("timeout");
    } else if err.is_connect() {
        ctx = ctx.with_details("connect");
    }
    Error::transport_with_context(format!("{}: {}", stage, err), ctx)
}
