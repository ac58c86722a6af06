//! HTTP transport setup shared by the conversion client.

mod http;

pub use http::build_http_client;
pub(crate) use http::transport_error;
