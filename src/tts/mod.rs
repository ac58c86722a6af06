//! Text-to-speech conversion: request types and the HTTP conversion client.

mod client;
mod types;

pub use client::{ConversionClient, ConversionClientBuilder, Converter};
pub use types::{AudioFormat, AudioPayload, ConversionRequest};
