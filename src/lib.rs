//! # speak-it
//!
//! Text-to-speech conversion client with an owned converter view-state.
//!
//! ## Overview
//!
//! Text typed by the user is posted to a speech endpoint; the synthesized audio
//! that comes back is registered as a local, revocable resource and exposed to
//! the player by URI. The converter keeps at most one such resource alive and
//! releases the previous one whenever it is replaced or the converter goes away.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speak_it::{ConversionClient, ConverterState, MemoryAudioStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> speak_it::Result<()> {
//!     let client = ConversionClient::builder()
//!         .base_url("http://localhost:3000")
//!         .build()?;
//!
//!     let mut converter = ConverterState::new(Arc::new(MemoryAudioStore::new()), 1000);
//!     converter.set_text("Hello world");
//!     if let Some(notice) = converter.submit(&client).await {
//!         println!("{}", notice);
//!     }
//!     if let Some(audio) = converter.active_audio() {
//!         println!("play {}", audio.uri());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tts`] | Conversion request types and the HTTP conversion client |
//! | [`converter`] | View-state machine mediating user actions |
//! | [`playback`] | Revocable audio resources and their stores |
//! | [`voice`] | Static voice catalog |
//! | [`config`] | Endpoint and limit configuration |
//! | [`transport`] | HTTP client construction |

pub mod config;
pub mod converter;
pub mod playback;
pub mod transport;
pub mod tts;
pub mod voice;

// Re-export main types for convenience
pub use config::{ResponseMode, SpeakConfig};
pub use converter::{ConverterState, Notice, NoticeLevel, Phase};
pub use playback::{AudioStore, FileAudioStore, MemoryAudioStore, PlayableAudio};
pub use tts::{AudioFormat, AudioPayload, ConversionClient, ConversionClientBuilder, ConversionRequest, Converter};
pub use voice::{Voice, VOICE_CATALOG};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
