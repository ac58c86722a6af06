//! Playable audio resources and the stores that back them.
//!
//! A [`PlayableAudio`] owns exactly one local resource and releases it once,
//! either explicitly via [`PlayableAudio::release`] or when dropped.

mod store;

pub use store::{AudioStore, FileAudioStore, MemoryAudioStore};

use crate::tts::{AudioFormat, AudioPayload};
use crate::Result;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

pub struct PlayableAudio {
    uri: String,
    format: Option<AudioFormat>,
    size: usize,
    /// `None` once released, and always for remote audio.
    store: Option<Arc<dyn AudioStore>>,
}

impl PlayableAudio {
    /// Register audio bytes with `store` and take ownership of the resulting resource.
    pub fn create(store: Arc<dyn AudioStore>, data: Bytes, format: AudioFormat) -> Result<Self> {
        let size = data.len();
        let uri = store.create(data, format)?;
        Ok(Self {
            uri,
            format: Some(format),
            size,
            store: Some(store),
        })
    }

    /// Server-hosted audio. Nothing local to release.
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            uri: url.into(),
            format: None,
            size: 0,
            store: None,
        }
    }

    pub fn from_payload(store: Arc<dyn AudioStore>, payload: AudioPayload) -> Result<Self> {
        match payload {
            AudioPayload::Audio { data, format } => Self::create(store, data, format),
            AudioPayload::Url(url) => Ok(Self::remote(url)),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_local(&self) -> bool {
        self.format.is_some()
    }

    pub fn is_released(&self) -> bool {
        self.is_local() && self.store.is_none()
    }

    /// Read the bytes back. `None` for remote or released audio.
    pub fn data(&self) -> Option<Bytes> {
        self.store.as_ref()?.fetch(&self.uri)
    }

    /// Release the underlying resource. Only the first call has an effect.
    pub fn release(&mut self) -> bool {
        match self.store.take() {
            Some(store) => {
                let revoked = store.revoke(&self.uri);
                debug!(uri = %self.uri, revoked, "playable audio released");
                revoked
            }
            None => false,
        }
    }
}

impl Drop for PlayableAudio {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for PlayableAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayableAudio")
            .field("uri", &self.uri)
            .field("format", &self.format)
            .field("size", &self.size)
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent_and_drop_does_not_double_release() {
        let store = Arc::new(MemoryAudioStore::new());
        let mut audio =
            PlayableAudio::create(store.clone(), Bytes::from_static(b"abc"), AudioFormat::Mp3)
                .unwrap();
        assert_eq!(audio.size(), 3);
        assert_eq!(audio.data().as_deref(), Some(&b"abc"[..]));
        assert!(audio.release());
        assert!(!audio.release());
        assert!(audio.is_released());
        drop(audio);
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn drop_releases() {
        let store = Arc::new(MemoryAudioStore::new());
        {
            let _audio =
                PlayableAudio::from_payload(store.clone(), AudioPayload::mp3(&b"x"[..])).unwrap();
            assert_eq!(store.live_count(), 1);
        }
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn remote_audio_has_nothing_to_release() {
        let mut audio = PlayableAudio::remote("https://cdn.example.com/a.mp3");
        assert!(!audio.is_local());
        assert!(audio.data().is_none());
        assert!(!audio.release());
    }
}
