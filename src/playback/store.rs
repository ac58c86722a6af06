use crate::tts::AudioFormat;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Registry of local audio resources addressed by URI.
///
/// `revoke` must return `true` only for the call that actually released the
/// resource; revoking an unknown or already revoked URI returns `false`.
pub trait AudioStore: Send + Sync {
    fn create(&self, data: Bytes, format: AudioFormat) -> Result<String>;
    fn fetch(&self, uri: &str) -> Option<Bytes>;
    fn revoke(&self, uri: &str) -> bool;
}

/// In-process store handing out `blob:` URIs.
#[derive(Default)]
pub struct MemoryAudioStore {
    entries: Mutex<HashMap<String, Bytes>>,
    revoked: AtomicUsize,
}

impl MemoryAudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resources created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Number of successful revocations so far.
    pub fn revoked_count(&self) -> usize {
        self.revoked.load(Ordering::SeqCst)
    }
}

impl AudioStore for MemoryAudioStore {
    fn create(&self, data: Bytes, _format: AudioFormat) -> Result<String> {
        let uri = format!("blob:speak-it/{}", uuid::Uuid::new_v4());
        let mut entries = self.entries.lock().map_err(|_| {
            Error::playback_with_context(
                "audio store poisoned",
                ErrorContext::new().with_source("memory_audio_store"),
            )
        })?;
        entries.insert(uri.clone(), data);
        debug!(%uri, "audio resource created");
        Ok(uri)
    }

    fn fetch(&self, uri: &str) -> Option<Bytes> {
        self.entries.lock().ok()?.get(uri).cloned()
    }

    fn revoke(&self, uri: &str) -> bool {
        let removed = self
            .entries
            .lock()
            .map(|mut e| e.remove(uri).is_some())
            .unwrap_or(false);
        if removed {
            self.revoked.fetch_add(1, Ordering::SeqCst);
            debug!(%uri, "audio resource revoked");
        }
        removed
    }
}

/// Store that writes each resource to its own file under a directory.
pub struct FileAudioStore {
    dir: PathBuf,
}

impl FileAudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uri: &str) -> Option<PathBuf> {
        let path = PathBuf::from(uri.strip_prefix("file://")?);
        // Only files this store created.
        if path.parent() == Some(self.dir.as_path()) {
            Some(path)
        } else {
            None
        }
    }
}

impl AudioStore for FileAudioStore {
    fn create(&self, data: Bytes, format: AudioFormat) -> Result<String> {
        let path = self
            .dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), format.extension()));
        std::fs::write(&path, &data)?;
        debug!(path = %path.display(), bytes = data.len(), "audio file written");
        Ok(format!("file://{}", path.display()))
    }

    fn fetch(&self, uri: &str) -> Option<Bytes> {
        std::fs::read(self.path_for(uri)?).ok().map(Bytes::from)
    }

    fn revoke(&self, uri: &str) -> bool {
        match self.path_for(uri) {
            Some(path) => std::fs::remove_file(path).is_ok(),
            None => false,
        }
    }
}
