//! Converter view-state: the text being edited, the selected voice, the
//! in-flight flag and the single active [`PlayableAudio`].
//!
//! Transitions:
//!
//! ```text
//! Idle --begin_submit--> Submitting --complete(Ok)--> Succeeded
//!                                   \-complete(Err)-> Failed
//! ```
//!
//! `Succeeded` and `Failed` accept a new submission like `Idle`. A failed
//! conversion keeps the previously active audio; it is released only when a
//! new conversion succeeds, on a playback error, or on teardown.

mod notice;

pub use notice::{Notice, NoticeLevel};

use crate::error::{Error, PLAYBACK_MESSAGE};
use crate::playback::{AudioStore, PlayableAudio};
use crate::tts::{AudioPayload, ConversionRequest, Converter};
use crate::voice::{self, Voice};
use crate::{ErrorContext, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const READY_MESSAGE: &str = "Your audio is ready!";

/// Notices kept for display; older ones are dropped first.
pub const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

pub struct ConverterState {
    text: String,
    max_length: usize,
    voice: &'static Voice,
    phase: Phase,
    active: Option<PlayableAudio>,
    store: Arc<dyn AudioStore>,
    notices: VecDeque<Notice>,
}

impl ConverterState {
    pub fn new(store: Arc<dyn AudioStore>, max_length: usize) -> Self {
        Self {
            text: String::new(),
            max_length: max_length.max(1),
            voice: voice::default_voice(),
            phase: Phase::Idle,
            active: None,
            store,
            notices: VecDeque::with_capacity(MAX_NOTICES),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn voice(&self) -> &'static Voice {
        self.voice
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn active_audio(&self) -> Option<&PlayableAudio> {
        self.active.as_ref()
    }

    /// Recent notices, oldest first. At most [`MAX_NOTICES`].
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// `"<chars> / <max>"`, as shown under the input.
    pub fn char_counter(&self) -> String {
        format!("{} / {}", self.text.chars().count(), self.max_length)
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.text.trim().is_empty()
    }

    /// Replace the input text.
    ///
    /// Edits longer than `max_length` characters are rejected and the previous
    /// text kept. The input is disabled while a submission is in flight.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.is_loading() {
            debug!("text edit ignored while submitting");
            return false;
        }
        let text = text.into();
        if text.chars().count() > self.max_length {
            debug!(max = self.max_length, "text edit exceeds max length");
            return false;
        }
        self.text = text;
        true
    }

    /// Select a voice by catalog id.
    pub fn select_voice(&mut self, id: &str) -> Result<()> {
        let found = voice::find_by_id(id).ok_or_else(|| {
            Error::validation_with_context(
                format!("Unknown voice id: {}", id),
                ErrorContext::new().with_field_path("voice_id"),
            )
        })?;
        self.voice = found;
        Ok(())
    }

    /// Start a submission.
    ///
    /// Returns `Ok(None)` without side effects if one is already in flight,
    /// and a validation error (plus a notice) if the text is blank.
    pub fn begin_submit(&mut self) -> Result<Option<ConversionRequest>> {
        if self.is_loading() {
            debug!("submit ignored: conversion already in flight");
            return Ok(None);
        }
        let request = ConversionRequest::new(&self.text, Some(self.voice.id));
        if request.is_blank() {
            let err = Error::empty_text();
            self.push_notice(Notice::info(err.user_message()));
            return Err(err);
        }
        self.phase = Phase::Submitting;
        info!(voice = self.voice.name, chars = request.text.chars().count(), "submitting conversion");
        Ok(Some(request))
    }

    /// Apply the outcome of the in-flight submission.
    pub fn complete(&mut self, result: Result<AudioPayload>) -> Option<&Notice> {
        if !self.is_loading() {
            warn!("conversion result received with no submission in flight");
            return None;
        }
        let result =
            result.and_then(|payload| PlayableAudio::from_payload(self.store.clone(), payload));
        match result {
            Ok(audio) => {
                info!(uri = audio.uri(), bytes = audio.size(), "audio ready");
                // The new resource exists before the old one goes.
                if let Some(mut previous) = self.active.replace(audio) {
                    previous.release();
                }
                self.phase = Phase::Succeeded;
                self.push_notice(Notice::success(READY_MESSAGE));
            }
            Err(err) => {
                warn!(error = %err, "conversion failed");
                self.phase = Phase::Failed;
                self.push_notice(Notice::error(err.user_message()));
            }
        }
        self.notices.back()
    }

    /// Leave `Submitting` without a result, e.g. when the request was abandoned.
    ///
    /// Prior audio is kept. Returns `false` if nothing was in flight.
    pub fn abort_submit(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        warn!("in-flight conversion abandoned");
        self.phase = Phase::Idle;
        true
    }

    /// Run one full submission against `converter`.
    ///
    /// Returns the notice produced, or `None` if the submit was a no-op.
    /// Dropping the returned future mid-request aborts the submission.
    pub async fn submit<C: Converter + ?Sized>(&mut self, converter: &C) -> Option<&Notice> {
        let request = match self.begin_submit() {
            Ok(Some(request)) => request,
            Ok(None) => return None,
            Err(_) => return self.notices.back(),
        };
        let in_flight = InFlight { state: Some(self) };
        let result = converter.convert(&request).await;
        in_flight.finish()?.complete(result)
    }

    /// The player could not play the active audio: drop it and tell the user.
    pub fn on_playback_error(&mut self) -> bool {
        match self.active.take() {
            Some(mut audio) => {
                warn!(uri = audio.uri(), "playback failed, clearing audio");
                audio.release();
                self.push_notice(Notice::error(PLAYBACK_MESSAGE));
                true
            }
            None => false,
        }
    }

    /// Release everything the view-state owns.
    pub fn teardown(mut self) {
        if let Some(mut audio) = self.active.take() {
            audio.release();
        }
        debug!("converter torn down");
    }
}

/// Resets the converter out of `Submitting` if the submit future is dropped
/// before the response arrives.
struct InFlight<'a> {
    state: Option<&'a mut ConverterState>,
}

impl<'a> InFlight<'a> {
    fn finish(mut self) -> Option<&'a mut ConverterState> {
        self.state.take()
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.abort_submit();
        }
    }
}
