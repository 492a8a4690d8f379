//! Praise phrase rotation and the feedback seam.
//!
//! The core never plays sound or buzzes a phone itself. It picks what
//! should happen and hands it to a [`FeedbackSink`]. Sink failures are logged
//! and dropped; they never block a check-in.

use rand::Rng;
use thiserror::Error;

use crate::streak::Milestone;

/// Vibration length for one press.
pub const HAPTIC_PULSE_MS: u32 = 200;

#[derive(Error, Debug)]
#[error("{channel} feedback failed: {message}")]
pub struct FeedbackError {
    pub channel: &'static str,
    pub message: String,
}

impl FeedbackError {
    pub fn new(channel: &'static str, message: impl Into<String>) -> Self {
        Self {
            channel,
            message: message.into(),
        }
    }
}

/// Output device for praise. Implemented by each front-end.
pub trait FeedbackSink {
    fn play_phrase(&mut self, phrase: &str) -> Result<(), FeedbackError>;

    fn vibrate(&mut self, millis: u32) -> Result<(), FeedbackError>;

    fn celebrate(&mut self, _milestone: Milestone, _message: &str) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Sink that drops everything. Useful for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl FeedbackSink for SilentSink {
    fn play_phrase(&mut self, _phrase: &str) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn vibrate(&mut self, _millis: u32) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Pick the next phrase index, never repeating `last` when there is a choice.
///
/// Returns `None` when there are no phrases.
pub fn pick_phrase<R: Rng + ?Sized>(count: usize, last: Option<usize>, rng: &mut R) -> Option<usize> {
    match count {
        0 => None,
        1 => Some(0),
        _ => match last.filter(|&l| l < count) {
            None => Some(rng.gen_range(0..count)),
            Some(last) => {
                let pick = rng.gen_range(0..count - 1);
                Some(if pick >= last { pick + 1 } else { pick })
            }
        },
    }
}

/// What a single press asks the front-end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Praise {
    pub phrase: Option<String>,
    pub haptics: bool,
    pub milestone: Option<(Milestone, String)>,
}

impl Praise {
    /// Hand the praise to `sink`. Failures are logged, never returned.
    pub fn deliver(&self, sink: &mut dyn FeedbackSink) {
        if let Some(phrase) = &self.phrase {
            if let Err(e) = sink.play_phrase(phrase) {
                tracing::warn!(error = %e, phrase, "audio playback failed");
            }
        }
        if self.haptics {
            if let Err(e) = sink.vibrate(HAPTIC_PULSE_MS) {
                tracing::warn!(error = %e, "vibration failed");
            }
        }
        if let Some((milestone, message)) = &self.milestone {
            if let Err(e) = sink.celebrate(*milestone, message) {
                tracing::warn!(error = %e, "milestone celebration failed");
            }
        }
    }
}
