use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::domain::mute_interval::MuteInterval;
use crate::shared::category::TriggerCategory;

/// Lifecycle of a recording's redaction.
///
/// Transitions are one-directional: `processing` ends in `completed` or
/// `failed`; `not_needed` is terminal at creation. A terminal record is
/// never silently moved back. Re-redaction is the explicit [`reopen`]
/// operation, never an automatic retry.
///
/// [`reopen`]: RedactionRecord::reopen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionStatus {
    NotNeeded,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for RedactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedactionStatus::NotNeeded => write!(f, "not_needed"),
            RedactionStatus::Processing => write!(f, "processing"),
            RedactionStatus::Completed => write!(f, "completed"),
            RedactionStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid redaction transition from {from} to {to}")]
    InvalidTransition {
        from: RedactionStatus,
        to: RedactionStatus,
    },
}

/// One persisted audit segment: a mute interval plus a readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub categories: Vec<TriggerCategory>,
    pub reason: String,
}

impl From<&MuteInterval> for RedactedSegment {
    fn from(interval: &MuteInterval) -> Self {
        let reason = interval
            .categories
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            start_time: interval.start_time,
            end_time: interval.end_time,
            categories: interval.categories.clone(),
            reason,
        }
    }
}

/// The externally visible redaction state for one recording.
///
/// Created when transcription completes; mutated only by this subsystem;
/// never deleted here (the call record's lifecycle owns deletion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionRecord {
    pub recording_id: String,
    pub status: RedactionStatus,
    /// Whether the remote audio was replaced with the redacted copy.
    pub redacted: bool,
    pub segments: Vec<RedactedSegment>,
    pub redacted_at: Option<String>,
    pub error: Option<String>,
}

impl RedactionRecord {
    /// Terminal record for a recording with no detected spans.
    pub fn not_needed(recording_id: &str) -> Self {
        Self {
            recording_id: recording_id.to_string(),
            status: RedactionStatus::NotNeeded,
            redacted: false,
            segments: Vec::new(),
            redacted_at: None,
            error: None,
        }
    }

    /// Initial record once at least one span was detected.
    pub fn processing(recording_id: &str) -> Self {
        Self {
            recording_id: recording_id.to_string(),
            status: RedactionStatus::Processing,
            redacted: false,
            segments: Vec::new(),
            redacted_at: None,
            error: None,
        }
    }

    pub fn set_segments(&mut self, intervals: &[MuteInterval]) {
        self.segments = intervals.iter().map(RedactedSegment::from).collect();
    }

    /// Finish successfully. `audio_replaced` records whether the remote
    /// copy was swapped or this was a sanitization-only run.
    pub fn complete(&mut self, audio_replaced: bool) -> Result<(), StateError> {
        self.transition(RedactionStatus::Completed)?;
        self.redacted = audio_replaced;
        self.redacted_at = Some(chrono::Utc::now().to_rfc3339());
        self.error = None;
        Ok(())
    }

    /// Finish this attempt as failed, keeping the classified error text.
    pub fn fail(&mut self, error: &str) -> Result<(), StateError> {
        self.transition(RedactionStatus::Failed)?;
        self.error = Some(error.to_string());
        Ok(())
    }

    /// Explicit operator-driven re-redaction of a terminal record. The
    /// pipeline never calls this on its own.
    pub fn reopen(&mut self) -> Result<(), StateError> {
        match self.status {
            RedactionStatus::Completed | RedactionStatus::Failed => {
                self.status = RedactionStatus::Processing;
                self.error = None;
                Ok(())
            }
            from => Err(StateError::InvalidTransition {
                from,
                to: RedactionStatus::Processing,
            }),
        }
    }

    fn transition(&mut self, to: RedactionStatus) -> Result<(), StateError> {
        match (self.status, to) {
            (RedactionStatus::Processing, RedactionStatus::Completed)
            | (RedactionStatus::Processing, RedactionStatus::Failed) => {
                self.status = to;
                Ok(())
            }
            (from, to) => Err(StateError::InvalidTransition { from, to }),
        }
    }
}
