use thiserror::Error;

use crate::audio::domain::audio_redactor::AudioToolError;
use crate::remote::domain::replace_workflow::ReplaceError;
use crate::shared::transcript::TranscriptError;

/// Classified failure of one recording's redaction attempt.
///
/// The class determines what an operator may safely do next: everything
/// except `RemotePartialReplace` leaves the original recording intact,
/// and only `Persistence` may be retried without re-running the pipeline.
#[derive(Error, Debug)]
pub enum RedactionError {
    #[error("transcript rejected: {0}")]
    Transcript(#[from] TranscriptError),
    #[error("recording i/o failed: {0}")]
    RecordingIo(String),
    #[error("audio redaction failed: {0}")]
    AudioTool(#[from] AudioToolError),
    #[error("remote transfer failed before the original was deleted: {0}")]
    RemoteTransfer(#[source] ReplaceError),
    #[error("original deleted but replacement incomplete: {0}")]
    RemotePartialReplace(#[source] ReplaceError),
    #[error("failed to persist redaction record: {0}")]
    Persistence(String),
}

impl From<ReplaceError> for RedactionError {
    fn from(error: ReplaceError) -> Self {
        match error {
            ReplaceError::PartialReplace { .. } => RedactionError::RemotePartialReplace(error),
            _ => RedactionError::RemoteTransfer(error),
        }
    }
}

impl RedactionError {
    /// Error text persisted into the redaction record, including the last
    /// completed replacement phase where one applies.
    pub fn record_message(&self) -> String {
        match self {
            RedactionError::RemoteTransfer(e) | RedactionError::RemotePartialReplace(e) => {
                match e.phase_reached() {
                    Some(phase) => format!("{self} (last completed phase: {phase})"),
                    None => self.to_string(),
                }
            }
            _ => self.to_string(),
        }
    }

    /// Whether the original remote recording is known to still exist.
    pub fn original_intact(&self) -> bool {
        match self {
            RedactionError::RemoteTransfer(e) | RedactionError::RemotePartialReplace(e) => {
                e.original_intact()
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_replace_classified_distinctly() {
        let error: RedactionError = ReplaceError::PartialReplace {
            target: "/rec/a.wav".into(),
            temp: "/rec/a.wav.r1.redacted.tmp".into(),
            message: "connection reset".into(),
        }
        .into();
        assert!(matches!(error, RedactionError::RemotePartialReplace(_)));
        assert!(!error.original_intact());
        assert!(error.record_message().contains("deleted_original"));
    }

    #[test]
    fn test_upload_failure_is_ordinary_transfer_class() {
        let error: RedactionError = ReplaceError::Upload {
            temp: "/rec/a.wav.r1.redacted.tmp".into(),
            message: "link down".into(),
        }
        .into();
        assert!(matches!(error, RedactionError::RemoteTransfer(_)));
        assert!(error.original_intact());
    }

    #[test]
    fn test_audio_tool_leaves_original_intact() {
        let error = RedactionError::AudioTool(AudioToolError::EmptyOutput);
        assert!(error.original_intact());
    }
}
