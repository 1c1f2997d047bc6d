use thiserror::Error;

use crate::mapping::domain::mute_interval::MuteInterval;

use super::audio_buffer::AudioBuffer;
use super::audio_editor::AudioEditor;

/// Maximum allowed drift between original and redacted duration, in
/// seconds. One frame at 8 kHz is 0.125 ms, so this tolerates rounding
/// but not a dropped block.
pub const DURATION_TOLERANCE_SECS: f64 = 0.001;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioToolError {
    #[error("audio editor failed: {0}")]
    Editor(String),
    #[error("audio editor produced empty output")]
    EmptyOutput,
    #[error("redacted duration {actual:.4}s differs from original {expected:.4}s")]
    DurationMismatch { expected: f64, actual: f64 },
    #[error("redacted format {actual_rate}Hz/{actual_channels}ch differs from original {expected_rate}Hz/{expected_channels}ch")]
    FormatMismatch {
        expected_rate: u32,
        expected_channels: u16,
        actual_rate: u32,
        actual_channels: u16,
    },
}

/// Applies the mute list through an [`AudioEditor`] and verifies the
/// result before it can reach anything destructive.
///
/// A buffer that fails verification is never treated as success: the next
/// stage may delete the original recording, so a partially or incorrectly
/// redacted buffer must not leave this component.
pub struct AudioRedactor {
    editor: Box<dyn AudioEditor>,
}

impl AudioRedactor {
    pub fn new(editor: Box<dyn AudioEditor>) -> Self {
        Self { editor }
    }

    pub fn redact(
        &self,
        audio: &AudioBuffer,
        intervals: &[MuteInterval],
    ) -> Result<AudioBuffer, AudioToolError> {
        if intervals.is_empty() {
            return Ok(audio.clone());
        }

        let redacted = self
            .editor
            .apply_mutes(audio, intervals)
            .map_err(|e| AudioToolError::Editor(e.to_string()))?;

        if redacted.is_empty() && !audio.is_empty() {
            return Err(AudioToolError::EmptyOutput);
        }
        if redacted.sample_rate() != audio.sample_rate()
            || redacted.channels() != audio.channels()
        {
            return Err(AudioToolError::FormatMismatch {
                expected_rate: audio.sample_rate(),
                expected_channels: audio.channels(),
                actual_rate: redacted.sample_rate(),
                actual_channels: redacted.channels(),
            });
        }
        let expected = audio.duration_secs();
        let actual = redacted.duration_secs();
        if (expected - actual).abs() > DURATION_TOLERANCE_SECS {
            return Err(AudioToolError::DurationMismatch { expected, actual });
        }

        Ok(redacted)
    }
}
