use crate::mapping::domain::mute_interval::MuteInterval;

use super::audio_buffer::AudioBuffer;

/// Domain interface for the audio-editing capability.
///
/// Invoked once per recording with the full interval list. The returned
/// buffer must keep the input's duration and format; callers verify this
/// before anything destructive happens downstream.
pub trait AudioEditor: Send + Sync {
    fn apply_mutes(
        &self,
        audio: &AudioBuffer,
        intervals: &[MuteInterval],
    ) -> Result<AudioBuffer, Box<dyn std::error::Error>>;
}
