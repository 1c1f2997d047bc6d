use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::audio_editor::AudioEditor;
use crate::mapping::domain::mute_interval::MuteInterval;

/// In-process editor that silences mute intervals by zeroing samples.
///
/// Sample count never changes, so duration neutrality holds by
/// construction; regions outside the intervals are untouched.
pub struct SampleMuteEditor;

impl AudioEditor for SampleMuteEditor {
    fn apply_mutes(
        &self,
        audio: &AudioBuffer,
        intervals: &[MuteInterval],
    ) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
        let mut redacted = audio.clone();
        for interval in intervals {
            let (start, end) =
                redacted.frame_aligned_range(interval.start_time, interval.end_time);
            for sample in &mut redacted.samples_mut()[start..end] {
                *sample = 0.0;
            }
        }
        Ok(redacted)
    }
}
