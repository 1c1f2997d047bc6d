use std::path::Path;

use super::audio_buffer::AudioBuffer;

/// Domain interface for encoding a call recording to disk.
pub trait RecordingWriter: Send + Sync {
    fn write(&self, path: &Path, audio: &AudioBuffer) -> Result<(), Box<dyn std::error::Error>>;
}
