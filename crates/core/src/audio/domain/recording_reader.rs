use std::path::Path;

use super::audio_buffer::AudioBuffer;

/// Domain interface for decoding a call recording from disk.
pub trait RecordingReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<AudioBuffer, Box<dyn std::error::Error>>;
}
