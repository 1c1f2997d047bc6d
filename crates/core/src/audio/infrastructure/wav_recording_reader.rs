use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::recording_reader::RecordingReader;

/// Decodes WAV call recordings into normalized f32 buffers via hound.
pub struct WavRecordingReader;

impl RecordingReader for WavRecordingReader {
    fn read(&self, path: &Path) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();
        log::debug!("reading {}: {:?}", path.display(), spec);

        let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
                .collect::<Result<_, _>>()?,
            (SampleFormat::Int, 32) => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
                .collect::<Result<_, _>>()?,
            (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
            (format, bits) => {
                return Err(format!(
                    "unsupported WAV encoding in {}: {format:?}/{bits}-bit",
                    path.display()
                )
                .into())
            }
        };

        Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
    }
}
