use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::recording_writer::RecordingWriter;

/// Encodes buffers as 16-bit PCM WAV via hound.
///
/// Sample rate, channel count, and sample count pass through unchanged,
/// so the written file's playable duration equals the buffer's exactly.
pub struct WavRecordingWriter;

impl RecordingWriter for WavRecordingWriter {
    fn write(&self, path: &Path, audio: &AudioBuffer) -> Result<(), Box<dyn std::error::Error>> {
        let spec = WavSpec {
            channels: audio.channels(),
            sample_rate: audio.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for sample in audio.samples() {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
        log::debug!("wrote {} samples to {}", audio.samples().len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_written_duration_matches_buffer() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.wav");
        let audio = AudioBuffer::new(vec![0.1; 16000], 16000, 1);

        WavRecordingWriter.write(&path, &audio).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let duration = reader.duration() as f64 / reader.spec().sample_rate as f64;
        assert_relative_eq!(duration, 1.0);
    }

    #[test]
    fn test_out_of_range_samples_clamped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hot.wav");
        let audio = AudioBuffer::new(vec![2.0, -2.0], 8000, 1);

        WavRecordingWriter.write(&path, &audio).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(samples[1], -i16::MAX);
    }

    #[test]
    fn test_stereo_spec_preserved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stereo.wav");
        let audio = AudioBuffer::new(vec![0.0; 400], 44100, 2);

        WavRecordingWriter.write(&path, &audio).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 44100);
    }
}
