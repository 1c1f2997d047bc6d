use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::audio::domain::audio_buffer::AudioBuffer;
use crate::audio::domain::audio_redactor::AudioRedactor;
use crate::audio::domain::recording_reader::RecordingReader;
use crate::audio::domain::recording_writer::RecordingWriter;
use crate::detection::domain::span_detector::SpanDetector;
use crate::mapping::domain::mute_interval::MuteInterval;
use crate::mapping::domain::time_span_mapper::TimeSpanMapper;
use crate::record::domain::record_store::RecordStore;
use crate::record::domain::redaction_record::RedactionRecord;
use crate::remote::domain::remote_store::RemoteStore;
use crate::remote::domain::replace_workflow::RemoteReplaceWorkflow;
use crate::remote::domain::single_flight::PathLocks;
use crate::sanitize::domain::text_sanitizer::TextSanitizer;
use crate::shared::policy::RedactionPolicy;
use crate::shared::transcript::{validate_words, TranscriptWord};

use super::redaction_error::RedactionError;

const PERSIST_ATTEMPTS: usize = 3;

/// Everything the pipeline needs to process one recording.
pub struct RedactionRequest {
    pub recording_id: String,
    pub transcript_text: String,
    pub words: Vec<TranscriptWord>,
    /// Local working copy of the recording.
    pub audio_path: PathBuf,
    /// Authoritative path on the external storage system, if the
    /// recording lives there.
    pub remote_path: Option<String>,
}

/// Result of one pipeline run.
///
/// The sanitized transcript is always present once spans were detected,
/// even when audio replacement failed: downstream analysis consumes it
/// regardless of the audio outcome. `failure` carries the classified
/// error when the record ended up `failed`.
#[derive(Debug)]
pub struct RedactionOutcome {
    pub sanitized_text: String,
    pub record: RedactionRecord,
    pub failure: Option<RedactionError>,
}

/// Orchestrates the redaction pipeline for a single recording:
/// detect → map → {sanitize, redact} → remote replace, with the
/// redaction record persisted at every phase boundary so a crash leaves
/// an inspectable status rather than silence.
pub struct RedactRecordingUseCase {
    detector: SpanDetector,
    sanitizer: TextSanitizer,
    redactor: AudioRedactor,
    reader: Box<dyn RecordingReader>,
    writer: Box<dyn RecordingWriter>,
    remote: Option<Box<dyn RemoteStore>>,
    records: Box<dyn RecordStore>,
    workflow: RemoteReplaceWorkflow,
}

impl RedactRecordingUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        policy: RedactionPolicy,
        redactor: AudioRedactor,
        reader: Box<dyn RecordingReader>,
        writer: Box<dyn RecordingWriter>,
        remote: Option<Box<dyn RemoteStore>>,
        records: Box<dyn RecordStore>,
        locks: Arc<PathLocks>,
    ) -> Self {
        let sanitizer = TextSanitizer::new(&policy.marker);
        Self {
            detector: SpanDetector::new(policy),
            sanitizer,
            redactor,
            reader,
            writer,
            remote,
            records,
            workflow: RemoteReplaceWorkflow::new(locks),
        }
    }

    pub fn execute(&self, request: &RedactionRequest) -> Result<RedactionOutcome, RedactionError> {
        let id = &request.recording_id;

        if let Err(e) = validate_words(&request.words) {
            let error = RedactionError::Transcript(e);
            self.persist_failure(RedactionRecord::processing(id), &error);
            return Err(error);
        }

        let spans = self.detector.detect(&request.words);
        if spans.is_empty() {
            log::info!("{id}: no sensitive spans detected");
            let record = RedactionRecord::not_needed(id);
            self.save_with_retry(&record)?;
            return Ok(RedactionOutcome {
                sanitized_text: request.transcript_text.clone(),
                record,
                failure: None,
            });
        }

        log::info!("{id}: {} candidate span(s) detected", spans.len());
        let mut record = RedactionRecord::processing(id);
        self.save_with_retry(&record)?;

        // Sanitized text is authoritative from here on, whatever happens
        // to the audio.
        let sanitized_text = self
            .sanitizer
            .sanitize(&request.transcript_text, &request.words, &spans);

        let audio = match self.reader.read(&request.audio_path) {
            Ok(audio) => audio,
            Err(e) => {
                let error = RedactionError::RecordingIo(e.to_string());
                let record = self.persist_failure(record, &error);
                return Ok(RedactionOutcome {
                    sanitized_text,
                    record,
                    failure: Some(error),
                });
            }
        };

        let intervals = match TimeSpanMapper::map(
            &spans,
            &request.words,
            audio.duration_secs(),
            self.detector.policy(),
        ) {
            Ok(intervals) => intervals,
            Err(e) => {
                let error = RedactionError::Transcript(e);
                let record = self.persist_failure(record, &error);
                return Ok(RedactionOutcome {
                    sanitized_text,
                    record,
                    failure: Some(error),
                });
            }
        };
        record.set_segments(&intervals);
        self.save_with_retry(&record)?;

        let replace_target = match (&self.remote, &request.remote_path) {
            (Some(_), Some(target)) if self.detector.policy().replace_remote => Some(target),
            _ => None,
        };

        if let Some(target) = replace_target {
            if let Err(error) = self.replace_remote_audio(&audio, &intervals, target, id) {
                let record = self.persist_failure(record, &error);
                return Ok(RedactionOutcome {
                    sanitized_text,
                    record,
                    failure: Some(error),
                });
            }
            record
                .complete(true)
                .map_err(|e| RedactionError::Persistence(e.to_string()))?;
        } else {
            log::info!("{id}: sanitization-only run, remote audio untouched");
            record
                .complete(false)
                .map_err(|e| RedactionError::Persistence(e.to_string()))?;
        }

        self.save_with_retry(&record)?;
        Ok(RedactionOutcome {
            sanitized_text,
            record,
            failure: None,
        })
    }

    /// Redact the audio and run the staged replacement. The scratch WAV
    /// is scoped to this call and removed on every exit path.
    fn replace_remote_audio(
        &self,
        audio: &AudioBuffer,
        intervals: &[MuteInterval],
        target: &str,
        recording_id: &str,
    ) -> Result<(), RedactionError> {
        let redacted = self.redactor.redact(audio, intervals)?;

        let scratch = tempfile::Builder::new()
            .prefix(&format!("{recording_id}-redacted-"))
            .suffix(".wav")
            .tempfile()
            .map_err(|e| RedactionError::RecordingIo(e.to_string()))?;

        self.writer
            .write(scratch.path(), &redacted)
            .map_err(|e| RedactionError::RecordingIo(e.to_string()))?;
        let bytes =
            fs::read(scratch.path()).map_err(|e| RedactionError::RecordingIo(e.to_string()))?;

        let Some(store) = self.remote.as_deref() else {
            return Err(RedactionError::RecordingIo(
                "no remote store configured".to_string(),
            ));
        };
        self.workflow
            .replace(store, target, &bytes, recording_id)?;
        Ok(())
    }

    /// Mark the record failed with the classified message, persist it,
    /// and hand it back. Persistence problems here are logged, not
    /// raised: the original error must not be masked.
    fn persist_failure(
        &self,
        mut record: RedactionRecord,
        error: &RedactionError,
    ) -> RedactionRecord {
        if !error.original_intact() {
            log::error!(
                "{}: {}; original recording is gone, operator intervention required",
                record.recording_id,
                error.record_message()
            );
        } else {
            log::warn!("{}: {}", record.recording_id, error.record_message());
        }
        if record.fail(&error.record_message()).is_ok() {
            if let Err(e) = self.save_with_retry(&record) {
                log::error!(
                    "{}: could not persist failed record: {e}",
                    record.recording_id
                );
            }
        }
        record
    }

    fn save_with_retry(&self, record: &RedactionRecord) -> Result<(), RedactionError> {
        let mut last_error = String::new();
        for attempt in 1..=PERSIST_ATTEMPTS {
            match self.records.save(record) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    log::warn!(
                        "{}: record save attempt {attempt}/{PERSIST_ATTEMPTS} failed: {e}",
                        record.recording_id
                    );
                    last_error = e.to_string();
                }
            }
        }
        Err(RedactionError::Persistence(last_error))
    }
}
