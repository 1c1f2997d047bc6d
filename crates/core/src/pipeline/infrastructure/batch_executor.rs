use std::sync::Arc;

use crate::pipeline::redact_recording_use_case::{
    RedactRecordingUseCase, RedactionOutcome, RedactionRequest,
};
use crate::pipeline::redaction_error::RedactionError;

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// One recording's result from a batch run.
pub struct BatchResult {
    pub recording_id: String,
    pub result: Result<RedactionOutcome, RedactionError>,
}

/// Runs the redaction pipeline for many recordings concurrently.
///
/// Recordings are independent units of work: a worker pool drains a
/// bounded queue, and one recording's failure never aborts its siblings.
/// Same-target serialization is handled below this layer by the
/// replacement workflow's single-flight locks.
pub struct BatchExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl BatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn execute(
        &self,
        use_case: Arc<RedactRecordingUseCase>,
        requests: Vec<RedactionRequest>,
    ) -> Vec<BatchResult> {
        let expected = requests.len();
        let (task_tx, task_rx) = crossbeam_channel::bounded::<RedactionRequest>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<BatchResult>();

        let mut handles = Vec::with_capacity(self.workers);
        for _ in 0..self.workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let use_case = Arc::clone(&use_case);
            handles.push(std::thread::spawn(move || {
                for request in task_rx {
                    let recording_id = request.recording_id.clone();
                    let result = use_case.execute(&request);
                    if result_tx
                        .send(BatchResult {
                            recording_id,
                            result,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            }));
        }
        drop(task_rx);
        drop(result_tx);

        for request in requests {
            if task_tx.send(request).is_err() {
                break;
            }
        }
        drop(task_tx);

        let results: Vec<BatchResult> = result_rx.iter().collect();
        for handle in handles {
            let _ = handle.join();
        }
        debug_assert_eq!(results.len(), expected);
        results
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use crate::audio::domain::audio_buffer::AudioBuffer;
    use crate::audio::domain::audio_redactor::AudioRedactor;
    use crate::audio::domain::recording_reader::RecordingReader;
    use crate::audio::infrastructure::sample_mute_editor::SampleMuteEditor;
    use crate::audio::infrastructure::wav_recording_writer::WavRecordingWriter;
    use crate::record::domain::record_store::RecordStore;
    use crate::record::domain::redaction_record::RedactionStatus;
    use crate::record::infrastructure::json_record_store::JsonRecordStore;
    use crate::remote::domain::remote_store::RemoteStore;
    use crate::remote::domain::single_flight::PathLocks;
    use crate::remote::infrastructure::fs_remote_store::FsRemoteStore;
    use crate::shared::policy::RedactionPolicy;
    use crate::shared::transcript::TranscriptWord;
    use tempfile::TempDir;

    struct FixedReader;

    impl RecordingReader for FixedReader {
        fn read(&self, _path: &Path) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
            Ok(AudioBuffer::new(vec![0.5; 160_000], 16000, 1))
        }
    }

    fn words(text: &str) -> Vec<TranscriptWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| TranscriptWord {
                text: w.to_string(),
                start_time: i as f64 * 0.5,
                end_time: i as f64 * 0.5 + 0.4,
            })
            .collect()
    }

    fn request(id: &str, text: &str) -> RedactionRequest {
        RedactionRequest {
            recording_id: id.to_string(),
            transcript_text: text.to_string(),
            words: words(text),
            audio_path: PathBuf::from(format!("/tmp/{id}.wav")),
            remote_path: Some(format!("calls/{id}.wav")),
        }
    }

    fn use_case(remote_root: &Path, records_dir: &Path) -> Arc<RedactRecordingUseCase> {
        Arc::new(RedactRecordingUseCase::new(
            RedactionPolicy::default(),
            AudioRedactor::new(Box::new(SampleMuteEditor)),
            Box::new(FixedReader),
            Box::new(WavRecordingWriter),
            Some(Box::new(FsRemoteStore::new(remote_root))),
            Box::new(JsonRecordStore::new(records_dir)),
            PathLocks::new(),
        ))
    }

    #[test]
    fn test_processes_every_recording() {
        let remote = TempDir::new().unwrap();
        let records = TempDir::new().unwrap();
        let store = FsRemoteStore::new(remote.path());
        for id in ["rec-1", "rec-2", "rec-3"] {
            store.upload(&format!("calls/{id}.wav"), b"original").unwrap();
        }

        let requests = vec![
            request("rec-1", "my card number is 4532 thanks"),
            request("rec-2", "thanks for calling"),
            request("rec-3", "my pin is 9910 yes"),
        ];
        let results =
            BatchExecutor::new(3).execute(use_case(remote.path(), records.path()), requests);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.result.is_ok()));
    }

    #[test]
    fn test_one_failure_never_aborts_siblings() {
        let remote = TempDir::new().unwrap();
        let records = TempDir::new().unwrap();
        let store = FsRemoteStore::new(remote.path());
        store.upload("calls/good.wav", b"original").unwrap();

        let mut bad = request("bad", "my card number is 4532");
        bad.words[0].start_time = f64::NAN;
        let requests = vec![bad, request("good", "my card number is 4532 thanks")];

        let results =
            BatchExecutor::new(2).execute(use_case(remote.path(), records.path()), requests);

        assert_eq!(results.len(), 2);
        let good = results
            .iter()
            .find(|r| r.recording_id == "good")
            .unwrap();
        let outcome = good.result.as_ref().unwrap();
        assert_eq!(outcome.record.status, RedactionStatus::Completed);
        let bad = results.iter().find(|r| r.recording_id == "bad").unwrap();
        assert!(bad.result.is_err());
    }

    #[test]
    fn test_records_persisted_per_recording() {
        let remote = TempDir::new().unwrap();
        let records = TempDir::new().unwrap();
        let store = FsRemoteStore::new(remote.path());
        store.upload("calls/rec-1.wav", b"original").unwrap();

        let requests = vec![
            request("rec-1", "my card number is 4532 thanks"),
            request("rec-2", "no triggers here"),
        ];
        BatchExecutor::default().execute(use_case(remote.path(), records.path()), requests);

        let record_store = JsonRecordStore::new(records.path());
        assert_eq!(
            record_store.load("rec-1").unwrap().unwrap().status,
            RedactionStatus::Completed
        );
        assert_eq!(
            record_store.load("rec-2").unwrap().unwrap().status,
            RedactionStatus::NotNeeded
        );
    }

    #[test]
    fn test_empty_batch_returns_empty() {
        let remote = TempDir::new().unwrap();
        let records = TempDir::new().unwrap();
        let results = BatchExecutor::default()
            .execute(use_case(remote.path(), records.path()), Vec::new());
        assert!(results.is_empty());
    }
}
