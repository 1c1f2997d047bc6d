use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use callguard_core::audio::domain::audio_redactor::AudioRedactor;
use callguard_core::audio::domain::recording_reader::RecordingReader;
use callguard_core::audio::domain::recording_writer::RecordingWriter;
use callguard_core::audio::infrastructure::sample_mute_editor::SampleMuteEditor;
use callguard_core::audio::infrastructure::wav_recording_reader::WavRecordingReader;
use callguard_core::audio::infrastructure::wav_recording_writer::WavRecordingWriter;
use callguard_core::detection::domain::span_detector::SpanDetector;
use callguard_core::mapping::domain::time_span_mapper::TimeSpanMapper;
use callguard_core::pipeline::redact_recording_use_case::{
    RedactRecordingUseCase, RedactionRequest,
};
use callguard_core::record::domain::record_store::RecordStore;
use callguard_core::record::domain::redaction_record::RedactionRecord;
use callguard_core::record::infrastructure::json_record_store::JsonRecordStore;
use callguard_core::remote::domain::single_flight::PathLocks;
use callguard_core::remote::infrastructure::fs_remote_store::FsRemoteStore;
use callguard_core::sanitize::domain::text_sanitizer::TextSanitizer;
use callguard_core::shared::policy::RedactionPolicy;
use callguard_core::shared::transcript::{validate_words, TranscriptDocument};

/// Sensitive-data detection and redaction for call recordings.
#[derive(Parser)]
#[command(name = "callguard")]
struct Cli {
    /// Input call recording (WAV).
    input: PathBuf,

    /// Transcript JSON with per-word timestamps: {"text": ..., "words": [...]}.
    #[arg(long)]
    transcript: PathBuf,

    /// Write a redacted copy here (leaves the input untouched).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Replace the recording in place under this storage mount instead of
    /// writing a copy.
    #[arg(long)]
    replace_root: Option<PathBuf>,

    /// Recording path relative to --replace-root (defaults to the input
    /// file name).
    #[arg(long)]
    remote_path: Option<String>,

    /// Directory for redaction record documents.
    #[arg(long, default_value = "records")]
    records_dir: PathBuf,

    /// Policy JSON overriding the default keywords/windows/padding.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Recording identity used in records and temp paths (defaults to the
    /// input file stem).
    #[arg(long)]
    recording_id: Option<String>,

    /// Write the sanitized transcript here instead of stdout.
    #[arg(long)]
    sanitized_out: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let policy = load_policy(cli.policy.as_deref())?;
    let document = load_transcript(&cli.transcript)?;
    let recording_id = cli
        .recording_id
        .clone()
        .unwrap_or_else(|| file_stem(&cli.input));

    let sanitized = if let Some(root) = &cli.replace_root {
        run_replace(&cli, policy, document, &recording_id, root)?
    } else {
        run_local(&cli, policy, document, &recording_id)?
    };

    match &cli.sanitized_out {
        Some(path) => {
            fs::write(path, &sanitized)?;
            log::info!("Sanitized transcript written to {}", path.display());
        }
        None => println!("{sanitized}"),
    }

    Ok(())
}

/// In-place replacement against a mounted storage root, through the full
/// pipeline including the staged remote replace protocol.
fn run_replace(
    cli: &Cli,
    policy: RedactionPolicy,
    document: TranscriptDocument,
    recording_id: &str,
    root: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let remote_path = cli
        .remote_path
        .clone()
        .unwrap_or_else(|| file_name(&cli.input));

    let use_case = RedactRecordingUseCase::new(
        policy,
        AudioRedactor::new(Box::new(SampleMuteEditor)),
        Box::new(WavRecordingReader),
        Box::new(WavRecordingWriter),
        Some(Box::new(FsRemoteStore::new(root))),
        Box::new(JsonRecordStore::new(&cli.records_dir)),
        PathLocks::new(),
    );

    let request = RedactionRequest {
        recording_id: recording_id.to_string(),
        transcript_text: document.text,
        words: document.words,
        audio_path: cli.input.clone(),
        remote_path: Some(remote_path),
    };

    let outcome = use_case.execute(&request)?;
    if let Some(failure) = &outcome.failure {
        return Err(format!(
            "redaction failed ({}): {failure}",
            outcome.record.status
        )
        .into());
    }
    log::info!(
        "Recording {recording_id}: {} ({} segment(s) muted)",
        outcome.record.status,
        outcome.record.segments.len()
    );
    Ok(outcome.sanitized_text)
}

/// Local-copy mode: detect, sanitize, and write a redacted WAV next to
/// the original. No remote operation, no deletion.
fn run_local(
    cli: &Cli,
    policy: RedactionPolicy,
    document: TranscriptDocument,
    recording_id: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    validate_words(&document.words)?;

    let records = JsonRecordStore::new(&cli.records_dir);
    let sanitizer = TextSanitizer::new(&policy.marker);
    let detector = SpanDetector::new(policy);

    let spans = detector.detect(&document.words);
    if spans.is_empty() {
        log::info!("No sensitive spans detected in {recording_id}");
        records.save(&RedactionRecord::not_needed(recording_id))?;
        return Ok(document.text);
    }

    let sanitized = sanitizer.sanitize(&document.text, &document.words, &spans);
    let mut record = RedactionRecord::processing(recording_id);
    records.save(&record)?;

    let audio = WavRecordingReader.read(&cli.input)?;
    let intervals = TimeSpanMapper::map(
        &spans,
        &document.words,
        audio.duration_secs(),
        detector.policy(),
    )?;
    record.set_segments(&intervals);

    if let Some(output) = &cli.output {
        let redactor = AudioRedactor::new(Box::new(SampleMuteEditor));
        let redacted = redactor.redact(&audio, &intervals)?;
        WavRecordingWriter.write(output, &redacted)?;
        log::info!(
            "Redacted copy written to {} ({} segment(s) muted)",
            output.display(),
            intervals.len()
        );
    }

    record.complete(false)?;
    records.save(&record)?;
    Ok(sanitized)
}

fn load_policy(path: Option<&Path>) -> Result<RedactionPolicy, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(RedactionPolicy::default()),
    }
}

fn load_transcript(path: &Path) -> Result<TranscriptDocument, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !cli.transcript.exists() {
        return Err(format!("Transcript not found: {}", cli.transcript.display()).into());
    }
    if cli.output.is_some() && cli.replace_root.is_some() {
        return Err("--output and --replace-root are mutually exclusive".into());
    }
    if cli.remote_path.is_some() && cli.replace_root.is_none() {
        return Err("--remote-path requires --replace-root".into());
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("recording")
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("recording.wav")
        .to_string()
}
