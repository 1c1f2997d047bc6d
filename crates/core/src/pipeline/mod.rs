pub mod infrastructure;
pub mod redact_recording_use_case;
pub mod redaction_error;
