//! Sensitive-data detection and redaction for call recordings.
//!
//! Scans word-timestamped transcripts for payment-card, CVV/expiry,
//! date-of-birth, credential, and address disclosures, silences the
//! matching time ranges in the recording without changing its duration,
//! sanitizes the transcript for downstream analysis, and can replace the
//! authoritative remote copy of a recording with the redacted one.

pub mod audio;
pub mod detection;
pub mod mapping;
pub mod pipeline;
pub mod record;
pub mod remote;
pub mod sanitize;
pub mod shared;
