use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single transcribed word with its time range in the recording.
///
/// Produced by the transcription collaborator; immutable input to the
/// redaction pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TranscriptWord {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Transcript payload as delivered by the transcription provider:
/// the full text plus the ordered word sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub text: String,
    pub words: Vec<TranscriptWord>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    #[error("word {index} ({text:?}) has a non-finite timestamp")]
    NonFinite { index: usize, text: String },
    #[error("word {index} ({text:?}) has a negative timestamp")]
    Negative { index: usize, text: String },
    #[error("word {index} ({text:?}) ends at {end} before it starts at {start}")]
    Inverted {
        index: usize,
        text: String,
        start: f64,
        end: f64,
    },
    #[error("word {index} ({text:?}) starts before word {prev}")]
    NonMonotonic {
        index: usize,
        prev: usize,
        text: String,
    },
    #[error("span references word {index} but the transcript has {len} words")]
    SpanOutOfRange { index: usize, len: usize },
}

/// Reject malformed word timestamps up front.
///
/// Timestamps are never guessed or repaired: a transcript that fails here
/// skips redaction entirely and the recording is marked failed.
pub fn validate_words(words: &[TranscriptWord]) -> Result<(), TranscriptError> {
    let mut prev_start: Option<(usize, f64)> = None;
    for (index, word) in words.iter().enumerate() {
        if !word.start_time.is_finite() || !word.end_time.is_finite() {
            return Err(TranscriptError::NonFinite {
                index,
                text: word.text.clone(),
            });
        }
        if word.start_time < 0.0 || word.end_time < 0.0 {
            return Err(TranscriptError::Negative {
                index,
                text: word.text.clone(),
            });
        }
        if word.end_time < word.start_time {
            return Err(TranscriptError::Inverted {
                index,
                text: word.text.clone(),
                start: word.start_time,
                end: word.end_time,
            });
        }
        if let Some((prev, start)) = prev_start {
            if word.start_time < start {
                return Err(TranscriptError::NonMonotonic {
                    index,
                    prev,
                    text: word.text.clone(),
                });
            }
        }
        prev_start = Some((index, word.start_time));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            text: text.to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_empty_transcript_is_valid() {
        assert!(validate_words(&[]).is_ok());
    }

    #[test]
    fn test_ordered_words_are_valid() {
        let words = vec![word("my", 0.0, 0.3), word("card", 0.3, 0.6)];
        assert!(validate_words(&words).is_ok());
    }

    #[test]
    fn test_nan_timestamp_rejected() {
        let words = vec![word("my", f64::NAN, 0.3)];
        assert!(matches!(
            validate_words(&words),
            Err(TranscriptError::NonFinite { index: 0, .. })
        ));
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let words = vec![word("my", -0.1, 0.3)];
        assert!(matches!(
            validate_words(&words),
            Err(TranscriptError::Negative { index: 0, .. })
        ));
    }

    #[test]
    fn test_inverted_word_rejected() {
        let words = vec![word("my", 0.5, 0.2)];
        assert!(matches!(
            validate_words(&words),
            Err(TranscriptError::Inverted { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_monotonic_start_rejected() {
        let words = vec![word("my", 1.0, 1.3), word("card", 0.5, 0.8)];
        assert!(matches!(
            validate_words(&words),
            Err(TranscriptError::NonMonotonic { index: 1, prev: 0, .. })
        ));
    }

    #[test]
    fn test_equal_starts_are_allowed() {
        let words = vec![word("uh", 1.0, 1.0), word("huh", 1.0, 1.2)];
        assert!(validate_words(&words).is_ok());
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let doc = TranscriptDocument {
            text: "my card".to_string(),
            words: vec![word("my", 0.0, 0.3), word("card", 0.3, 0.6)],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let back: TranscriptDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
