use crate::detection::domain::detection_span::DetectionSpan;
use crate::shared::policy::{EvidenceKind, RedactionPolicy};
use crate::shared::transcript::{TranscriptError, TranscriptWord};

use super::mute_interval::MuteInterval;

/// Converts word-index spans into the canonical mute-interval list.
///
/// Each span maps to `[words[start].start_time, words[end].end_time]`,
/// padded per its category's policy and clipped to the audio bounds.
/// The result is sorted and merged, so it is non-overlapping. The same
/// list feeds both the audio redactor and the persisted audit segments.
pub struct TimeSpanMapper;

impl TimeSpanMapper {
    pub fn map(
        spans: &[DetectionSpan],
        words: &[TranscriptWord],
        audio_duration: f64,
        policy: &RedactionPolicy,
    ) -> Result<Vec<MuteInterval>, TranscriptError> {
        let mut intervals = Vec::with_capacity(spans.len());

        for span in spans {
            if span.word_end >= words.len() {
                return Err(TranscriptError::SpanOutOfRange {
                    index: span.word_end,
                    len: words.len(),
                });
            }

            let Some(policy) = policy.category(span.category) else {
                log::warn!("no policy for category {}, dropping span", span.category);
                continue;
            };

            let (start_idx, end_idx) = if policy.trim_to_evidence {
                match trim_to_evidence(span, words, policy.evidence) {
                    Some(range) => range,
                    None => continue,
                }
            } else {
                (span.word_start, span.word_end)
            };

            let start = (words[start_idx].start_time - policy.padding_secs).max(0.0);
            let end = (words[end_idx].end_time + policy.padding_secs).min(audio_duration);
            if start >= end {
                continue;
            }
            intervals.push(MuteInterval::new(start, end, span.category));
        }

        intervals.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(MuteInterval::merge_sorted(intervals))
    }
}

/// Shrink a span to its evidence-matching sub-range, discarding the
/// leading and trailing words that matched only the keyword context.
fn trim_to_evidence(
    span: &DetectionSpan,
    words: &[TranscriptWord],
    evidence: EvidenceKind,
) -> Option<(usize, usize)> {
    let start = (span.word_start..=span.word_end).find(|&i| evidence.matches(&words[i].text))?;
    let end = (span.word_start..=span.word_end).rfind(|&i| evidence.matches(&words[i].text))?;
    Some((start, end))
}
