use crate::detection::domain::detection_span::DetectionSpan;
use crate::shared::policy::DEFAULT_MARKER;
use crate::shared::transcript::TranscriptWord;

/// Rewrites the transcript so detected spans never reach downstream
/// consumers.
///
/// Spans are merged by word index first, so no marker is ever emitted
/// inside another marker's range and no partial word is left exposed.
/// Each merged range's source substring is located in the original text
/// by ordered, case-insensitive word matching, preserving all surrounding
/// punctuation and whitespace. A range whose words can no longer be found
/// (because the text was already sanitized) is left untouched, which makes
/// re-application with the same spans a no-op.
pub struct TextSanitizer {
    marker: String,
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl TextSanitizer {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }

    pub fn sanitize(
        &self,
        text: &str,
        words: &[TranscriptWord],
        spans: &[DetectionSpan],
    ) -> String {
        if spans.is_empty() {
            return text.to_string();
        }

        let ranges = merge_word_ranges(spans);
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for (first, last) in ranges {
            let Some(range_words) = words.get(first..=last) else {
                continue;
            };
            match locate_range(text, cursor, range_words) {
                Some((start, end)) => {
                    out.push_str(&text[cursor..start]);
                    out.push_str(&self.marker);
                    cursor = end;
                }
                None => {
                    log::debug!(
                        "span words {first}..={last} not present in transcript, leaving text as-is"
                    );
                }
            }
        }

        out.push_str(&text[cursor..]);
        out
    }
}

/// Collapse overlapping or adjacent word-index ranges so contiguous
/// sensitive words produce a single marker.
fn merge_word_ranges(spans: &[DetectionSpan]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = spans.iter().map(|s| (s.word_start, s.word_end)).collect();
    ranges.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end + 1 => *last_end = (*last_end).max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Find the byte range covering `range_words` in order, starting at
/// `from`. Returns the start of the first word and the end of the last.
fn locate_range(text: &str, from: usize, range_words: &[TranscriptWord]) -> Option<(usize, usize)> {
    let mut cursor = from;
    let mut range_start = None;

    for word in range_words {
        let token = word.text.trim();
        // punctuation-only entries from the transcription provider carry
        // no text to locate
        if token.is_empty() {
            continue;
        }
        let (start, end) = find_word_ci(text, cursor, token)?;
        if range_start.is_none() {
            range_start = Some(start);
        }
        cursor = end;
    }

    range_start.map(|start| (start, cursor))
}

/// Case-insensitive search for `word` at a word boundary, at or after
/// byte offset `from`.
///
/// Byte-wise ASCII comparison keeps the returned offsets valid into the
/// original text regardless of its casing.
fn find_word_ci(text: &str, from: usize, word: &str) -> Option<(usize, usize)> {
    let haystack = text.as_bytes();
    let needle = word.as_bytes();
    if needle.is_empty() || from > haystack.len() {
        return None;
    }

    let mut start = from;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()].eq_ignore_ascii_case(needle) {
            let end = start + needle.len();
            let boundary_before = start == 0 || !haystack[start - 1].is_ascii_alphanumeric();
            let boundary_after = end == haystack.len() || !haystack[end].is_ascii_alphanumeric();
            if boundary_before && boundary_after {
                return Some((start, end));
            }
        }
        start += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::category::TriggerCategory;

    fn words(text: &str) -> Vec<TranscriptWord> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| TranscriptWord {
                text: w.trim_matches(|c: char| !c.is_alphanumeric()).to_string(),
                start_time: i as f64,
                end_time: i as f64 + 0.8,
            })
            .collect()
    }

    fn span(category: TriggerCategory, start: usize, end: usize) -> DetectionSpan {
        DetectionSpan::new(category, start, end)
    }

    #[test]
    fn test_empty_span_list_is_identity() {
        let text = "Thanks for calling, how can I help?";
        let sanitizer = TextSanitizer::default();
        assert_eq!(sanitizer.sanitize(text, &words(text), &[]), text);
    }

    #[test]
    fn test_single_span_replaced_with_marker() {
        let text = "my card number is four five three two thanks";
        let sanitizer = TextSanitizer::default();
        let spans = [span(TriggerCategory::CardNumber, 1, 7)];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "my [REDACTED] thanks"
        );
    }

    #[test]
    fn test_surrounding_punctuation_preserved() {
        let text = "Sure — my card number is 4532, okay?";
        let sanitizer = TextSanitizer::default();
        let spans = [span(TriggerCategory::CardNumber, 3, 6)];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "Sure — my [REDACTED], okay?"
        );
    }

    #[test]
    fn test_overlapping_spans_emit_one_marker() {
        let text = "card 4532 cvv 981 done";
        let sanitizer = TextSanitizer::default();
        let spans = [
            span(TriggerCategory::CardNumber, 0, 3),
            span(TriggerCategory::Cvv, 2, 3),
        ];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "[REDACTED] done"
        );
    }

    #[test]
    fn test_adjacent_spans_emit_one_marker() {
        let text = "card 4532 pin 9910 done";
        let sanitizer = TextSanitizer::default();
        let spans = [
            span(TriggerCategory::CardNumber, 0, 1),
            span(TriggerCategory::Credential, 2, 3),
        ];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "[REDACTED] done"
        );
    }

    #[test]
    fn test_disjoint_spans_emit_separate_markers() {
        let text = "card 4532 and later my pin is 9910 bye";
        let sanitizer = TextSanitizer::default();
        let spans = [
            span(TriggerCategory::CardNumber, 0, 1),
            span(TriggerCategory::Credential, 5, 7),
        ];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "[REDACTED] and later my [REDACTED] bye"
        );
    }

    #[test]
    fn test_idempotent_under_reapplication() {
        let text = "my card number is 4532 thanks";
        let sanitizer = TextSanitizer::default();
        let words = words(text);
        let spans = [span(TriggerCategory::CardNumber, 1, 4)];
        let once = sanitizer.sanitize(text, &words, &spans);
        let twice = sanitizer.sanitize(&once, &words, &spans);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_word_boundary_matching_skips_substrings() {
        // "card" must not match inside "discarded"
        let text = "we discarded it but my card is 4532";
        let sanitizer = TextSanitizer::default();
        let spans = [span(TriggerCategory::CardNumber, 5, 7)];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "we discarded it but my [REDACTED]"
        );
    }

    #[test]
    fn test_case_insensitive_location() {
        let text = "My CARD number is 4532";
        let sanitizer = TextSanitizer::default();
        let spans = [span(TriggerCategory::CardNumber, 1, 4)];
        assert_eq!(
            sanitizer.sanitize(text, &words(text), &spans),
            "My [REDACTED]"
        );
    }

    #[test]
    fn test_custom_marker() {
        let text = "card 4532";
        let sanitizer = TextSanitizer::new("***");
        let spans = [span(TriggerCategory::CardNumber, 0, 1)];
        assert_eq!(sanitizer.sanitize(text, &words(text), &spans), "***");
    }

    #[test]
    fn test_span_past_word_list_leaves_text_unchanged() {
        let text = "card 4532";
        let sanitizer = TextSanitizer::default();
        let spans = [span(TriggerCategory::CardNumber, 0, 10)];
        assert_eq!(sanitizer.sanitize(text, &words(text), &spans), text);
    }

    #[test]
    fn test_merge_word_ranges() {
        let spans = [
            span(TriggerCategory::CardNumber, 5, 9),
            span(TriggerCategory::Cvv, 0, 2),
            span(TriggerCategory::Credential, 2, 4),
        ];
        assert_eq!(merge_word_ranges(&spans), vec![(0, 9)]);
    }
}
