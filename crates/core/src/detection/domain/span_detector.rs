use crate::shared::policy::RedactionPolicy;
use crate::shared::transcript::TranscriptWord;

use super::detection_span::DetectionSpan;
use super::evidence::normalize;

/// Scans the word sequence for trigger keywords and harvests nearby
/// evidence into candidate spans.
///
/// For each word matching a category's keyword set, a forward window of
/// the next N words is scanned with that category's evidence predicate.
/// The span runs from the keyword through the last matching evidence word;
/// a bare keyword with no evidence in the window emits nothing.
///
/// Spans from separate keyword hits may overlap or touch; they are NOT
/// merged here. Merging happens after time conversion, so it is driven by
/// actual time proximity rather than word-index proximity (which can
/// differ due to pauses).
pub struct SpanDetector {
    policy: RedactionPolicy,
}

impl SpanDetector {
    pub fn new(policy: RedactionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RedactionPolicy {
        &self.policy
    }

    pub fn detect(&self, words: &[TranscriptWord]) -> Vec<DetectionSpan> {
        let mut spans = Vec::new();

        for (index, word) in words.iter().enumerate() {
            let token = normalize(&word.text);
            if token.is_empty() {
                continue;
            }

            for (category, policy) in &self.policy.categories {
                if !policy.keywords.iter().any(|k| k == &token) {
                    continue;
                }

                let window_end = (index + policy.window).min(words.len().saturating_sub(1));
                let last_evidence = (index + 1..=window_end)
                    .filter(|&j| policy.evidence.matches(&words[j].text))
                    .next_back();

                if let Some(end) = last_evidence {
                    log::debug!(
                        "keyword {:?} at word {index} opened a {category} span through word {end}",
                        word.text
                    );
                    spans.push(DetectionSpan::new(*category, index, end));
                }
            }
        }

        spans
    }
}
