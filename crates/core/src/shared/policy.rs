use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::TriggerCategory;

pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 15;
pub const DEFAULT_PADDING_SECS: f64 = 0.5;
pub const DEFAULT_DOB_PADDING_SECS: f64 = 0.15;
pub const DEFAULT_MARKER: &str = "[REDACTED]";

/// Which token predicate a category uses to harvest evidence after a
/// keyword hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// Tokens containing digits, or spoken number words.
    Numeric,
    /// Tokens that are entirely digits, or spoken number words.
    DigitRun,
    /// Street-address-shaped tokens: numbers or street suffixes.
    Address,
}

/// Per-category detection and padding policy.
///
/// Window sizes, padding, and keyword lists are configuration data, not
/// mechanism: new categories plug in without touching the detector or
/// the mapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Normalized single-word triggers that open a look-ahead window.
    pub keywords: Vec<String>,
    /// How many words past the keyword to scan for evidence.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Seconds of audio muted before and after the span.
    #[serde(default = "default_padding")]
    pub padding_secs: f64,
    pub evidence: EvidenceKind,
    /// Trim the span to its evidence-matching sub-range before padding.
    /// Used by `dob` to avoid muting the surrounding non-sensitive words.
    #[serde(default)]
    pub trim_to_evidence: bool,
}

fn default_window() -> usize {
    DEFAULT_LOOKAHEAD_WINDOW
}

fn default_padding() -> f64 {
    DEFAULT_PADDING_SECS
}

impl CategoryPolicy {
    fn new(keywords: &[&str], evidence: EvidenceKind) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            window: DEFAULT_LOOKAHEAD_WINDOW,
            padding_secs: DEFAULT_PADDING_SECS,
            evidence,
            trim_to_evidence: false,
        }
    }
}

/// The full redaction configuration: category policies plus the transcript
/// marker and the audio-replacement toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionPolicy {
    pub categories: BTreeMap<TriggerCategory, CategoryPolicy>,
    #[serde(default = "default_marker")]
    pub marker: String,
    /// When false the pipeline sanitizes text only and never touches the
    /// remote recording.
    #[serde(default = "default_replace_remote")]
    pub replace_remote: bool,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_replace_remote() -> bool {
    true
}

impl RedactionPolicy {
    pub fn category(&self, category: TriggerCategory) -> Option<&CategoryPolicy> {
        self.categories.get(&category)
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            TriggerCategory::CardNumber,
            CategoryPolicy::new(&["card"], EvidenceKind::Numeric),
        );
        categories.insert(
            TriggerCategory::Cvv,
            CategoryPolicy::new(&["cvv", "cvc"], EvidenceKind::Numeric),
        );
        categories.insert(
            TriggerCategory::Expiry,
            CategoryPolicy::new(
                &["expiry", "expiration", "expires", "expire"],
                EvidenceKind::Numeric,
            ),
        );
        let mut dob = CategoryPolicy::new(&["birth", "birthday", "dob"], EvidenceKind::DigitRun);
        dob.padding_secs = DEFAULT_DOB_PADDING_SECS;
        dob.trim_to_evidence = true;
        categories.insert(TriggerCategory::Dob, dob);
        categories.insert(
            TriggerCategory::Credential,
            CategoryPolicy::new(&["password", "passcode", "pin"], EvidenceKind::Numeric),
        );
        categories.insert(
            TriggerCategory::Address,
            CategoryPolicy::new(&["address"], EvidenceKind::Address),
        );

        Self {
            categories,
            marker: default_marker(),
            replace_remote: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_policy_covers_every_category() {
        let policy = RedactionPolicy::default();
        for category in TriggerCategory::ALL {
            assert!(
                policy.category(*category).is_some(),
                "missing policy for {category}"
            );
        }
    }

    #[test]
    fn test_dob_is_tighter_than_generic() {
        let policy = RedactionPolicy::default();
        let dob = policy.category(TriggerCategory::Dob).unwrap();
        let card = policy.category(TriggerCategory::CardNumber).unwrap();
        assert!(dob.padding_secs < card.padding_secs);
        assert!(dob.trim_to_evidence);
        assert!(!card.trim_to_evidence);
        assert_relative_eq!(dob.padding_secs, 0.15);
        assert_relative_eq!(card.padding_secs, 0.5);
    }

    #[test]
    fn test_policy_round_trips_through_json() {
        let policy = RedactionPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let back: RedactionPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.marker, policy.marker);
        assert_eq!(back.categories.len(), policy.categories.len());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{
            "categories": {
                "card_number": { "keywords": ["card"], "evidence": "numeric" }
            }
        }"#;
        let policy: RedactionPolicy = serde_json::from_str(json).unwrap();
        let card = policy.category(TriggerCategory::CardNumber).unwrap();
        assert_eq!(card.window, DEFAULT_LOOKAHEAD_WINDOW);
        assert_eq!(policy.marker, DEFAULT_MARKER);
        assert!(policy.replace_remote);
    }
}
