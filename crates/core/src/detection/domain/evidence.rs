use crate::shared::policy::EvidenceKind;

/// Spoken-number vocabulary. Transcription providers frequently spell
/// digits out ("four five three two"), so these count as numeric evidence.
const NUMBER_WORDS: &[&str] = &[
    "zero", "oh", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand",
];

/// Tokens that make a trailing word look like part of a street address.
const STREET_SUFFIXES: &[&str] = &[
    "street", "st", "avenue", "ave", "road", "rd", "drive", "dr", "lane", "ln", "boulevard",
    "blvd", "court", "ct", "way", "place", "pl", "apartment", "apt", "suite", "unit",
];

/// Lowercase a token and strip everything that is not a letter or digit.
///
/// "Card," and "card" normalize identically; "4532." keeps its digits.
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Numeric evidence: anything carrying a digit, or a spoken number word.
/// Partial fragments count; the bias is toward over-detection.
pub fn is_numeric_token(token: &str) -> bool {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return false;
    }
    normalized.chars().any(|c| c.is_ascii_digit()) || NUMBER_WORDS.contains(&normalized.as_str())
}

/// Digit-run evidence: the whole token is digits, or a spoken number word.
/// Stricter than [`is_numeric_token`] so mixed tokens like "19th" don't
/// widen a date-of-birth span.
pub fn is_digit_token(token: &str) -> bool {
    let normalized = normalize(token);
    if normalized.is_empty() {
        return false;
    }
    normalized.chars().all(|c| c.is_ascii_digit()) || NUMBER_WORDS.contains(&normalized.as_str())
}

/// Street-address-shaped evidence: numbers or street suffix words.
pub fn is_address_token(token: &str) -> bool {
    is_numeric_token(token) || STREET_SUFFIXES.contains(&normalize(token).as_str())
}

impl EvidenceKind {
    pub fn matches(&self, token: &str) -> bool {
        match self {
            EvidenceKind::Numeric => is_numeric_token(token),
            EvidenceKind::DigitRun => is_digit_token(token),
            EvidenceKind::Address => is_address_token(token),
        }
    }
}
