use serde::{Deserialize, Serialize};

/// Category of sensitive disclosure a keyword hit belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    CardNumber,
    Cvv,
    Expiry,
    Dob,
    Credential,
    Address,
}

impl TriggerCategory {
    pub const ALL: &[TriggerCategory] = &[
        TriggerCategory::CardNumber,
        TriggerCategory::Cvv,
        TriggerCategory::Expiry,
        TriggerCategory::Dob,
        TriggerCategory::Credential,
        TriggerCategory::Address,
    ];
}

impl std::fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerCategory::CardNumber => write!(f, "card_number"),
            TriggerCategory::Cvv => write!(f, "cvv"),
            TriggerCategory::Expiry => write!(f, "expiry"),
            TriggerCategory::Dob => write!(f, "dob"),
            TriggerCategory::Credential => write!(f, "credential"),
            TriggerCategory::Address => write!(f, "address"),
        }
    }
}
