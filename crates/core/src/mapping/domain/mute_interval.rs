use serde::{Deserialize, Serialize};

use crate::shared::category::TriggerCategory;

/// A time range in the audio signal to be silenced.
///
/// Carries every category that contributed to the range so merged
/// intervals stay auditable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MuteInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub categories: Vec<TriggerCategory>,
}

impl MuteInterval {
    pub fn new(start_time: f64, end_time: f64, category: TriggerCategory) -> Self {
        Self {
            start_time,
            end_time,
            categories: vec![category],
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Merge a sorted-by-start list: any two intervals whose ranges overlap
    /// or touch collapse into one, taking the union of their ranges and
    /// keeping all contributing categories.
    pub fn merge_sorted(intervals: Vec<MuteInterval>) -> Vec<MuteInterval> {
        let mut merged: Vec<MuteInterval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            match merged.last_mut() {
                Some(last) if interval.start_time <= last.end_time => {
                    last.end_time = last.end_time.max(interval.end_time);
                    for category in interval.categories {
                        if !last.categories.contains(&category) {
                            last.categories.push(category);
                        }
                    }
                }
                _ => merged.push(interval),
            }
        }
        merged
    }
}
