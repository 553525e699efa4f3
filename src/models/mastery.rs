//! Mastery classification. Always derived from the raw counters of an item so
//! that changing thresholds takes effect immediately.
use serde::{Deserialize, Serialize};

use super::ReviewItem;
use crate::error::{Result, SrsError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasteryStatus {
    NotStarted,
    Learning,
    Mastered,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasteryThresholds {
    pub min_reviews: u32,
    pub min_accuracy_percent: f64,
    pub min_interval_days: u32,
}

impl Default for MasteryThresholds {
    fn default() -> Self {
        Self {
            min_reviews: 5,
            min_accuracy_percent: 80.0,
            min_interval_days: 7,
        }
    }
}

impl MasteryThresholds {
    /// Rejects zero or out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.min_reviews == 0 {
            return Err(SrsError::InvalidThreshold {
                name: "min_reviews",
                value: self.min_reviews as f64,
            });
        }
        if !(self.min_accuracy_percent > 0.0 && self.min_accuracy_percent <= 100.0) {
            return Err(SrsError::InvalidThreshold {
                name: "min_accuracy_percent",
                value: self.min_accuracy_percent,
            });
        }
        if self.min_interval_days == 0 {
            return Err(SrsError::InvalidThreshold {
                name: "min_interval_days",
                value: self.min_interval_days as f64,
            });
        }
        Ok(())
    }

    pub fn is_mastered(&self, item: &ReviewItem) -> bool {
        item.total_reviews >= self.min_reviews
            && item.accuracy() >= self.min_accuracy_percent / 100.0
            && item.interval >= self.min_interval_days
    }

    pub fn is_learning(&self, item: &ReviewItem) -> bool {
        item.total_reviews > 0 && !self.is_mastered(item)
    }

    pub fn status(&self, item: &ReviewItem) -> MasteryStatus {
        if item.total_reviews == 0 {
            MasteryStatus::NotStarted
        } else if self.is_mastered(item) {
            MasteryStatus::Mastered
        } else {
            MasteryStatus::Learning
        }
    }
}

pub fn is_mastered(item: &ReviewItem, thresholds: &MasteryThresholds) -> bool {
    thresholds.is_mastered(item)
}

pub fn is_learning(item: &ReviewItem, thresholds: &MasteryThresholds) -> bool {
    thresholds.is_learning(item)
}
