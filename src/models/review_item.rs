//! Scheduling state of a single learnable fact.
use serde::{Deserialize, Serialize};

use super::ItemType;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

pub const MS_PER_DAY: i64 = 86_400_000;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    pub item_type: ItemType,
    pub ease_factor: f64,
    /// Days until the next exposure, 0 means due immediately.
    pub interval: u32,
    /// Consecutive reviews with quality >= 3 since the last lapse.
    pub repetitions: u32,
    pub next_review_date: Timestamp,
    /// 0 until the first review.
    pub last_review_date: Timestamp,
    pub total_reviews: u32,
    pub correct_reviews: u32,
    /// Running mean of response latency in milliseconds.
    pub average_response_time: f64,
}

impl ReviewItem {
    /// Default state for an item that has never been reviewed; due at `now`.
    pub fn new(id: impl Into<String>, item_type: ItemType, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            item_type,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: now,
            last_review_date: 0,
            total_reviews: 0,
            correct_reviews: 0,
            average_response_time: 0.0,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_date <= now
    }

    pub fn is_new(&self) -> bool {
        self.total_reviews == 0
    }

    /// Lifetime accuracy as a fraction in [0, 1]; 0 when never reviewed.
    pub fn accuracy(&self) -> f64 {
        if self.total_reviews == 0 {
            return 0.0;
        }
        self.correct_reviews as f64 / self.total_reviews as f64
    }

    /// Checks the record invariants. Used on data coming from outside the engine.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.ease_factor >= MIN_EASE_FACTOR) {
            return Err(format!(
                "ease factor {} is below {}",
                self.ease_factor, MIN_EASE_FACTOR
            ));
        }
        if self.correct_reviews > self.total_reviews {
            return Err(format!(
                "{} correct reviews out of {} total",
                self.correct_reviews, self.total_reviews
            ));
        }
        if !self.average_response_time.is_finite() || self.average_response_time < 0.0 {
            return Err(format!(
                "average response time {} is not a valid duration",
                self.average_response_time
            ));
        }
        Ok(())
    }
}
