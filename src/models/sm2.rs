//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates optimal review intervals based on recall quality:
//! - Each item has an ease factor (EF) that adjusts based on performance
//! - Quality grades 0-2: Reset interval and repetitions (item is due again at once)
//! - Quality grades 3-5: Increase interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after every review and has a minimum value of 1.3
//! - Quality itself is derived from correctness and response time, see [`super::quality`]

use super::quality::{estimate_quality, is_passing};
use super::{MIN_EASE_FACTOR, MS_PER_DAY, ReviewItem, Timestamp};

/// Ease factor after a review graded `quality`, floored at 1.3.
pub fn next_ease_factor(ease_factor: f64, quality: u8) -> f64 {
    let q = quality.min(5) as f64;
    let new_ef = ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    new_ef.max(MIN_EASE_FACTOR)
}

/// Applies one graded answer to `item` and returns the updated record.
///
/// The interval growth uses the ease factor the item had before this review;
/// the ease factor is recomputed afterwards, for passing and failing grades alike.
pub fn apply_review(
    item: &ReviewItem,
    correct: bool,
    response_time_ms: u64,
    now: Timestamp,
) -> ReviewItem {
    let quality = estimate_quality(correct, response_time_ms);
    apply_quality(item, quality, correct, response_time_ms, now)
}

/// Same as [`apply_review`] with an already computed quality grade.
pub fn apply_quality(
    item: &ReviewItem,
    quality: u8,
    correct: bool,
    response_time_ms: u64,
    now: Timestamp,
) -> ReviewItem {
    let mut next = item.clone();

    next.total_reviews = item.total_reviews.saturating_add(1);
    if correct {
        next.correct_reviews = item.correct_reviews.saturating_add(1);
    }
    let n = next.total_reviews as f64;
    next.average_response_time =
        (item.average_response_time * (n - 1.0) + response_time_ms as f64) / n;
    next.last_review_date = now;

    if is_passing(quality) {
        next.interval = match item.repetitions {
            0 => 1, // First success: 1 day
            1 => 6, // Second success: 6 days
            _ => (item.interval as f64 * item.ease_factor).round() as u32,
        };
        next.repetitions = item.repetitions.saturating_add(1);
    } else {
        // Lapse: progression starts over, lifetime counters are kept
        next.repetitions = 0;
        next.interval = 0;
    }

    next.ease_factor = next_ease_factor(item.ease_factor, quality);
    next.next_review_date = now.saturating_add(next.interval as i64 * MS_PER_DAY);

    next
}
