//! Review batch selection: due items first by struggle, unseen items, and a
//! shuffled mix of both.
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::{ReviewItem, Timestamp};

/// Due items ordered by ascending repetitions, then oldest due date first.
pub fn review_queue(
    items: Vec<ReviewItem>,
    now: Timestamp,
    limit: Option<usize>,
) -> Vec<ReviewItem> {
    let mut due: Vec<ReviewItem> = items.into_iter().filter(|item| item.is_due(now)).collect();
    due.sort_by(|a, b| {
        a.repetitions
            .cmp(&b.repetitions)
            .then(a.next_review_date.cmp(&b.next_review_date))
    });
    if let Some(limit) = limit {
        due.truncate(limit);
    }
    due
}

/// Never-reviewed items in the order they were given.
pub fn new_item_queue(items: Vec<ReviewItem>, limit: Option<usize>) -> Vec<ReviewItem> {
    let mut fresh: Vec<ReviewItem> = items.into_iter().filter(ReviewItem::is_new).collect();
    if let Some(limit) = limit {
        fresh.truncate(limit);
    }
    fresh
}

/// Upper bound on new items in a batch of `total_size`.
pub fn max_new_items(total_size: usize, new_item_ratio: f64) -> usize {
    let ratio = if new_item_ratio.is_nan() {
        0.0
    } else {
        new_item_ratio.clamp(0.0, 1.0)
    };
    (total_size as f64 * ratio).floor() as usize
}

/// Combines up to `floor(total_size * new_item_ratio)` new items with due items
/// filling the rest, then shuffles. `due` is expected in priority order.
///
/// Returns fewer than `total_size` items when not enough are available. An item
/// present in both inputs is taken once.
pub fn mixed_queue<R: Rng + ?Sized>(
    due: Vec<ReviewItem>,
    new_items: Vec<ReviewItem>,
    total_size: usize,
    new_item_ratio: f64,
    rng: &mut R,
) -> Vec<ReviewItem> {
    let max_new = max_new_items(total_size, new_item_ratio);

    let mut combined: Vec<ReviewItem> = new_items.into_iter().take(max_new).collect();
    let taken: HashSet<String> = combined.iter().map(|item| item.id.clone()).collect();

    let remaining = total_size - combined.len();
    combined.extend(
        due.into_iter()
            .filter(|item| !taken.contains(&item.id))
            .take(remaining),
    );

    combined.shuffle(rng);
    combined
}
