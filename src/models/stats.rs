//! Progress reporting per item type, and the unlock gates built on top of it.
use serde::{Deserialize, Serialize};

use super::{ItemType, MasteryStatus, MasteryThresholds, ReviewItem, Timestamp};
use crate::error::{Result, SrsError};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    pub not_started: usize,
    /// Percentage of correct answers across every review in the partition.
    pub overall_accuracy: f64,
    pub due_now: usize,
}

impl StatsSummary {
    pub fn mastery_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.total as f64 * 100.0
    }
}

pub fn compute_stats(
    items: &[ReviewItem],
    thresholds: &MasteryThresholds,
    now: Timestamp,
) -> StatsSummary {
    let mut stats = StatsSummary {
        total: items.len(),
        ..StatsSummary::default()
    };
    let mut total_reviews: u64 = 0;
    let mut correct_reviews: u64 = 0;

    for item in items {
        match thresholds.status(item) {
            MasteryStatus::NotStarted => stats.not_started += 1,
            MasteryStatus::Learning => stats.learning += 1,
            MasteryStatus::Mastered => stats.mastered += 1,
        }

        total_reviews += item.total_reviews as u64;
        correct_reviews += item.correct_reviews as u64;

        if item.is_due(now) {
            stats.due_now += 1;
        }
    }

    stats.overall_accuracy = if total_reviews > 0 {
        correct_reviews as f64 / total_reviews as f64 * 100.0
    } else {
        0.0
    };
    stats
}

/// Mastery percentages at which later item types open up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnlockThresholds {
    pub nouns_at_letter_mastery: f64,
    pub verbs_at_noun_mastery: f64,
}

impl Default for UnlockThresholds {
    fn default() -> Self {
        Self {
            nouns_at_letter_mastery: 80.0,
            verbs_at_noun_mastery: 70.0,
        }
    }
}

impl UnlockThresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("nouns_at_letter_mastery", self.nouns_at_letter_mastery),
            ("verbs_at_noun_mastery", self.verbs_at_noun_mastery),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(SrsError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub letters: StatsSummary,
    pub nouns: StatsSummary,
    pub verbs: StatsSummary,
    pub nouns_unlocked: bool,
    pub verbs_unlocked: bool,
}

impl ProgressReport {
    pub fn new(
        letters: StatsSummary,
        nouns: StatsSummary,
        verbs: StatsSummary,
        unlock: &UnlockThresholds,
    ) -> Self {
        let nouns_unlocked = letters.mastery_percent() >= unlock.nouns_at_letter_mastery;
        let verbs_unlocked =
            nouns_unlocked && nouns.mastery_percent() >= unlock.verbs_at_noun_mastery;
        Self {
            letters,
            nouns,
            verbs,
            nouns_unlocked,
            verbs_unlocked,
        }
    }

    pub fn stats(&self, item_type: ItemType) -> &StatsSummary {
        match item_type {
            ItemType::Letter => &self.letters,
            ItemType::NounEnding => &self.nouns,
            ItemType::VerbEnding => &self.verbs,
        }
    }

    pub fn is_unlocked(&self, item_type: ItemType) -> bool {
        match item_type {
            ItemType::Letter => true,
            ItemType::NounEnding => self.nouns_unlocked,
            ItemType::VerbEnding => self.verbs_unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = 1_000_000;

    fn item(
        id: &str,
        total: u32,
        correct: u32,
        interval: u32,
        next_review_date: Timestamp,
    ) -> ReviewItem {
        let mut item = ReviewItem::new(id, ItemType::Letter, 0);
        item.total_reviews = total;
        item.correct_reviews = correct;
        item.interval = interval;
        item.next_review_date = next_review_date;
        item
    }

    fn summary(total: usize, mastered: usize) -> StatsSummary {
        StatsSummary {
            total,
            mastered,
            not_started: total - mastered,
            ..StatsSummary::default()
        }
    }

    #[test]
    fn test_compute_stats() {
        let items = vec![
            item("a", 0, 0, 0, NOW),
            item("b", 3, 1, 0, NOW - 1),
            item("c", 6, 6, 15, NOW + 1),
            item("d", 1, 1, 1, NOW + 10),
        ];

        let stats = compute_stats(&items, &MasteryThresholds::default(), NOW);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.not_started, 1);
        assert_eq!(stats.learning, 2);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.due_now, 2);
        assert!((stats.overall_accuracy - 80.0).abs() < 1e-9);
        let partitioned = stats.mastered + stats.learning + stats.not_started;
        assert_eq!(stats.total, partitioned);
    }

    #[test]
    fn test_accuracy_without_reviews_is_zero() {
        let items = vec![item("a", 0, 0, 0, NOW), item("b", 0, 0, 0, NOW)];
        let stats = compute_stats(&items, &MasteryThresholds::default(), NOW);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert_eq!(stats.mastery_percent(), 0.0);
    }

    #[test]
    fn test_empty_partition() {
        let stats = compute_stats(&[], &MasteryThresholds::default(), NOW);
        assert_eq!(stats, StatsSummary::default());
        assert_eq!(stats.mastery_percent(), 0.0);
    }

    #[test]
    fn test_unlock_gates() {
        let unlock = UnlockThresholds::default();

        let report = ProgressReport::new(summary(24, 18), summary(40, 40), summary(50, 0), &unlock);
        assert!(!report.nouns_unlocked);
        // verbs stay locked while nouns are locked, whatever the noun mastery
        assert!(!report.verbs_unlocked);
        assert!(report.is_unlocked(ItemType::Letter));

        let report = ProgressReport::new(summary(24, 20), summary(40, 27), summary(50, 0), &unlock);
        assert!(report.nouns_unlocked);
        assert!(!report.verbs_unlocked);

        let report = ProgressReport::new(summary(24, 20), summary(40, 28), summary(50, 0), &unlock);
        assert!(report.is_unlocked(ItemType::VerbEnding));
        assert_eq!(report.stats(ItemType::NounEnding).mastered, 28);
    }

    #[test]
    fn test_unlock_validate() {
        assert!(UnlockThresholds::default().validate().is_ok());
        let bad = UnlockThresholds {
            verbs_at_noun_mastery: 0.0,
            ..UnlockThresholds::default()
        };
        let Err(SrsError::InvalidThreshold { name, .. }) = bad.validate() else {
            panic!("zero verb gate was accepted");
        };
        assert_eq!(name, "verbs_at_noun_mastery");
    }
}
