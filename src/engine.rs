//! Scheduling engine over an item store.
//!
//! Owns the store, the configuration and the catalogue. Grading is a
//! read-modify-write of one item and takes `&mut self`, so two reviews can not
//! interleave on the same engine. Time is always passed in by the caller.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::database::ItemStore;
use crate::error::{Result, SrsError};
use crate::models::quality::estimate_quality;
use crate::models::{
    Catalogue, ItemType, MasteryStatus, ProgressReport, ReviewItem, ReviewLog, StatsSummary,
    Timestamp, queue, sm2, stats,
};

pub struct SrsEngine<S: ItemStore> {
    store: S,
    config: EngineConfig,
    catalogue: Catalogue,
}

impl<S: ItemStore> SrsEngine<S> {
    /// Fails with `InvalidThreshold` when the configuration is out of range.
    pub fn new(store: S, config: EngineConfig, catalogue: Catalogue) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            catalogue,
        })
    }

    /// Default configuration over the Greek catalogue.
    pub fn with_defaults(store: S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            catalogue: Catalogue::greek(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Replaces the configuration. Mastery is recomputed from counters on every
    /// query, so new thresholds apply to existing history at once.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Creates default records for the whole catalogue when the store is empty.
    /// Returns the number of records created; a populated store is left untouched.
    pub fn initialize(&mut self, now: Timestamp) -> Result<usize> {
        if !self.store.is_empty()? {
            return Ok(0);
        }
        let items = self.catalogue.default_items(now);
        for item in &items {
            self.store.put(item)?;
        }
        info!(count = items.len(), "Initialized review items");
        Ok(items.len())
    }

    /// Drops all items and history, then recreates the default universe.
    pub fn reset(&mut self, now: Timestamp) -> Result<usize> {
        self.store.clear()?;
        info!("Cleared review items and history");
        self.initialize(now)
    }

    /// Grades one answer for `item_id` and persists the new state with its log entry.
    pub fn grade_review(
        &mut self,
        item_id: &str,
        correct: bool,
        response_time_ms: u64,
        now: Timestamp,
    ) -> Result<ReviewItem> {
        let Some(item) = self.store.get(item_id)? else {
            warn!(item_id, "Graded an unknown item");
            return Err(SrsError::ItemNotFound(item_id.to_string()));
        };

        let quality = estimate_quality(correct, response_time_ms);
        let updated = sm2::apply_quality(&item, quality, correct, response_time_ms, now);
        let log = ReviewLog {
            item_id: updated.id.clone(),
            item_type: updated.item_type,
            correct,
            response_time_ms,
            quality,
            reviewed_at: now,
        };
        self.store.put_reviewed(&updated, &log)?;

        debug!(
            item_id,
            quality,
            interval = updated.interval,
            repetitions = updated.repetitions,
            ease_factor = updated.ease_factor,
            "Review graded"
        );
        Ok(updated)
    }

    fn items(&self, item_type: Option<ItemType>) -> Result<Vec<ReviewItem>> {
        match item_type {
            Some(item_type) => self.store.list_by_type(item_type),
            None => self.store.list_all(),
        }
    }

    /// Due items, struggling ones first, oldest due date breaking ties.
    pub fn build_review_queue(
        &self,
        item_type: Option<ItemType>,
        limit: Option<usize>,
        now: Timestamp,
    ) -> Result<Vec<ReviewItem>> {
        let due = self.store.list_due(item_type, now)?;
        Ok(queue::review_queue(due, now, limit))
    }

    pub fn build_new_item_queue(
        &self,
        item_type: Option<ItemType>,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewItem>> {
        Ok(queue::new_item_queue(self.items(item_type)?, limit))
    }

    pub fn build_mixed_queue_with_rng<R: Rng + ?Sized>(
        &self,
        item_type: Option<ItemType>,
        total_size: usize,
        new_item_ratio: f64,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Vec<ReviewItem>> {
        let due = self.build_review_queue(item_type, None, now)?;
        let new_items = self.build_new_item_queue(item_type, None)?;
        let batch = queue::mixed_queue(due, new_items, total_size, new_item_ratio, rng);
        debug!(
            item_type = item_type.map(ItemType::as_str),
            requested = total_size,
            selected = batch.len(),
            "Built mixed queue"
        );
        Ok(batch)
    }

    pub fn build_mixed_queue(
        &self,
        item_type: Option<ItemType>,
        total_size: usize,
        new_item_ratio: f64,
        now: Timestamp,
    ) -> Result<Vec<ReviewItem>> {
        let mut rng = rand::rng();
        self.build_mixed_queue_with_rng(item_type, total_size, new_item_ratio, now, &mut rng)
    }

    pub fn get_queue(
        &self,
        item_type: Option<ItemType>,
        size: usize,
        new_item_ratio: f64,
        now: Timestamp,
    ) -> Result<Vec<ReviewItem>> {
        self.build_mixed_queue(item_type, size, new_item_ratio, now)
    }

    /// Mixed queue sized by the configured quiz size and new-item ratio.
    pub fn next_batch(
        &self,
        item_type: Option<ItemType>,
        now: Timestamp,
    ) -> Result<Vec<ReviewItem>> {
        let queue = &self.config.queue;
        self.build_mixed_queue(item_type, queue.quiz_size, queue.new_item_ratio, now)
    }

    pub fn get_stats(&self, item_type: ItemType, now: Timestamp) -> Result<StatsSummary> {
        let items = self.store.list_by_type(item_type)?;
        Ok(stats::compute_stats(&items, &self.config.mastery, now))
    }

    /// Stats for every item type and the unlock gates derived from them.
    pub fn progress(&self, now: Timestamp) -> Result<ProgressReport> {
        Ok(ProgressReport::new(
            self.get_stats(ItemType::Letter, now)?,
            self.get_stats(ItemType::NounEnding, now)?,
            self.get_stats(ItemType::VerbEnding, now)?,
            &self.config.unlock,
        ))
    }

    pub fn is_mastered(&self, item: &ReviewItem) -> bool {
        self.config.mastery.is_mastered(item)
    }

    pub fn mastery_status(&self, item: &ReviewItem) -> MasteryStatus {
        self.config.mastery.status(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, SqliteStore};
    use crate::models::{MS_PER_DAY, MasteryThresholds};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    const START: Timestamp = 1_700_000_000_000;

    fn small_catalogue() -> Catalogue {
        Catalogue::new()
            .with_items(ItemType::Letter, ["alpha", "beta", "gamma"])
            .with_items(ItemType::NounEnding, ["1d-eta-nom-s", "1d-eta-gen-s"])
    }

    fn engine() -> SrsEngine<MemoryStore> {
        let config = EngineConfig::default();
        let mut engine = SrsEngine::new(MemoryStore::new(), config, small_catalogue()).unwrap();
        engine.initialize(START).unwrap();
        engine
    }

    fn grade<S: ItemStore>(
        engine: &mut SrsEngine<S>,
        item_id: &str,
        correct: bool,
        response_time_ms: u64,
        now: Timestamp,
    ) -> ReviewItem {
        engine
            .grade_review(item_id, correct, response_time_ms, now)
            .unwrap()
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut engine = SrsEngine::with_defaults(MemoryStore::new());
        assert_eq!(engine.initialize(START).unwrap(), 114);
        assert_eq!(engine.initialize(START + 1).unwrap(), 0);
        assert_eq!(engine.store().len(), 114);

        let alpha = engine.store().get("letter-alpha").unwrap().unwrap();
        assert_eq!(alpha.next_review_date, START);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.mastery = MasteryThresholds {
            min_interval_days: 0,
            ..MasteryThresholds::default()
        };
        let result = SrsEngine::new(MemoryStore::new(), config, small_catalogue());
        assert!(matches!(result, Err(SrsError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_grade_unknown_item() {
        let mut engine = engine();
        let result = engine.grade_review("letter-omega", true, 1_000, START);
        let Err(SrsError::ItemNotFound(id)) = result else {
            panic!("unknown item was graded");
        };
        assert_eq!(id, "letter-omega");
        assert!(engine.store().review_history(None).unwrap().is_empty());
    }

    #[test]
    fn test_grade_review_persists_and_logs() {
        let mut engine = engine();

        let item = grade(&mut engine, "letter-alpha", true, 1_500, START);
        assert_eq!(item.repetitions, 1);
        assert_eq!(item.interval, 1);
        assert!((item.ease_factor - 2.6).abs() < 1e-9);
        let stored = engine.store().get("letter-alpha").unwrap();
        assert_eq!(stored, Some(item.clone()));

        let now = START + MS_PER_DAY;
        let item = grade(&mut engine, "letter-alpha", true, 1_800, now);
        assert_eq!(item.repetitions, 2);
        assert_eq!(item.interval, 6);
        let ease_before_lapse = item.ease_factor;

        let now = now + 6 * MS_PER_DAY;
        let item = grade(&mut engine, "letter-alpha", false, 12_000, now);
        assert_eq!(item.repetitions, 0);
        assert_eq!(item.interval, 0);
        assert!((item.ease_factor - (ease_before_lapse - 0.8)).abs() < 1e-9);
        assert_eq!(item.next_review_date, now);

        let history = engine.store().review_history_for_item(&item.id, None);
        let qualities: Vec<u8> = history.unwrap().iter().map(|log| log.quality).collect();
        assert_eq!(qualities, vec![5, 5, 0]);
    }

    #[test]
    fn test_failed_write_leaves_item_unchanged() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut engine = SrsEngine::new(store, config, small_catalogue()).unwrap();
        engine.initialize(START).unwrap();
        grade(&mut engine, "letter-alpha", true, 1_000, START);
        let before = engine.store().get("letter-alpha").unwrap();

        // the item upsert succeeds, the log insert does not
        let conn = engine.store().connection();
        conn.execute("DROP TABLE review_log", ()).unwrap();

        let later = START + MS_PER_DAY;
        let result = engine.grade_review("letter-alpha", false, 1_000, later);
        assert!(matches!(result, Err(SrsError::Database(_))));
        assert_eq!(engine.store().get("letter-alpha").unwrap(), before);
    }

    #[test]
    fn test_graded_item_leaves_due_queue() {
        let mut engine = engine();
        grade(&mut engine, "letter-beta", true, 1_000, START);

        let letters = Some(ItemType::Letter);
        let due = engine.build_review_queue(letters, None, START).unwrap();
        let ids: Vec<&str> = due.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["letter-alpha", "letter-gamma"]);

        let tomorrow = START + MS_PER_DAY;
        let due = engine.build_review_queue(letters, None, tomorrow).unwrap();
        assert_eq!(due.len(), 3);
    }

    #[test]
    fn test_new_item_queue_per_type() {
        let mut engine = engine();
        grade(&mut engine, "letter-alpha", false, 1_000, START);

        let fresh = engine.build_new_item_queue(Some(ItemType::Letter), None);
        assert_eq!(fresh.unwrap().len(), 2);
        let fresh = engine.build_new_item_queue(None, Some(3)).unwrap();
        assert_eq!(fresh.len(), 3);
        let verbs = engine.build_new_item_queue(Some(ItemType::VerbEnding), None);
        assert!(verbs.unwrap().is_empty());
    }

    #[test]
    fn test_mixed_queue_two_new_eight_due() {
        let keys = (0..22).map(|i| format!("l{i:02}"));
        let catalogue = Catalogue::new().with_items(ItemType::Letter, keys);
        let config = EngineConfig::default();
        let mut engine = SrsEngine::new(MemoryStore::new(), config, catalogue).unwrap();
        engine.initialize(START).unwrap();

        // 20 items reviewed once and due again, 2 never seen
        for i in 0..20 {
            grade(&mut engine, &format!("letter-l{i:02}"), false, 1_000, START);
        }

        let mut rng = StdRng::seed_from_u64(42);
        let batch = engine
            .build_mixed_queue_with_rng(Some(ItemType::Letter), 10, 0.3, START, &mut rng)
            .unwrap();
        assert_eq!(batch.len(), 10);
        assert_eq!(batch.iter().filter(|item| item.is_new()).count(), 2);

        let ids: HashSet<&str> = batch.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
        for id in ids {
            assert!(engine.store().get(id).unwrap().is_some());
        }
    }

    #[test]
    fn test_queue_for_empty_partition() {
        let engine = engine();
        let verbs = Some(ItemType::VerbEnding);
        let batch = engine.get_queue(verbs, 10, 0.3, START).unwrap();
        assert!(batch.is_empty());
        let batch = engine.next_batch(None, START).unwrap();
        assert_eq!(batch.len(), 5);
    }

    #[test]
    fn test_stats_and_progress() {
        let mut engine = engine();
        let stats = engine.get_stats(ItemType::Letter, START).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.not_started, 3);
        assert_eq!(stats.overall_accuracy, 0.0);
        assert_eq!(stats.due_now, 3);

        grade(&mut engine, "letter-alpha", true, 1_000, START);
        grade(&mut engine, "letter-beta", false, 1_000, START);

        let stats = engine.get_stats(ItemType::Letter, START).unwrap();
        assert_eq!(stats.learning, 2);
        assert_eq!(stats.not_started, 1);
        assert!((stats.overall_accuracy - 50.0).abs() < 1e-9);
        assert_eq!(stats.due_now, 2);

        let report = engine.progress(START).unwrap();
        assert!(!report.nouns_unlocked);
        assert!(!report.verbs_unlocked);
        assert_eq!(report.nouns.total, 2);
    }

    #[test]
    fn test_reaching_mastery_unlocks_nouns() {
        let catalogue = Catalogue::new().with_items(ItemType::Letter, ["alpha"]);
        let config = EngineConfig::default();
        let mut engine = SrsEngine::new(MemoryStore::new(), config, catalogue).unwrap();
        engine.initialize(START).unwrap();

        // five fast correct answers, each on its due date
        let mut now = START;
        for _ in 0..5 {
            now = grade(&mut engine, "letter-alpha", true, 1_000, now).next_review_date;
        }

        let item = engine.store().get("letter-alpha").unwrap().unwrap();
        assert!(engine.is_mastered(&item));
        assert_eq!(engine.mastery_status(&item), MasteryStatus::Mastered);
        assert!(engine.progress(now).unwrap().nouns_unlocked);

        // stricter thresholds reclassify the same history
        let mut config = EngineConfig::default();
        config.mastery.min_reviews = 6;
        engine.set_config(config).unwrap();
        assert!(!engine.is_mastered(&item));
        assert!(!engine.progress(now).unwrap().nouns_unlocked);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut engine = engine();
        grade(&mut engine, "letter-alpha", true, 1_000, START);

        let later = START + 3 * MS_PER_DAY;
        assert_eq!(engine.reset(later).unwrap(), 5);

        let alpha = engine.store().get("letter-alpha").unwrap().unwrap();
        assert!(alpha.is_new());
        assert_eq!(alpha.next_review_date, later);
        assert!(engine.store().review_history(None).unwrap().is_empty());
    }

    #[test]
    fn test_engine_over_sqlite() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut engine = SrsEngine::new(store, config, small_catalogue()).unwrap();
        assert_eq!(engine.initialize(START).unwrap(), 5);

        let item = grade(&mut engine, "noun-1d-eta-gen-s", true, 3_000, START);
        assert_eq!(item.interval, 1);
        let stored = engine.store().get("noun-1d-eta-gen-s").unwrap();
        assert_eq!(stored, Some(item));

        let stats = engine.get_stats(ItemType::NounEnding, START).unwrap();
        assert_eq!(stats.learning, 1);
        assert_eq!(stats.due_now, 1);
        assert_eq!(engine.store().review_history(Some(10)).unwrap().len(), 1);
    }
}
