//! In-memory store. Keeps insertion order, which is catalogue order when the
//! store was filled by initialization.

use std::collections::HashMap;

use super::ItemStore;
use crate::error::Result;
use crate::models::{ItemType, ReviewItem, ReviewLog};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: Vec<ReviewItem>,
    index: HashMap<String, usize>,
    history: Vec<ReviewLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl ItemStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<ReviewItem>> {
        Ok(self.index.get(id).map(|&pos| self.items[pos].clone()))
    }

    fn put(&mut self, item: &ReviewItem) -> Result<()> {
        match self.index.get(&item.id) {
            Some(&pos) => self.items[pos] = item.clone(),
            None => {
                self.index.insert(item.id.clone(), self.items.len());
                self.items.push(item.clone());
            }
        }
        Ok(())
    }

    fn list_by_type(&self, item_type: ItemType) -> Result<Vec<ReviewItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.item_type == item_type)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<ReviewItem>> {
        Ok(self.items.clone())
    }

    fn record_review(&mut self, log: &ReviewLog) -> Result<()> {
        self.history.push(log.clone());
        Ok(())
    }

    fn put_reviewed(&mut self, item: &ReviewItem, log: &ReviewLog) -> Result<()> {
        self.put(item)?;
        self.record_review(log)
    }

    fn put_all(&mut self, items: &[ReviewItem], history: &[ReviewLog]) -> Result<()> {
        for item in items {
            self.put(item)?;
        }
        self.history.extend_from_slice(history);
        Ok(())
    }

    fn review_history(&self, limit: Option<usize>) -> Result<Vec<ReviewLog>> {
        let newest_first = self.history.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }

    fn review_history_for_item(
        &self,
        item_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewLog>> {
        let logs: Vec<ReviewLog> = self
            .history
            .iter()
            .filter(|log| log.item_id == item_id)
            .cloned()
            .collect();
        let skip = limit.map_or(0, |limit| logs.len().saturating_sub(limit));
        Ok(logs.into_iter().skip(skip).collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.index.clear();
        self.history.clear();
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.items.is_empty())
    }
}
