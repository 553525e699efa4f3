//! The durable item store the engine reads from and writes to.

use crate::error::Result;
use crate::models::{ItemType, ReviewItem, ReviewLog, Timestamp};

pub trait ItemStore {
    fn get(&self, id: &str) -> Result<Option<ReviewItem>>;

    /// Insert or replace the record with the same id.
    fn put(&mut self, item: &ReviewItem) -> Result<()>;

    /// Items of one type, in catalogue order.
    fn list_by_type(&self, item_type: ItemType) -> Result<Vec<ReviewItem>>;

    fn list_all(&self) -> Result<Vec<ReviewItem>>;

    fn list_due(&self, item_type: Option<ItemType>, as_of: Timestamp) -> Result<Vec<ReviewItem>> {
        let items = match item_type {
            Some(item_type) => self.list_by_type(item_type)?,
            None => self.list_all()?,
        };
        Ok(items
            .into_iter()
            .filter(|item| item.is_due(as_of))
            .collect())
    }

    fn record_review(&mut self, log: &ReviewLog) -> Result<()>;

    /// Stores the graded item together with its log entry.
    ///
    /// Either both are written or neither is: on error the previously stored
    /// item must be left as it was.
    fn put_reviewed(&mut self, item: &ReviewItem, log: &ReviewLog) -> Result<()>;

    /// Upserts `items` and appends `history` as one unit. On error nothing
    /// has been written.
    fn put_all(&mut self, items: &[ReviewItem], history: &[ReviewLog]) -> Result<()>;

    /// Review history, newest first.
    fn review_history(&self, limit: Option<usize>) -> Result<Vec<ReviewLog>>;

    /// The most recent `limit` reviews of one item (all of them for `None`),
    /// oldest first.
    fn review_history_for_item(
        &self,
        item_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewLog>>;

    /// Removes every item and all review history.
    fn clear(&mut self) -> Result<()>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.list_all()?.is_empty())
    }
}
