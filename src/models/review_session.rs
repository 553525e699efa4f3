//! A single quiz pass over a review batch.
//! Each answer is graded through the engine as soon as it is submitted.

use serde::{Deserialize, Serialize};

use super::{ItemType, ReviewItem, Timestamp};
use crate::database::ItemStore;
use crate::engine::SrsEngine;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionAnswer {
    pub item_id: String,
    pub correct: bool,
    pub response_time_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub accuracy: f64,
    pub total_time_ms: u64,
    pub average_time_ms: f64,
}

pub struct ReviewSession {
    pub items: Vec<ReviewItem>,
    pub current_index: usize,
    pub answers: Vec<SessionAnswer>,
    pub started_at: Timestamp,
}

impl ReviewSession {
    pub fn new(items: Vec<ReviewItem>, started_at: Timestamp) -> Self {
        Self {
            items,
            current_index: 0,
            answers: Vec::new(),
            started_at,
        }
    }

    /// Starts a session on the engine's next mixed batch for `item_type`.
    pub fn start<S: ItemStore>(
        engine: &SrsEngine<S>,
        item_type: Option<ItemType>,
        now: Timestamp,
    ) -> Result<Self> {
        Ok(Self::new(engine.next_batch(item_type, now)?, now))
    }

    pub fn current(&self) -> Option<&ReviewItem> {
        self.items.get(self.current_index)
    }

    /// Grades the current item and stores the updated record in the session.
    /// Returns `None` once every item has been answered.
    pub fn submit<S: ItemStore>(
        &mut self,
        engine: &mut SrsEngine<S>,
        correct: bool,
        response_time_ms: u64,
        now: Timestamp,
    ) -> Result<Option<ReviewItem>> {
        let Some(item_id) = self.current().map(|item| item.id.clone()) else {
            return Ok(None);
        };

        let updated = engine.grade_review(&item_id, correct, response_time_ms, now)?;
        self.items[self.current_index] = updated.clone();
        self.answers.push(SessionAnswer {
            item_id,
            correct,
            response_time_ms,
        });
        Ok(Some(updated))
    }

    pub fn advance(&mut self) {
        if self.current_index < self.items.len() {
            self.current_index += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.items.len()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.correct).count()
    }

    pub fn progress_message(&self) -> String {
        let shown = (self.current_index + 1).min(self.total_count());
        format!("Question {} of {}", shown, self.total_count())
    }

    pub fn summary(&self, now: Timestamp) -> SessionSummary {
        let total_questions = self.total_count();
        let correct_answers = self.correct_count();
        let accuracy = if total_questions > 0 {
            correct_answers as f64 / total_questions as f64 * 100.0
        } else {
            0.0
        };
        let average_time_ms = if self.answers.is_empty() {
            0.0
        } else {
            self.answers
                .iter()
                .map(|answer| answer.response_time_ms as f64)
                .sum::<f64>()
                / self.answers.len() as f64
        };

        SessionSummary {
            total_questions,
            correct_answers,
            accuracy,
            total_time_ms: now.saturating_sub(self.started_at).max(0) as u64,
            average_time_ms,
        }
    }
}
