//! One graded answer, kept as review history.
use serde::{Deserialize, Serialize};

use super::quality::{MAX_QUALITY, is_passing};
use super::{ItemType, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub item_id: String,
    pub item_type: ItemType,
    pub correct: bool,
    pub response_time_ms: u64,
    pub quality: u8,
    pub reviewed_at: Timestamp,
}

impl ReviewLog {
    /// The grade must be in range and on the passing side exactly when the
    /// answer was correct.
    pub fn validate(&self) -> Result<(), String> {
        if self.quality > MAX_QUALITY {
            return Err(format!("quality {} is above {MAX_QUALITY}", self.quality));
        }
        if self.correct != is_passing(self.quality) {
            return Err(format!(
                "quality {} does not match correct = {}",
                self.quality, self.correct
            ));
        }
        Ok(())
    }
}
