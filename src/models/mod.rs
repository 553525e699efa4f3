pub mod catalogue;
pub mod item_type;
pub mod mastery;
pub mod quality;
pub mod queue;
pub mod review_item;
pub mod review_log;
pub mod review_session;
pub mod sm2;
pub mod stats;

pub use catalogue::Catalogue;
pub use item_type::ItemType;
pub use mastery::{MasteryStatus, MasteryThresholds, is_learning, is_mastered};
pub use review_item::{DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR, MS_PER_DAY, ReviewItem, Timestamp};
pub use review_log::ReviewLog;
pub use review_session::{ReviewSession, SessionSummary};
pub use stats::{ProgressReport, StatsSummary, UnlockThresholds, compute_stats};
