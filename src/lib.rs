pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;

pub use config::{EngineConfig, QueueConfig};
pub use database::{ItemStore, MemoryStore, SqliteStore};
pub use engine::SrsEngine;
pub use error::{Result, SrsError};
pub use models::{
    Catalogue, ItemType, MasteryStatus, MasteryThresholds, ProgressReport, ReviewItem, ReviewLog,
    ReviewSession, StatsSummary, Timestamp, UnlockThresholds,
};
