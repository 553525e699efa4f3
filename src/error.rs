//! Error type shared by the engine, the stores and the backup module.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrsError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Unknown item type: {0}")]
    UnknownItemType(String),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SrsError>;
