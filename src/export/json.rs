//! JSON backup of review items and review history.
//! Provides functionality to export a store to a JSON file and load one back.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::database::ItemStore;
use crate::error::{Result, SrsError};
use crate::models::{ReviewItem, ReviewLog, Timestamp};

pub const BACKUP_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u32,
    pub exported_at: Timestamp,
    pub items: Vec<ReviewItem>,
    /// Oldest first.
    #[serde(default)]
    pub history: Vec<ReviewLog>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub items: usize,
    pub history: usize,
    /// History rows already present in the store.
    pub skipped_history: usize,
}

/// Snapshot of every item and the full review history.
pub fn create_backup<S: ItemStore>(store: &S, now: Timestamp) -> Result<Backup> {
    let mut history = store.review_history(None)?;
    history.reverse();
    Ok(Backup {
        version: BACKUP_VERSION,
        exported_at: now,
        items: store.list_all()?,
        history,
    })
}

pub fn export_to_string<S: ItemStore>(store: &S, now: Timestamp) -> Result<String> {
    Ok(serde_json::to_string_pretty(&create_backup(store, now)?)?)
}

/// Exports the store to a JSON file at the specified path.
pub fn export_to_path<S: ItemStore>(
    store: &S,
    path: impl AsRef<Path>,
    now: Timestamp,
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, export_to_string(store, now)?)?;
    info!(path = %path.display(), "Exported backup");
    Ok(())
}

/// Upserts the backed-up items and appends the history rows the store does
/// not already hold, in one store write.
///
/// Every record is checked before anything is written, so a backup with one
/// broken record changes nothing. A history row must belong to an item in the
/// backup or in the store, with the same item type.
pub fn import_backup<S: ItemStore>(store: &mut S, backup: &Backup) -> Result<ImportSummary> {
    let mut item_types = HashMap::new();
    for item in &backup.items {
        item.validate()
            .map_err(|reason| invalid_record(&item.id, reason))?;
        item_types.insert(item.id.as_str(), item.item_type);
    }

    for log in &backup.history {
        log.validate()
            .map_err(|reason| invalid_record(&log.item_id, reason))?;
        let item_type = match item_types.get(log.item_id.as_str()) {
            Some(&item_type) => Some(item_type),
            None => store.get(&log.item_id)?.map(|item| item.item_type),
        };
        let Some(item_type) = item_type else {
            let reason = "review of an unknown item".to_string();
            return Err(invalid_record(&log.item_id, reason));
        };
        if item_type != log.item_type {
            let reason = format!("review tagged {} for a {item_type}", log.item_type);
            return Err(invalid_record(&log.item_id, reason));
        }
    }

    let existing: HashSet<ReviewLog> = store.review_history(None)?.into_iter().collect();
    let history: Vec<ReviewLog> = backup
        .history
        .iter()
        .filter(|log| !existing.contains(*log))
        .cloned()
        .collect();
    store.put_all(&backup.items, &history)?;

    Ok(ImportSummary {
        items: backup.items.len(),
        history: history.len(),
        skipped_history: backup.history.len() - history.len(),
    })
}

fn invalid_record(id: &str, reason: String) -> SrsError {
    SrsError::InvalidRecord {
        id: id.to_string(),
        reason,
    }
}

pub fn import_from_str<S: ItemStore>(store: &mut S, json: &str) -> Result<ImportSummary> {
    let backup: Backup = serde_json::from_str(json)?;
    import_backup(store, &backup)
}

/// Imports a backup from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_from_path<S: ItemStore>(
    store: &mut S,
    path: impl AsRef<Path>,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let summary = import_from_str(store, &contents)?;
    info!(
        path = %path.display(),
        items = summary.items,
        history = summary.history,
        "Imported backup"
    );
    Ok(summary)
}
