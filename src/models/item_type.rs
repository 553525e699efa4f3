//! The closed set of item categories. Each type is scheduled and reported independently.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SrsError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Letter,
    NounEnding,
    VerbEnding,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Letter, ItemType::NounEnding, ItemType::VerbEnding];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Letter => "letter",
            ItemType::NounEnding => "noun-ending",
            ItemType::VerbEnding => "verb-ending",
        }
    }

    /// Prefix used when building item ids from catalogue keys.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ItemType::Letter => "letter",
            ItemType::NounEnding => "noun",
            ItemType::VerbEnding => "verb",
        }
    }

    pub fn item_id(self, key: &str) -> String {
        format!("{}-{}", self.id_prefix(), key)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "letter" => Ok(ItemType::Letter),
            "noun-ending" => Ok(ItemType::NounEnding),
            "verb-ending" => Ok(ItemType::VerbEnding),
            other => Err(SrsError::UnknownItemType(other.to_string())),
        }
    }
}
