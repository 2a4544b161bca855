use serde::{Deserialize, Serialize};

use super::RecordId;

pub const LEDGER_NAME_MAX_LENGTH: usize = 150;

/// A ledger owned by an entity; journal entries post into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerModel {
    pub id: Option<RecordId>,
    pub entity_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub locked: bool,
}

impl LedgerModel {
    /// Creates an unposted, unlocked ledger for `entity_id`.
    pub fn new(entity_id: impl Into<RecordId>) -> Self {
        Self {
            id: None,
            entity_id: entity_id.into(),
            name: None,
            posted: false,
            locked: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
