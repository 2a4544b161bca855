use serde::{Deserialize, Serialize};

use super::RecordId;

pub const COA_SLUG_MAX_LENGTH: usize = 50;
pub const COA_NAME_MAX_LENGTH: usize = 150;

/// A named grouping of accounts, addressed by its unique slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccountModel {
    pub id: Option<RecordId>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<RecordId>,
}

impl ChartOfAccountModel {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
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

    pub fn with_entity(mut self, entity_id: impl Into<RecordId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }
}
