use serde::{Deserialize, Serialize};

use super::RecordId;

pub const ENTITY_NAME_MAX_LENGTH: usize = 150;

/// A bookkeeping entity (company, household, fund).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityModel {
    pub id: Option<RecordId>,
    pub slug: String,
    pub name: String,
}

impl EntityModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }
}
