use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ChoiceEnum, RecordId};

pub const JE_DESCRIPTION_MAX_LENGTH: usize = 70;

/// A dated posting unit inside a ledger, grouping balanced transaction lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryModel {
    pub id: Option<RecordId>,
    pub ledger_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RecordId>,
    pub activity: JournalActivity,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JournalEntryModel {
    pub fn new(ledger_id: impl Into<RecordId>, activity: JournalActivity, date: NaiveDate) -> Self {
        Self {
            id: None,
            ledger_id: ledger_id.into(),
            parent_id: None,
            activity,
            date,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Cash-flow classification of a journal entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JournalActivity {
    #[default]
    #[serde(rename = "op")]
    Operating,
    #[serde(rename = "fin")]
    Financing,
    #[serde(rename = "inv")]
    Investing,
    #[serde(rename = "other")]
    Other,
}

impl ChoiceEnum for JournalActivity {
    fn all() -> &'static [Self] {
        &[
            JournalActivity::Operating,
            JournalActivity::Financing,
            JournalActivity::Investing,
            JournalActivity::Other,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            JournalActivity::Operating => "op",
            JournalActivity::Financing => "fin",
            JournalActivity::Investing => "inv",
            JournalActivity::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            JournalActivity::Operating => "Operating",
            JournalActivity::Financing => "Financing",
            JournalActivity::Investing => "Investing",
            JournalActivity::Other => "Other",
        }
    }
}

impl fmt::Display for JournalActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
