//! Record types the forms bind to, plus the collaborator interfaces of the
//! persistence layer (listing records and checking transaction balance).

pub mod account;
pub mod coa;
pub mod entity;
pub mod io;
pub mod journal_entry;
pub mod ledger;
pub mod store;
pub mod transaction;

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use account::{AccountModel, AccountRole, BalanceType};
pub use coa::ChartOfAccountModel;
pub use entity::EntityModel;
pub use io::{validate_tx_data, BalanceValidator, TxBalance};
pub use journal_entry::{JournalActivity, JournalEntryModel};
pub use ledger::LedgerModel;
pub use store::{eligible_parents, MemoryStore, ModelStore};
pub use transaction::{TransactionModel, TxType};

/// Primary key of a persisted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(RecordId)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

/// Closed set of stored values with human labels, rendered as a select box.
pub trait ChoiceEnum: Sized + Copy + 'static {
    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn from_value(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|choice| choice.as_str() == value)
    }

    /// `(stored value, label)` pairs in catalog order.
    fn choices() -> Vec<(&'static str, &'static str)> {
        Self::all()
            .iter()
            .map(|choice| (choice.as_str(), choice.label()))
            .collect()
    }
}
