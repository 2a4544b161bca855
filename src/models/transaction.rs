use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ChoiceEnum, RecordId};

pub const TX_DESCRIPTION_MAX_LENGTH: usize = 100;
pub const AMOUNT_MAX_DIGITS: u32 = 20;
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// One debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionModel {
    pub id: Option<RecordId>,
    pub journal_entry_id: RecordId,
    pub account_id: RecordId,
    pub tx_type: TxType,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionModel {
    pub fn new(
        journal_entry_id: impl Into<RecordId>,
        account_id: impl Into<RecordId>,
        tx_type: TxType,
        amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            journal_entry_id: journal_entry_id.into(),
            account_id: account_id.into(),
            tx_type,
            amount,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    #[default]
    Debit,
    Credit,
}

impl ChoiceEnum for TxType {
    fn all() -> &'static [Self] {
        &[TxType::Debit, TxType::Credit]
    }

    fn as_str(&self) -> &'static str {
        match self {
            TxType::Debit => "debit",
            TxType::Credit => "credit",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TxType::Debit => "Debit",
            TxType::Credit => "Credit",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
