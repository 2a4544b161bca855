use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TxType;
use crate::errors::ValidationError;

/// The part of a transaction line that matters for double-entry balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBalance {
    pub tx_type: TxType,
    pub amount: Decimal,
}

impl TxBalance {
    pub fn new(tx_type: TxType, amount: Decimal) -> Self {
        Self { tx_type, amount }
    }
}

/// Checks a set of transaction lines as one journal entry.
///
/// Implemented for any `Fn(&[TxBalance]) -> Result<(), ValidationError>`, so
/// [`validate_tx_data`] itself is the default validator.
pub trait BalanceValidator: Send + Sync {
    fn validate(&self, txs: &[TxBalance]) -> Result<(), ValidationError>;
}

impl<F> BalanceValidator for F
where
    F: Fn(&[TxBalance]) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, txs: &[TxBalance]) -> Result<(), ValidationError> {
        self(txs)
    }
}

const TOTAL_OVERFLOW_MESSAGE: &str = "Transaction amounts are too large to total.";

/// Fails unless total debits equal total credits. An empty set balances.
pub fn validate_tx_data(txs: &[TxBalance]) -> Result<(), ValidationError> {
    let (debits, credits) = txs
        .iter()
        .try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(debits, credits), tx| match tx.tx_type {
                TxType::Debit => debits.checked_add(tx.amount).map(|debits| (debits, credits)),
                TxType::Credit => credits.checked_add(tx.amount).map(|credits| (debits, credits)),
            },
        )
        .ok_or_else(|| {
            tracing::debug!(lines = txs.len(), "transaction totals overflowed");
            ValidationError::new(TOTAL_OVERFLOW_MESSAGE)
        })?;

    if debits == credits {
        Ok(())
    } else {
        tracing::debug!(%debits, %credits, lines = txs.len(), "transaction data out of balance");
        Err(ValidationError::new(format!(
            "Credits {} and Debits {} do not balance.",
            credits, debits
        )))
    }
}
