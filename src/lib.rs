#![doc(test(attr(deny(warnings))))]

//! Ledger Forms binds submitted form input to double-entry bookkeeping
//! records: entities, charts of accounts, accounts, ledgers, journal entries
//! and their balanced transaction lines.

pub mod config;
pub mod errors;
pub mod forms;
pub mod models;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ledger Forms tracing initialized.");
    });
}
