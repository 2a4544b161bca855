#![allow(dead_code)]

use chrono::NaiveDate;
use ledger_forms::models::{
    AccountModel, AccountRole, BalanceType, ChartOfAccountModel, EntityModel, JournalActivity,
    JournalEntryModel, LedgerModel, MemoryStore, RecordId,
};

/// A small bookkeeping setup shared by the integration suites.
///
/// Entity `acme-llc` owns two charts. Chart `ops` holds cash (id 7), bank
/// and sales accounts; chart `legacy` holds a single account that must never
/// leak into `ops` forms.
pub struct Fixture {
    pub store: MemoryStore,
    pub entity: RecordId,
    pub ops: RecordId,
    pub legacy: RecordId,
    pub cash: RecordId,
    pub bank: RecordId,
    pub sales: RecordId,
    pub legacy_account: RecordId,
    pub ledger: RecordId,
    pub journal_entry: RecordId,
}

pub fn fixture() -> Fixture {
    let mut store = MemoryStore::new();
    let entity = store.add_entity(EntityModel::new("Acme LLC").with_slug("acme-llc"));
    let ops = store.add_chart(
        ChartOfAccountModel::new("ops")
            .with_name("Operations")
            .with_entity(entity),
    );
    let legacy = store.add_chart(ChartOfAccountModel::new("legacy").with_entity(entity));

    let cash = store.add_account(
        AccountModel::new(ops, "1010", "Cash", AccountRole::AssetCaCash, BalanceType::Debit)
            .with_id(7),
    );
    let sales = store.add_account(AccountModel::new(
        ops,
        "4000",
        "Sales",
        AccountRole::InSales,
        BalanceType::Credit,
    ));
    let bank = store.add_account(AccountModel::new(
        ops,
        "1000",
        "Bank",
        AccountRole::AssetCaCash,
        BalanceType::Debit,
    ));
    let legacy_account = store.add_account(AccountModel::new(
        legacy,
        "1000",
        "Old Bank",
        AccountRole::AssetCaCash,
        BalanceType::Debit,
    ));

    let ledger = store.add_ledger(LedgerModel::new(entity).with_name("General"));
    let journal_entry = store.add_journal_entry(
        JournalEntryModel::new(
            ledger,
            JournalActivity::Operating,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .with_description("March sales"),
    );

    Fixture {
        store,
        entity,
        ops,
        legacy,
        cash,
        bank,
        sales,
        legacy_account,
        ledger,
        journal_entry,
    }
}
