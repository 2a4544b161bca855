use super::{
    AccountModel, ChartOfAccountModel, EntityModel, JournalEntryModel, LedgerModel, RecordId,
    TransactionModel,
};

/// Read access to persisted records, as needed to build choice lists.
///
/// The form layer never writes through this trait; persisting validated
/// instances is the caller's job.
pub trait ModelStore {
    fn entities(&self) -> Vec<EntityModel>;
    fn charts(&self) -> Vec<ChartOfAccountModel>;
    fn accounts(&self) -> Vec<AccountModel>;
    fn ledgers(&self) -> Vec<LedgerModel>;
    fn journal_entries(&self) -> Vec<JournalEntryModel>;
    /// Lines currently stored for one journal entry.
    fn transactions(&self, journal_entry: RecordId) -> Vec<TransactionModel>;

    fn chart_by_slug(&self, slug: &str) -> Option<ChartOfAccountModel> {
        self.charts().into_iter().find(|chart| chart.slug == slug)
    }
}

/// Accounts that may be chosen as parent inside the chart `coa_slug`,
/// ordered by code, without `exclude`.
pub fn eligible_parent_accounts(
    store: &dyn ModelStore,
    coa_slug: &str,
    exclude: Option<RecordId>,
) -> Vec<AccountModel> {
    let chart_ids: Vec<RecordId> = store
        .charts()
        .into_iter()
        .filter(|chart| chart.slug == coa_slug)
        .filter_map(|chart| chart.id)
        .collect();

    let mut accounts: Vec<AccountModel> = store
        .accounts()
        .into_iter()
        .filter(|account| account.id.is_some())
        .filter(|account| chart_ids.contains(&account.coa_id))
        .filter(|account| exclude.map_or(true, |id| account.id != Some(id)))
        .collect();
    accounts.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
    accounts
}

/// Identifiers of [`eligible_parent_accounts`], in the same order.
pub fn eligible_parents(
    store: &dyn ModelStore,
    coa_slug: &str,
    exclude: Option<RecordId>,
) -> Vec<RecordId> {
    eligible_parent_accounts(store, coa_slug, exclude)
        .into_iter()
        .filter_map(|account| account.id)
        .collect()
}

/// In-memory [`ModelStore`]; inserts assign sequential ids to new records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entities: Vec<EntityModel>,
    pub charts: Vec<ChartOfAccountModel>,
    pub accounts: Vec<AccountModel>,
    pub ledgers: Vec<LedgerModel>,
    pub journal_entries: Vec<JournalEntryModel>,
    pub transactions: Vec<TransactionModel>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&mut self, id: Option<RecordId>) -> RecordId {
        match id {
            Some(id) => {
                self.next_id = self.next_id.max(id.0);
                id
            }
            None => {
                self.next_id += 1;
                RecordId(self.next_id)
            }
        }
    }

    pub fn add_entity(&mut self, mut entity: EntityModel) -> RecordId {
        let id = self.assign(entity.id);
        entity.id = Some(id);
        self.entities.push(entity);
        id
    }

    pub fn add_chart(&mut self, mut chart: ChartOfAccountModel) -> RecordId {
        let id = self.assign(chart.id);
        chart.id = Some(id);
        self.charts.push(chart);
        id
    }

    pub fn add_account(&mut self, mut account: AccountModel) -> RecordId {
        let id = self.assign(account.id);
        account.id = Some(id);
        self.accounts.push(account);
        id
    }

    pub fn add_ledger(&mut self, mut ledger: LedgerModel) -> RecordId {
        let id = self.assign(ledger.id);
        ledger.id = Some(id);
        self.ledgers.push(ledger);
        id
    }

    pub fn add_journal_entry(&mut self, mut entry: JournalEntryModel) -> RecordId {
        let id = self.assign(entry.id);
        entry.id = Some(id);
        self.journal_entries.push(entry);
        id
    }

    pub fn add_transaction(&mut self, mut transaction: TransactionModel) -> RecordId {
        let id = self.assign(transaction.id);
        transaction.id = Some(id);
        self.transactions.push(transaction);
        id
    }

    pub fn account(&self, id: RecordId) -> Option<&AccountModel> {
        self.accounts.iter().find(|account| account.id == Some(id))
    }
}

impl ModelStore for MemoryStore {
    fn entities(&self) -> Vec<EntityModel> {
        self.entities.clone()
    }

    fn charts(&self) -> Vec<ChartOfAccountModel> {
        self.charts.clone()
    }

    fn accounts(&self) -> Vec<AccountModel> {
        self.accounts.clone()
    }

    fn ledgers(&self) -> Vec<LedgerModel> {
        self.ledgers.clone()
    }

    fn journal_entries(&self) -> Vec<JournalEntryModel> {
        self.journal_entries.clone()
    }

    fn transactions(&self, journal_entry: RecordId) -> Vec<TransactionModel> {
        self.transactions
            .iter()
            .filter(|tx| tx.journal_entry_id == journal_entry)
            .cloned()
            .collect()
    }
}
