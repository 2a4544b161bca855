//! Transaction lines of one journal entry, validated one by one and then as
//! a balanced batch.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use super::engine::{BoundForm, CleanedData, FormData, FormDescriptor, FormErrors, ModelForm};
use super::fields::{parse_flag, Choice, FieldDescriptor, FieldKind, Validator, Widget};
use super::input_attrs;
use crate::config::FormsConfig;
use crate::models::transaction::{AMOUNT_DECIMAL_PLACES, AMOUNT_MAX_DIGITS, TX_DESCRIPTION_MAX_LENGTH};
use crate::models::{
    validate_tx_data, BalanceValidator, ChoiceEnum, ModelStore, RecordId, TransactionModel,
    TxBalance, TxType,
};

/// Per-line flag marking a line for removal.
pub const DELETION_FIELD: &str = "DELETE";
/// Prefix of flat management-style submissions (`form-0-amount`, ...).
pub const FORMSET_PREFIX: &str = "form";
pub const TOTAL_FORMS: &str = "TOTAL_FORMS";
pub const INITIAL_FORMS: &str = "INITIAL_FORMS";

const MANAGEMENT_ERROR: &str = "ManagementForm data is missing or has been tampered with.";
const DUPLICATE_ID_ERROR: &str = "Please correct the duplicate data for id, which must be unique.";

/// Choice lists a line form needs, resolved once per batch.
#[derive(Debug, Clone)]
struct LineChoices {
    accounts: Vec<Choice<RecordId>>,
    existing: Vec<TransactionModel>,
}

impl LineChoices {
    fn load(store: &dyn ModelStore, journal_entry: RecordId) -> Self {
        let accounts = store
            .accounts()
            .into_iter()
            .filter_map(|account| {
                let label = account.display_label();
                account.id.map(|id| Choice::new(id, label))
            })
            .collect();
        Self {
            accounts,
            existing: store.transactions(journal_entry),
        }
    }

    fn descriptor(&self) -> FormDescriptor {
        let existing_ids = self
            .existing
            .iter()
            .filter_map(|tx| tx.id.map(|id| Choice::new(id, id.to_string())))
            .collect();
        FormDescriptor::new(
            "transaction",
            vec![
                FieldDescriptor::new("id", "Id", FieldKind::Reference(existing_ids))
                    .with_optional()
                    .with_widget(Widget::HiddenInput),
                FieldDescriptor::new("account", "Account", FieldKind::Reference(self.accounts.clone())),
                FieldDescriptor::new("tx_type", "Tx type", FieldKind::choices_from(TxType::choices())),
                FieldDescriptor::new("amount", "Amount", FieldKind::Decimal)
                    .with_widget(Widget::NumberInput(input_attrs()))
                    .with_validator(Validator::MinValue(Decimal::ZERO))
                    .with_validator(Validator::DecimalDigits {
                        max_digits: AMOUNT_MAX_DIGITS,
                        decimal_places: AMOUNT_DECIMAL_PLACES,
                    }),
                FieldDescriptor::new("description", "Description", FieldKind::Text)
                    .with_optional()
                    .with_widget(Widget::TextInput(input_attrs()))
                    .with_validator(Validator::MaxLength(TX_DESCRIPTION_MAX_LENGTH)),
            ],
        )
    }
}

/// One debit or credit line: `id` (hidden), `account`, `tx_type`, `amount`,
/// `description`.
///
/// `id` only correlates the line with a stored transaction of the same
/// journal entry; any other id is rejected.
#[derive(Debug, Clone)]
pub struct TransactionModelForm {
    form: BoundForm,
    journal_entry: RecordId,
    existing: Vec<TransactionModel>,
}

impl TransactionModelForm {
    pub fn new(store: &dyn ModelStore, journal_entry: RecordId, data: FormData) -> Self {
        let choices = LineChoices::load(store, journal_entry);
        Self::from_choices(&choices, journal_entry, data)
    }

    fn from_choices(choices: &LineChoices, journal_entry: RecordId, data: FormData) -> Self {
        Self {
            form: BoundForm::new(choices.descriptor(), data),
            journal_entry,
            existing: choices.existing.clone(),
        }
    }

    fn empty_permitted(mut self) -> Self {
        self.form = self.form.with_empty_permitted();
        self
    }

    /// The stored transaction this line edits, if its `id` names one.
    pub fn existing(&self) -> Option<&TransactionModel> {
        let id = self.form.raw("id")?.parse::<RecordId>().ok()?;
        self.existing.iter().find(|tx| tx.id == Some(id))
    }

    pub fn has_changed(&self) -> bool {
        self.form.has_changed()
    }
}

impl ModelForm for TransactionModelForm {
    type Model = TransactionModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> TransactionModel {
        let account = cleaned.reference("account").unwrap_or_default();
        let tx_type = cleaned.choice("tx_type").unwrap_or_default();
        let amount = cleaned.decimal("amount").unwrap_or_default();

        let existing = cleaned
            .reference("id")
            .and_then(|id| self.existing.iter().find(|tx| tx.id == Some(id)));
        let mut transaction = match existing {
            Some(stored) => stored.clone(),
            None => TransactionModel::new(self.journal_entry, account, tx_type, amount),
        };
        transaction.account_id = account;
        transaction.tx_type = tx_type;
        transaction.amount = amount;
        transaction.description = cleaned.text("description");
        transaction
    }
}

/// Shape of a transaction batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSetConfig {
    /// Leading lines that stand for stored transactions.
    pub base_line_count: usize,
    /// Blank lines offered after the base lines.
    pub extra_blank_lines: usize,
    pub allow_delete: bool,
    pub max_lines: usize,
}

impl Default for FormSetConfig {
    fn default() -> Self {
        Self::from_config(&FormsConfig::default())
    }
}

impl FormSetConfig {
    pub fn from_config(config: &FormsConfig) -> Self {
        Self {
            base_line_count: 0,
            extra_blank_lines: config.transaction_extra_lines,
            allow_delete: config.allow_delete,
            max_lines: config.transaction_max_lines,
        }
    }

    pub fn with_base_line_count(mut self, base_line_count: usize) -> Self {
        self.base_line_count = base_line_count;
        self
    }

    pub fn total_lines(&self) -> usize {
        self.base_line_count + self.extra_blank_lines
    }
}

/// Validated lines ready to be persisted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionBatch {
    pub journal_entry: RecordId,
    /// New and edited lines, in submission order.
    pub save: Vec<TransactionModel>,
    /// Stored lines the user marked for deletion.
    pub delete: Vec<RecordId>,
}

/// Errors of a rejected batch.
///
/// `lines[i]` holds the field errors of line `i`; `non_form_errors` holds
/// failures of the batch as a whole, such as an imbalance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSetErrors {
    pub lines: Vec<FormErrors>,
    pub non_form_errors: Vec<String>,
}

impl FormSetErrors {
    fn for_lines(count: usize) -> Self {
        Self {
            lines: vec![FormErrors::new(); count],
            non_form_errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.non_form_errors.is_empty() && self.lines.iter().all(FormErrors::is_empty)
    }

    /// Number of field-level messages across all lines.
    pub fn field_error_count(&self) -> usize {
        self.lines.iter().map(FormErrors::count).sum()
    }

    pub fn line(&self, index: usize) -> Option<&FormErrors> {
        self.lines.get(index)
    }
}

#[derive(Debug, Clone)]
struct TransactionLine {
    form: TransactionModelForm,
    delete: bool,
    extra: bool,
}

/// The transaction lines of one journal entry, validated as a unit.
///
/// Each line is cleaned on its own; only when every surviving line is valid
/// are the `(tx_type, amount)` pairs handed to the balance validator. An
/// imbalance is reported as a batch error and never blamed on a line.
pub struct TransactionFormSet {
    journal_entry: RecordId,
    config: FormSetConfig,
    lines: Vec<TransactionLine>,
    submitted_lines: usize,
    management_error: Option<String>,
    validator: Arc<dyn BalanceValidator>,
}

impl TransactionFormSet {
    /// Binds one [`FormData`] per submitted line.
    pub fn new(
        store: &dyn ModelStore,
        journal_entry: RecordId,
        lines: Vec<FormData>,
        config: FormSetConfig,
    ) -> Self {
        let choices = LineChoices::load(store, journal_entry);
        let submitted_lines = lines.len();
        let lines = lines
            .into_iter()
            .take(config.max_lines)
            .enumerate()
            .map(|(index, data)| bind_line(&choices, journal_entry, &config, index, data))
            .collect();
        Self {
            journal_entry,
            config,
            lines,
            submitted_lines,
            management_error: None,
            validator: Arc::new(validate_tx_data),
        }
    }

    /// Lines for an initial render: the stored transactions followed by the
    /// configured number of blank lines.
    pub fn blank(store: &dyn ModelStore, journal_entry: RecordId, config: FormSetConfig) -> Self {
        let stored = store.transactions(journal_entry);
        let config = config.with_base_line_count(stored.len());
        let mut lines: Vec<FormData> = stored.iter().map(initial_data).collect();
        lines.resize_with(config.total_lines(), FormData::new);
        Self::new(store, journal_entry, lines, config)
    }

    /// Binds a flat submission of `form-TOTAL_FORMS`, `form-INITIAL_FORMS`
    /// and `form-{index}-{field}` keys.
    pub fn from_management_data(
        store: &dyn ModelStore,
        journal_entry: RecordId,
        data: &FormData,
        config: FormSetConfig,
    ) -> Self {
        let count = |name: &str| {
            data.get(&format!("{}-{}", FORMSET_PREFIX, name))
                .and_then(|raw| raw.trim().parse::<usize>().ok())
        };
        let (total, initial) = match (count(TOTAL_FORMS), count(INITIAL_FORMS)) {
            (Some(total), Some(initial)) if initial <= total => (total, initial),
            _ => {
                tracing::debug!(journal_entry = %journal_entry, "invalid management data");
                let mut formset = Self::new(store, journal_entry, Vec::new(), config);
                formset.management_error = Some(MANAGEMENT_ERROR.to_string());
                return formset;
            }
        };

        let lines: Vec<FormData> = (0..total.min(config.max_lines.saturating_add(1)))
            .map(|index| {
                let prefix = format!("{}-{}-", FORMSET_PREFIX, index);
                data.iter()
                    .filter_map(|(key, value)| {
                        key.strip_prefix(&prefix)
                            .map(|field| (field.to_string(), value.clone()))
                    })
                    .collect()
            })
            .collect();
        let mut formset = Self::new(
            store,
            journal_entry,
            lines,
            config.with_base_line_count(initial),
        );
        formset.submitted_lines = total;
        formset
    }

    /// Replaces the default debit/credit check.
    pub fn with_balance_validator(mut self, validator: Arc<dyn BalanceValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn journal_entry(&self) -> RecordId {
        self.journal_entry
    }

    pub fn config(&self) -> &FormSetConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn forms(&self) -> impl Iterator<Item = &TransactionModelForm> {
        self.lines.iter().map(|line| &line.form)
    }

    pub fn validate(&self) -> Result<TransactionBatch, FormSetErrors> {
        let mut errors = FormSetErrors::for_lines(self.lines.len());

        if let Some(message) = &self.management_error {
            errors.non_form_errors.push(message.clone());
            return Err(errors);
        }
        if self.submitted_lines > self.config.max_lines {
            errors
                .non_form_errors
                .push(format!("Please submit at most {} forms.", self.config.max_lines));
            return Err(errors);
        }

        let mut save = Vec::new();
        let mut delete = Vec::new();
        // A stored line may be saved or deleted once per batch.
        let mut seen = HashSet::new();
        for (index, line) in self.lines.iter().enumerate() {
            if line.delete {
                if let Some(id) = line.form.existing().and_then(|tx| tx.id) {
                    if seen.insert(id) {
                        delete.push(id);
                    } else {
                        errors.lines[index].add("id", DUPLICATE_ID_ERROR);
                    }
                }
                continue;
            }
            if line.extra && !line.form.has_changed() {
                continue;
            }
            match line.form.instance() {
                Ok(transaction) => match transaction.id {
                    Some(id) if !seen.insert(id) => {
                        errors.lines[index].add("id", DUPLICATE_ID_ERROR);
                    }
                    _ => save.push(transaction),
                },
                Err(line_errors) => errors.lines[index] = line_errors,
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                journal_entry = %self.journal_entry,
                field_errors = errors.field_error_count(),
                "transaction lines invalid, skipping balance check"
            );
            return Err(errors);
        }

        let balances: Vec<TxBalance> = save
            .iter()
            .map(|tx| TxBalance::new(tx.tx_type, tx.amount))
            .collect();
        if let Err(err) = self.validator.validate(&balances) {
            tracing::debug!(
                journal_entry = %self.journal_entry,
                reason = %err,
                "transaction batch rejected"
            );
            errors.non_form_errors.push(err.message);
            return Err(errors);
        }

        tracing::debug!(
            journal_entry = %self.journal_entry,
            save = save.len(),
            delete = delete.len(),
            "transaction batch accepted"
        );
        Ok(TransactionBatch {
            journal_entry: self.journal_entry,
            save,
            delete,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn errors(&self) -> FormSetErrors {
        self.validate().err().unwrap_or_default()
    }

    pub fn non_form_errors(&self) -> Vec<String> {
        self.errors().non_form_errors
    }
}

fn bind_line(
    choices: &LineChoices,
    journal_entry: RecordId,
    config: &FormSetConfig,
    index: usize,
    mut data: FormData,
) -> TransactionLine {
    let delete_flag = data
        .remove(DELETION_FIELD)
        .map_or(false, |raw| parse_flag(&raw));
    let extra = index >= config.base_line_count;
    let mut form = TransactionModelForm::from_choices(choices, journal_entry, data);
    if extra {
        form = form.empty_permitted();
    }
    TransactionLine {
        form,
        delete: config.allow_delete && delete_flag,
        extra,
    }
}

fn initial_data(tx: &TransactionModel) -> FormData {
    let mut data = FormData::new();
    if let Some(id) = tx.id {
        data.insert("id".into(), id.to_string());
    }
    data.insert("account".into(), tx.account_id.to_string());
    data.insert("tx_type".into(), tx.tx_type.as_str().into());
    data.insert("amount".into(), tx.amount.to_string());
    if let Some(description) = &tx.description {
        data.insert("description".into(), description.clone());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::forms::engine::form_data;
    use crate::models::{
        AccountModel, AccountRole, BalanceType, ChartOfAccountModel, MemoryStore,
    };
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> (MemoryStore, RecordId, RecordId, RecordId) {
        let mut store = MemoryStore::new();
        let coa = store.add_chart(ChartOfAccountModel::new("ops"));
        let cash = store.add_account(AccountModel::new(
            coa,
            "1010",
            "Cash",
            AccountRole::AssetCaCash,
            BalanceType::Debit,
        ));
        let revenue = store.add_account(AccountModel::new(
            coa,
            "4000",
            "Sales",
            AccountRole::InSales,
            BalanceType::Credit,
        ));
        (store, RecordId(100), cash, revenue)
    }

    fn line(account: RecordId, tx_type: &str, amount: &str) -> FormData {
        form_data([
            ("account", account.to_string()),
            ("tx_type", tx_type.to_string()),
            ("amount", amount.to_string()),
        ])
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (store, je, cash, revenue) = store();
        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![
                line(cash, "debit", "10.00"),
                line(revenue, "credit", "10.00"),
                FormData::new(),
                form_data([("tx_type", ""), ("amount", " ")]),
            ],
            FormSetConfig::default(),
        );
        let batch = formset.validate().unwrap();
        assert_eq!(batch.save.len(), 2);
        assert!(batch.delete.is_empty());
    }

    #[test]
    fn blank_render_offers_extra_lines() {
        let (mut store, je, cash, _) = store();
        store.add_transaction(TransactionModel::new(je, cash, TxType::Debit, dec!(5.00)));
        let formset = TransactionFormSet::blank(&store, je, FormSetConfig::default());
        assert_eq!(formset.config().base_line_count, 1);
        assert_eq!(formset.len(), 6);
        assert_eq!(formset.len(), formset.config().total_lines());
        let first = formset.forms().next().unwrap();
        assert_eq!(first.bound().raw("amount"), Some("5.00"));
        assert!(first.existing().is_some());
    }

    #[test]
    fn deleted_lines_leave_the_balance() {
        let (mut store, je, cash, revenue) = store();
        let stored = store.add_transaction(TransactionModel::new(je, cash, TxType::Debit, dec!(7.00)));
        let mut doomed = line(cash, "debit", "7.00");
        doomed.insert("id".into(), stored.to_string());
        doomed.insert(DELETION_FIELD.into(), "on".into());

        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![
                doomed,
                line(cash, "debit", "3.00"),
                line(revenue, "credit", "3.00"),
            ],
            FormSetConfig::default().with_base_line_count(1),
        );
        let batch = formset.validate().unwrap();
        assert_eq!(batch.delete, vec![stored]);
        assert_eq!(batch.save.len(), 2);
    }

    #[test]
    fn delete_flag_ignored_when_disallowed() {
        let (store, je, cash, _) = store();
        let mut flagged = line(cash, "debit", "3.00");
        flagged.insert(DELETION_FIELD.into(), "on".into());
        let config = FormSetConfig {
            allow_delete: false,
            ..FormSetConfig::default()
        };
        let formset = TransactionFormSet::new(&store, je, vec![flagged], config);
        let errors = formset.validate().unwrap_err();
        assert_eq!(errors.non_form_errors, vec!["Credits 0 and Debits 3.00 do not balance."]);
    }

    #[test]
    fn line_errors_skip_the_balance_check() {
        let (store, je, cash, _) = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let validator = move |txs: &[TxBalance]| -> Result<(), ValidationError> {
            counter.fetch_add(1, Ordering::SeqCst);
            validate_tx_data(txs)
        };
        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![line(cash, "debit", "-1"), line(cash, "sideways", "1")],
            FormSetConfig::default(),
        )
        .with_balance_validator(Arc::new(validator));

        let errors = formset.validate().unwrap_err();
        assert!(errors.non_form_errors.is_empty());
        assert_eq!(
            errors.lines[0].field("amount"),
            ["Ensure this value is greater than or equal to 0."]
        );
        assert_eq!(
            errors.lines[1].field("tx_type"),
            ["Select a valid choice. sideways is not one of the available choices."]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn foreign_transaction_id_is_rejected() {
        let (mut store, je, cash, revenue) = store();
        let other = store.add_transaction(TransactionModel::new(
            RecordId(999),
            cash,
            TxType::Debit,
            dec!(1.00),
        ));
        let mut hijack = line(cash, "debit", "1.00");
        hijack.insert("id".into(), other.to_string());
        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![hijack, line(revenue, "credit", "1.00")],
            FormSetConfig::default(),
        );
        let errors = formset.validate().unwrap_err();
        assert_eq!(errors.lines[0].fields().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn management_data_is_parsed() {
        let (store, je, cash, revenue) = store();
        let data = form_data([
            ("form-TOTAL_FORMS", "3".to_string()),
            ("form-INITIAL_FORMS", "0".to_string()),
            ("form-0-account", cash.to_string()),
            ("form-0-tx_type", "debit".to_string()),
            ("form-0-amount", "12.50".to_string()),
            ("form-1-account", revenue.to_string()),
            ("form-1-tx_type", "credit".to_string()),
            ("form-1-amount", "12.50".to_string()),
        ]);
        let formset =
            TransactionFormSet::from_management_data(&store, je, &data, FormSetConfig::default());
        assert_eq!(formset.len(), 3);
        let batch = formset.validate().unwrap();
        assert_eq!(batch.save[1].amount, dec!(12.50));
        assert_eq!(batch.save[1].journal_entry_id, je);
    }

    #[test]
    fn missing_management_data_is_a_batch_error() {
        let (store, je, _, _) = store();
        let data = form_data([("form-0-amount", "1")]);
        let formset =
            TransactionFormSet::from_management_data(&store, je, &data, FormSetConfig::default());
        assert_eq!(formset.non_form_errors(), vec![MANAGEMENT_ERROR]);
    }

    #[test]
    fn too_many_lines_are_refused() {
        let (store, je, cash, _) = store();
        let config = FormSetConfig {
            max_lines: 2,
            ..FormSetConfig::default()
        };
        let lines = vec![line(cash, "debit", "0"); 3];
        let formset = TransactionFormSet::new(&store, je, lines, config);
        assert_eq!(formset.len(), 2);
        assert_eq!(formset.non_form_errors(), vec!["Please submit at most 2 forms."]);
    }

    #[test]
    fn edited_line_keeps_its_identity() {
        let (mut store, je, cash, revenue) = store();
        let debit = store.add_transaction(TransactionModel::new(je, cash, TxType::Debit, dec!(5.00)));
        let credit =
            store.add_transaction(TransactionModel::new(je, revenue, TxType::Credit, dec!(5.00)));

        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![
                form_data([
                    ("id", debit.to_string()),
                    ("account", cash.to_string()),
                    ("tx_type", "debit".to_string()),
                    ("amount", "8.00".to_string()),
                    ("description", "corrected".to_string()),
                ]),
                form_data([
                    ("id", credit.to_string()),
                    ("account", revenue.to_string()),
                    ("tx_type", "credit".to_string()),
                    ("amount", "8.00".to_string()),
                ]),
            ],
            FormSetConfig::default().with_base_line_count(2),
        );
        let batch = formset.validate().unwrap();
        assert_eq!(batch.save[0].id, Some(debit));
        assert_eq!(batch.save[0].amount, dec!(8.00));
        assert_eq!(batch.save[0].description.as_deref(), Some("corrected"));
        assert_eq!(batch.save[1].id, Some(credit));
    }

    #[test]
    fn cleared_base_line_is_still_validated() {
        let (store, je, _, _) = store();
        let formset = TransactionFormSet::new(
            &store,
            je,
            vec![FormData::new()],
            FormSetConfig::default().with_base_line_count(1),
        );
        let errors = formset.validate().unwrap_err();
        assert_eq!(errors.lines[0].field("account"), ["This field is required."]);
    }
}
