//! Forms binding submitted input to ledger records.
//!
//! Every form restricts input to a fixed allowlist of fields, validates it
//! against the record schema and, on success, yields an unsaved record.
//! Persisting the record is left to the caller.

pub mod account;
pub mod engine;
pub mod entity;
pub mod fields;
pub mod ledger;
pub mod transaction;

pub use account::{AccountModelCreateForm, AccountModelUpdateForm, AccountScope};
pub use engine::{
    form_data, BoundForm, CleanedData, FormData, FormDescriptor, FormErrors, ModelForm,
    NON_FIELD_ERRORS,
};
pub use entity::{ChartOfAccountsModelForm, EntityModelForm};
pub use fields::{
    Choice, FieldDescriptor, FieldKind, FieldValue, Validator, Widget, WidgetAttrs,
};
pub use ledger::{JournalEntryModelForm, LedgerModelCreateForm, LedgerModelUpdateForm};
pub use transaction::{
    FormSetConfig, FormSetErrors, TransactionBatch, TransactionFormSet, TransactionModelForm,
};

use crate::config;

/// Attributes for text-like widgets, carrying the configured CSS class.
pub(crate) fn input_attrs() -> WidgetAttrs {
    WidgetAttrs::class(config::active().input_class)
}
