//! Account forms scoped to one chart of accounts.
//!
//! The `parent` select only offers accounts of the same chart, ordered by
//! code. On update the edited account is removed from that list, so an
//! account can never be submitted as its own parent.

use super::engine::{BoundForm, CleanedData, FormData, FormDescriptor, ModelForm};
use super::fields::{Choice, FieldDescriptor, FieldKind, Validator, Widget};
use super::input_attrs;
use crate::errors::{FormError, Result};
use crate::models::account::{ACCOUNT_CODE_MAX_LENGTH, ACCOUNT_NAME_MAX_LENGTH};
use crate::models::store::eligible_parent_accounts;
use crate::models::{AccountModel, AccountRole, BalanceType, ChoiceEnum, ModelStore, RecordId};

/// The chart of accounts and entity an account form operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountScope {
    coa_slug: String,
    entity_slug: String,
}

impl AccountScope {
    /// Both identifiers are mandatory; a blank one is a caller defect.
    pub fn new(coa_slug: &str, entity_slug: &str) -> Result<Self> {
        if coa_slug.trim().is_empty() {
            return Err(FormError::MissingScope("coa_slug"));
        }
        if entity_slug.trim().is_empty() {
            return Err(FormError::MissingScope("entity_slug"));
        }
        Ok(Self {
            coa_slug: coa_slug.trim().to_string(),
            entity_slug: entity_slug.trim().to_string(),
        })
    }

    pub fn coa_slug(&self) -> &str {
        &self.coa_slug
    }

    pub fn entity_slug(&self) -> &str {
        &self.entity_slug
    }
}

/// State shared by the create and update variants.
#[derive(Debug, Clone)]
struct AccountFormBase {
    scope: AccountScope,
    parents: Vec<Choice<RecordId>>,
}

impl AccountFormBase {
    fn new(
        store: &dyn ModelStore,
        coa_slug: &str,
        entity_slug: &str,
        exclude: Option<RecordId>,
    ) -> Result<Self> {
        let scope = AccountScope::new(coa_slug, entity_slug)?;
        let parents: Vec<Choice<RecordId>> =
            eligible_parent_accounts(store, scope.coa_slug(), exclude)
                .into_iter()
                .filter_map(|account| {
                    let label = account.display_label();
                    account.id.map(|id| Choice::new(id, label))
                })
                .collect();
        tracing::debug!(
            coa = scope.coa_slug(),
            entity = scope.entity_slug(),
            parents = parents.len(),
            "resolved eligible parent accounts"
        );
        Ok(Self { scope, parents })
    }

    fn parent_field(&self) -> FieldDescriptor {
        FieldDescriptor::new("parent", "Parent", FieldKind::Reference(self.parents.clone()))
            .with_optional()
    }

    fn code_field() -> FieldDescriptor {
        FieldDescriptor::new("code", "Code", FieldKind::Text)
            .with_widget(Widget::TextInput(input_attrs()))
            .with_validator(Validator::MaxLength(ACCOUNT_CODE_MAX_LENGTH))
    }

    fn name_field() -> FieldDescriptor {
        FieldDescriptor::new("name", "Name", FieldKind::Text)
            .with_widget(Widget::TextInput(input_attrs()))
            .with_validator(Validator::MaxLength(ACCOUNT_NAME_MAX_LENGTH))
    }

    fn parent_ids(&self) -> Vec<RecordId> {
        self.parents.iter().map(|choice| choice.value).collect()
    }
}

/// New account inside the scoped chart: `parent`, `code`, `name`, `role`,
/// `balance_type`.
#[derive(Debug, Clone)]
pub struct AccountModelCreateForm {
    base: AccountFormBase,
    coa_id: RecordId,
    form: BoundForm,
}

impl AccountModelCreateForm {
    pub fn new(
        store: &dyn ModelStore,
        coa_slug: &str,
        entity_slug: &str,
        data: FormData,
    ) -> Result<Self> {
        let base = AccountFormBase::new(store, coa_slug, entity_slug, None)?;
        let coa_id = store
            .chart_by_slug(base.scope.coa_slug())
            .and_then(|chart| chart.id)
            .ok_or_else(|| FormError::UnknownChart(base.scope.coa_slug().to_string()))?;

        let descriptor = FormDescriptor::new(
            "account_create",
            vec![
                base.parent_field(),
                AccountFormBase::code_field(),
                AccountFormBase::name_field(),
                FieldDescriptor::new("role", "Role", FieldKind::choices_from(AccountRole::choices())),
                FieldDescriptor::new(
                    "balance_type",
                    "Balance type",
                    FieldKind::choices_from(BalanceType::choices()),
                ),
            ],
        );
        Ok(Self {
            base,
            coa_id,
            form: BoundForm::new(descriptor, data),
        })
    }

    pub fn scope(&self) -> &AccountScope {
        &self.base.scope
    }

    /// Accounts offered in the `parent` select, in display order.
    pub fn parent_choices(&self) -> Vec<RecordId> {
        self.base.parent_ids()
    }
}

impl ModelForm for AccountModelCreateForm {
    type Model = AccountModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> AccountModel {
        let mut account = AccountModel::new(
            self.coa_id,
            cleaned.text("code").unwrap_or_default(),
            cleaned.text("name").unwrap_or_default(),
            cleaned.choice("role").unwrap_or_default(),
            cleaned.choice("balance_type").unwrap_or_default(),
        );
        account.parent_id = cleaned.reference("parent");
        account
    }
}

/// Edits an existing account: `parent`, `code`, `name`, `locked`, `active`.
///
/// Role and balance type are fixed once the account exists.
#[derive(Debug, Clone)]
pub struct AccountModelUpdateForm {
    base: AccountFormBase,
    instance: AccountModel,
    form: BoundForm,
}

impl AccountModelUpdateForm {
    pub fn new(
        store: &dyn ModelStore,
        coa_slug: &str,
        entity_slug: &str,
        instance: &AccountModel,
        data: FormData,
    ) -> Result<Self> {
        let base = AccountFormBase::new(store, coa_slug, entity_slug, instance.id)?;
        let descriptor = FormDescriptor::new(
            "account_update",
            vec![
                base.parent_field(),
                AccountFormBase::code_field(),
                AccountFormBase::name_field(),
                FieldDescriptor::new("locked", "Locked", FieldKind::Boolean),
                FieldDescriptor::new("active", "Active", FieldKind::Boolean),
            ],
        );
        Ok(Self {
            base,
            instance: instance.clone(),
            form: BoundForm::new(descriptor, data),
        })
    }

    pub fn scope(&self) -> &AccountScope {
        &self.base.scope
    }

    pub fn parent_choices(&self) -> Vec<RecordId> {
        self.base.parent_ids()
    }
}

impl ModelForm for AccountModelUpdateForm {
    type Model = AccountModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> AccountModel {
        let mut account = self.instance.clone();
        account.parent_id = cleaned.reference("parent");
        account.code = cleaned.text("code").unwrap_or_default();
        account.name = cleaned.text("name").unwrap_or_default();
        account.locked = cleaned.flag("locked");
        account.active = cleaned.flag("active");
        account
    }
}
