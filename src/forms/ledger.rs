use super::engine::{BoundForm, CleanedData, FormData, FormDescriptor, ModelForm};
use super::fields::{Choice, FieldDescriptor, FieldKind, Validator, Widget};
use super::input_attrs;
use crate::models::journal_entry::JE_DESCRIPTION_MAX_LENGTH;
use crate::models::ledger::LEDGER_NAME_MAX_LENGTH;
use crate::models::{
    ChoiceEnum, JournalActivity, JournalEntryModel, LedgerModel, ModelStore, RecordId,
};

fn entity_choices(store: &dyn ModelStore) -> Vec<Choice<RecordId>> {
    store
        .entities()
        .into_iter()
        .filter_map(|entity| entity.id.map(|id| Choice::new(id, entity.name)))
        .collect()
}

fn ledger_choices(store: &dyn ModelStore) -> Vec<Choice<RecordId>> {
    store
        .ledgers()
        .into_iter()
        .filter_map(|ledger| {
            let id = ledger.id?;
            let label = ledger.name.unwrap_or_else(|| format!("Ledger {}", id));
            Some(Choice::new(id, label))
        })
        .collect()
}

fn journal_entry_choices(store: &dyn ModelStore) -> Vec<Choice<RecordId>> {
    store
        .journal_entries()
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id?;
            let label = match entry.description {
                Some(description) => format!("{} {}", entry.date, description),
                None => entry.date.to_string(),
            };
            Some(Choice::new(id, label))
        })
        .collect()
}

fn ledger_fields(store: &dyn ModelStore) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("entity", "Entity", FieldKind::Reference(entity_choices(store))),
        FieldDescriptor::new("name", "Name", FieldKind::Text)
            .with_optional()
            .with_widget(Widget::TextInput(input_attrs()))
            .with_validator(Validator::MaxLength(LEDGER_NAME_MAX_LENGTH)),
    ]
}

/// New ledger: `entity`, `name`.
#[derive(Debug, Clone)]
pub struct LedgerModelCreateForm {
    form: BoundForm,
}

impl LedgerModelCreateForm {
    pub fn new(store: &dyn ModelStore, data: FormData) -> Self {
        let descriptor = FormDescriptor::new("ledger_create", ledger_fields(store));
        Self {
            form: BoundForm::new(descriptor, data),
        }
    }
}

impl ModelForm for LedgerModelCreateForm {
    type Model = LedgerModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> LedgerModel {
        let mut ledger = LedgerModel::new(cleaned.reference("entity").unwrap_or_default());
        ledger.name = cleaned.text("name");
        ledger
    }
}

/// Existing ledger: `entity`, `name`, `posted`, `locked`.
#[derive(Debug, Clone)]
pub struct LedgerModelUpdateForm {
    form: BoundForm,
    instance: LedgerModel,
}

impl LedgerModelUpdateForm {
    pub fn new(store: &dyn ModelStore, instance: &LedgerModel, data: FormData) -> Self {
        let mut fields = ledger_fields(store);
        fields.push(FieldDescriptor::new("posted", "Posted", FieldKind::Boolean));
        fields.push(FieldDescriptor::new("locked", "Locked", FieldKind::Boolean));
        Self {
            form: BoundForm::new(FormDescriptor::new("ledger_update", fields), data),
            instance: instance.clone(),
        }
    }
}

impl ModelForm for LedgerModelUpdateForm {
    type Model = LedgerModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> LedgerModel {
        let mut ledger = self.instance.clone();
        if let Some(entity) = cleaned.reference("entity") {
            ledger.entity_id = entity;
        }
        ledger.name = cleaned.text("name");
        ledger.posted = cleaned.flag("posted");
        ledger.locked = cleaned.flag("locked");
        ledger
    }
}

/// Journal entry header: `ledger`, `parent`, `activity`, `date`, `description`.
#[derive(Debug, Clone)]
pub struct JournalEntryModelForm {
    form: BoundForm,
    instance: Option<JournalEntryModel>,
}

impl JournalEntryModelForm {
    pub fn new(store: &dyn ModelStore, data: FormData) -> Self {
        Self::build(store, None, data)
    }

    pub fn with_instance(
        store: &dyn ModelStore,
        instance: &JournalEntryModel,
        data: FormData,
    ) -> Self {
        Self::build(store, Some(instance.clone()), data)
    }

    fn build(
        store: &dyn ModelStore,
        instance: Option<JournalEntryModel>,
        data: FormData,
    ) -> Self {
        let descriptor = FormDescriptor::new(
            "journal_entry",
            vec![
                FieldDescriptor::new("ledger", "Ledger", FieldKind::Reference(ledger_choices(store))),
                FieldDescriptor::new(
                    "parent",
                    "Parent",
                    FieldKind::Reference(journal_entry_choices(store)),
                )
                .with_optional(),
                FieldDescriptor::new(
                    "activity",
                    "Activity",
                    FieldKind::choices_from(JournalActivity::choices()),
                ),
                FieldDescriptor::new("date", "Date", FieldKind::Date),
                FieldDescriptor::new("description", "Description", FieldKind::Text)
                    .with_optional()
                    .with_widget(Widget::TextInput(input_attrs()))
                    .with_validator(Validator::MaxLength(JE_DESCRIPTION_MAX_LENGTH)),
            ],
        );
        Self {
            form: BoundForm::new(descriptor, data),
            instance,
        }
    }
}

impl ModelForm for JournalEntryModelForm {
    type Model = JournalEntryModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> JournalEntryModel {
        let ledger_id = cleaned.reference("ledger").unwrap_or_default();
        let activity = cleaned.choice("activity").unwrap_or_default();
        let date = cleaned.date("date").unwrap_or_default();

        let mut entry = match &self.instance {
            Some(existing) => {
                let mut entry = existing.clone();
                entry.ledger_id = ledger_id;
                entry.activity = activity;
                entry.date = date;
                entry
            }
            None => JournalEntryModel::new(ledger_id, activity, date),
        };
        entry.parent_id = cleaned.reference("parent");
        entry.description = cleaned.text("description");
        entry
    }
}
