use std::collections::HashSet;

use super::engine::{BoundForm, CleanedData, FormData, FormDescriptor, ModelForm};
use super::fields::{FieldDescriptor, FieldKind, Validator, Widget};
use super::input_attrs;
use crate::models::coa::{COA_NAME_MAX_LENGTH, COA_SLUG_MAX_LENGTH};
use crate::models::entity::ENTITY_NAME_MAX_LENGTH;
use crate::models::{ChartOfAccountModel, EntityModel, ModelStore};

/// Creates or renames a bookkeeping entity. Accepts `name` only.
#[derive(Debug, Clone)]
pub struct EntityModelForm {
    form: BoundForm,
    instance: Option<EntityModel>,
}

impl EntityModelForm {
    pub fn new(data: FormData) -> Self {
        Self::build(None, data)
    }

    pub fn with_instance(instance: &EntityModel, data: FormData) -> Self {
        Self::build(Some(instance.clone()), data)
    }

    fn build(instance: Option<EntityModel>, data: FormData) -> Self {
        let descriptor = FormDescriptor::new(
            "entity",
            vec![FieldDescriptor::new("name", "Entity Name", FieldKind::Text)
                .with_widget(Widget::TextInput(
                    input_attrs().with_placeholder("Entity name..."),
                ))
                .with_validator(Validator::MaxLength(ENTITY_NAME_MAX_LENGTH))],
        );
        Self {
            form: BoundForm::new(descriptor, data),
            instance,
        }
    }
}

impl ModelForm for EntityModelForm {
    type Model = EntityModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> EntityModel {
        let mut entity = self.instance.clone().unwrap_or_default();
        entity.name = cleaned.text("name").unwrap_or_default();
        entity
    }
}

/// Creates or edits a chart of accounts: `slug`, `name`, `description`.
///
/// The slug must be unique among stored charts; when editing, the chart's
/// own slug does not count as taken.
#[derive(Debug, Clone)]
pub struct ChartOfAccountsModelForm {
    form: BoundForm,
    instance: Option<ChartOfAccountModel>,
}

impl ChartOfAccountsModelForm {
    pub fn new(store: &dyn ModelStore, data: FormData) -> Self {
        Self::build(store, None, data)
    }

    pub fn with_instance(
        store: &dyn ModelStore,
        instance: &ChartOfAccountModel,
        data: FormData,
    ) -> Self {
        Self::build(store, Some(instance.clone()), data)
    }

    fn build(
        store: &dyn ModelStore,
        instance: Option<ChartOfAccountModel>,
        data: FormData,
    ) -> Self {
        let own_id = instance.as_ref().and_then(|chart| chart.id);
        let taken: HashSet<String> = store
            .charts()
            .into_iter()
            .filter(|chart| own_id.is_none() || chart.id != own_id)
            .map(|chart| chart.slug)
            .collect();

        let descriptor = FormDescriptor::new(
            "chart_of_accounts",
            vec![
                FieldDescriptor::new("slug", "CoA ID", FieldKind::Slug)
                    .with_widget(Widget::TextInput(input_attrs()))
                    .with_validator(Validator::MaxLength(COA_SLUG_MAX_LENGTH))
                    .with_validator(Validator::Unique {
                        existing: taken,
                        message: "Chart of accounts with this CoA ID already exists.".into(),
                    }),
                FieldDescriptor::new("name", "Name", FieldKind::Text)
                    .with_optional()
                    .with_widget(Widget::TextInput(input_attrs()))
                    .with_validator(Validator::MaxLength(COA_NAME_MAX_LENGTH)),
                FieldDescriptor::new("description", "Description", FieldKind::Text)
                    .with_optional()
                    .with_widget(Widget::Textarea(input_attrs())),
            ],
        );
        Self {
            form: BoundForm::new(descriptor, data),
            instance,
        }
    }
}

impl ModelForm for ChartOfAccountsModelForm {
    type Model = ChartOfAccountModel;

    fn bound(&self) -> &BoundForm {
        &self.form
    }

    fn construct(&self, cleaned: &CleanedData) -> ChartOfAccountModel {
        let mut chart = self.instance.clone().unwrap_or_default();
        chart.slug = cleaned.text("slug").unwrap_or_default();
        chart.name = cleaned.text("name");
        chart.description = cleaned.text("description");
        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::engine::form_data;
    use crate::models::{MemoryStore, RecordId};

    #[test]
    fn entity_form_binds_name() {
        let form = EntityModelForm::new(form_data([("name", "  Acme LLC ")]));
        let entity = form.instance().unwrap();
        assert_eq!(entity.name, "Acme LLC");
        assert_eq!(entity.id, None);
    }

    #[test]
    fn entity_form_presentation() {
        let form = EntityModelForm::new(FormData::new());
        let field = &form.fields()[0];
        assert_eq!(field.label, "Entity Name");
        let attrs = field.widget.attrs().unwrap();
        assert_eq!(attrs.placeholder.as_deref(), Some("Entity name..."));
        assert!(attrs.class.is_some());
    }

    #[test]
    fn entity_update_keeps_identity() {
        let existing = EntityModel::new("Old").with_id(3).with_slug("old-xyz");
        let form = EntityModelForm::with_instance(&existing, form_data([("name", "New")]));
        let entity = form.instance().unwrap();
        assert_eq!(entity.id, Some(RecordId(3)));
        assert_eq!(entity.slug, "old-xyz");
        assert_eq!(entity.name, "New");
    }

    #[test]
    fn chart_slug_must_be_unique() {
        let mut store = MemoryStore::new();
        store.add_chart(ChartOfAccountModel::new("ops"));
        let form = ChartOfAccountsModelForm::new(&store, form_data([("slug", "ops")]));
        assert_eq!(
            form.errors().field("slug"),
            ["Chart of accounts with this CoA ID already exists."]
        );
    }

    #[test]
    fn chart_edit_may_keep_own_slug() {
        let mut store = MemoryStore::new();
        let id = store.add_chart(ChartOfAccountModel::new("ops").with_name("Operations"));
        let existing = store.charts[0].clone();
        let form = ChartOfAccountsModelForm::with_instance(
            &store,
            &existing,
            form_data([("slug", "ops"), ("description", "Main chart")]),
        );
        let chart = form.instance().unwrap();
        assert_eq!(chart.id, Some(id));
        assert_eq!(chart.name, None);
        assert_eq!(chart.description.as_deref(), Some("Main chart"));
    }

    #[test]
    fn chart_description_uses_textarea() {
        let store = MemoryStore::new();
        let form = ChartOfAccountsModelForm::new(&store, FormData::new());
        let labels: Vec<&str> = form.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["CoA ID", "Name", "Description"]);
        assert!(matches!(form.fields()[2].widget, Widget::Textarea(_)));
    }
}
