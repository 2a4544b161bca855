//! Generic bind/validate pipeline shared by every model form.
//!
//! A form is a [`FormDescriptor`] (the allowlist of fields with their kinds
//! and validators) bound to submitted [`FormData`]. Cleaning is a pure
//! function of the two, so validating the same input twice yields the same
//! [`FormErrors`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use strsim::levenshtein;

use super::fields::{FieldDescriptor, FieldValue};
use crate::models::{ChoiceEnum, RecordId};

/// Raw submitted values keyed by field name.
pub type FormData = BTreeMap<String, String>;

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

const SUGGESTION_DISTANCE: usize = 3;

/// Builds [`FormData`] from string pairs.
pub fn form_data<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> FormData
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Metadata describing a full form, including field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.key).collect()
    }

    fn suggest(&self, unknown: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .map(|field| (levenshtein(field.key, unknown), field.key))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, key)| key)
    }
}

/// Validation messages keyed by field name, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// Messages for `field`; empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field_errors(&self) -> &[String] {
        self.field(NON_FIELD_ERRORS)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Typed values of a form that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedData(BTreeMap<&'static str, FieldValue>);

impl CleanedData {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(FieldValue::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FieldValue::Flag(true)))
    }

    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.get(key) {
            Some(FieldValue::Decimal(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.get(key) {
            Some(FieldValue::Date(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn reference(&self, key: &str) -> Option<RecordId> {
        match self.get(key) {
            Some(FieldValue::Reference(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn choice<T: ChoiceEnum>(&self, key: &str) -> Option<T> {
        match self.get(key) {
            Some(FieldValue::Choice(value)) => T::from_value(value),
            _ => None,
        }
    }
}

/// A descriptor bound to submitted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundForm {
    descriptor: FormDescriptor,
    data: FormData,
    empty_permitted: bool,
}

impl BoundForm {
    pub fn new(descriptor: FormDescriptor, data: FormData) -> Self {
        for key in data.keys() {
            if descriptor.field(key).is_some() {
                continue;
            }
            match descriptor.suggest(key) {
                Some(best) => tracing::debug!(
                    form = descriptor.name,
                    field = %key,
                    "ignoring field outside allowlist (did you mean `{}`?)",
                    best
                ),
                None => tracing::debug!(
                    form = descriptor.name,
                    field = %key,
                    "ignoring field outside allowlist"
                ),
            }
        }
        Self {
            descriptor,
            data,
            empty_permitted: false,
        }
    }

    /// Lets an untouched form validate as empty instead of reporting
    /// required-field errors.
    pub fn with_empty_permitted(mut self) -> Self {
        self.empty_permitted = true;
        self
    }

    pub fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// True when any allowlisted field carries user input.
    pub fn has_changed(&self) -> bool {
        self.descriptor
            .fields
            .iter()
            .any(|field| field.is_filled(self.raw(field.key)))
    }

    pub fn clean(&self) -> Result<CleanedData, FormErrors> {
        if self.empty_permitted && !self.has_changed() {
            return Ok(CleanedData::default());
        }

        let mut cleaned = BTreeMap::new();
        let mut errors = FormErrors::new();
        for field in &self.descriptor.fields {
            match field.clean(self.raw(field.key)) {
                Ok(value) => {
                    cleaned.insert(field.key, value);
                }
                Err(failures) => {
                    for failure in failures {
                        errors.add(field.key, failure.message);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(CleanedData(cleaned))
        } else {
            tracing::debug!(
                form = self.descriptor.name,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "form validation failed"
            );
            Err(errors)
        }
    }
}

/// A form bound to one record type.
///
/// Implementors supply the bound form and how cleaned values populate a
/// record; validation and instance production come for free.
pub trait ModelForm {
    type Model;

    fn bound(&self) -> &BoundForm;

    /// Builds the record from values that already passed validation.
    fn construct(&self, cleaned: &CleanedData) -> Self::Model;

    fn fields(&self) -> &[FieldDescriptor] {
        &self.bound().descriptor().fields
    }

    fn validate(&self) -> Result<CleanedData, FormErrors> {
        self.bound().clean()
    }

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn errors(&self) -> FormErrors {
        self.validate().err().unwrap_or_default()
    }

    /// The populated, not yet persisted record.
    fn instance(&self) -> Result<Self::Model, FormErrors> {
        let cleaned = self.validate()?;
        Ok(self.construct(&cleaned))
    }
}
