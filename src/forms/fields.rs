//! Field-level building blocks: what a field accepts, how it is rendered and
//! how a raw submitted string becomes a typed value.

use std::collections::HashSet;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::ValidationError;
use crate::models::RecordId;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_REFERENCE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
const FALSE_VALUES: &[&str] = &["false", "0", "off", "no"];

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// One entry of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub label: String,
}

impl<T> Choice<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Supported data kinds for form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Slug,
    Boolean,
    Decimal,
    Date,
    /// Fixed catalog of stored values.
    Choice(Vec<Choice<String>>),
    /// Records resolved from the store when the form is built.
    Reference(Vec<Choice<RecordId>>),
}

impl FieldKind {
    pub fn choices_from(pairs: Vec<(&'static str, &'static str)>) -> Self {
        FieldKind::Choice(
            pairs
                .into_iter()
                .map(|(value, label)| Choice::new(value.to_string(), label))
                .collect(),
        )
    }

    fn default_widget(&self) -> Widget {
        match self {
            FieldKind::Text | FieldKind::Slug => Widget::TextInput(WidgetAttrs::default()),
            FieldKind::Boolean => Widget::CheckboxInput,
            FieldKind::Decimal => Widget::NumberInput(WidgetAttrs::default()),
            FieldKind::Date => Widget::DateInput(WidgetAttrs::default()),
            FieldKind::Choice(_) | FieldKind::Reference(_) => Widget::Select,
        }
    }
}

/// HTML attributes carried by text-like widgets. Purely cosmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetAttrs {
    pub class: Option<String>,
    pub placeholder: Option<String>,
}

impl WidgetAttrs {
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextInput(WidgetAttrs),
    Textarea(WidgetAttrs),
    NumberInput(WidgetAttrs),
    DateInput(WidgetAttrs),
    CheckboxInput,
    Select,
    HiddenInput,
}

impl Widget {
    pub fn attrs(&self) -> Option<&WidgetAttrs> {
        match self {
            Widget::TextInput(attrs)
            | Widget::Textarea(attrs)
            | Widget::NumberInput(attrs)
            | Widget::DateInput(attrs) => Some(attrs),
            Widget::CheckboxInput | Widget::Select | Widget::HiddenInput => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Widget::HiddenInput)
    }
}

/// A successfully converted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Optional field left blank.
    Empty,
    Text(String),
    Flag(bool),
    Decimal(Decimal),
    Date(NaiveDate),
    Choice(String),
    Reference(RecordId),
}

/// Constraints checked after a value has been converted. Blank values skip them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    MaxLength(usize),
    MinValue(Decimal),
    DecimalDigits { max_digits: u32, decimal_places: u32 },
    /// Rejects text already used by another record.
    Unique {
        existing: HashSet<String>,
        message: String,
    },
}

impl Validator {
    fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        match (self, value) {
            (Validator::MaxLength(max), FieldValue::Text(text)) => {
                let length = text.chars().count();
                if length > *max {
                    Err(ValidationError::new(format!(
                        "Ensure this value has at most {} characters (it has {}).",
                        max, length
                    )))
                } else {
                    Ok(())
                }
            }
            (Validator::MinValue(min), FieldValue::Decimal(amount)) => {
                if amount < min {
                    Err(ValidationError::new(format!(
                        "Ensure this value is greater than or equal to {}.",
                        min
                    )))
                } else {
                    Ok(())
                }
            }
            (
                Validator::DecimalDigits {
                    max_digits,
                    decimal_places,
                },
                FieldValue::Decimal(amount),
            ) => check_digits(*amount, *max_digits, *decimal_places),
            (Validator::Unique { existing, message }, FieldValue::Text(text)) => {
                if existing.contains(text) {
                    Err(ValidationError::new(message.clone()))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

fn check_digits(amount: Decimal, max_digits: u32, decimal_places: u32) -> Result<(), ValidationError> {
    let significant = amount.mantissa().unsigned_abs().to_string().len() as u32;
    let decimals = amount.scale();
    let digits = significant.max(decimals);
    let whole_digits = digits - decimals;

    if digits > max_digits {
        Err(ValidationError::new(format!(
            "Ensure that there are no more than {} digits in total.",
            max_digits
        )))
    } else if decimals > decimal_places {
        Err(ValidationError::new(format!(
            "Ensure that there are no more than {} decimal places.",
            decimal_places
        )))
    } else if whole_digits > max_digits.saturating_sub(decimal_places) {
        Err(ValidationError::new(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            max_digits.saturating_sub(decimal_places)
        )))
    } else {
        Ok(())
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub widget: Widget,
    pub validators: Vec<Validator>,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: impl Into<String>, kind: FieldKind) -> Self {
        let widget = kind.default_widget();
        Self {
            key,
            label: label.into(),
            required: !matches!(kind, FieldKind::Boolean),
            kind,
            widget,
            validators: Vec::new(),
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Stored values (or record ids) this field accepts, when it is a select.
    pub fn choice_values(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Choice(options) => options.iter().map(|c| c.value.clone()).collect(),
            FieldKind::Reference(options) => options.iter().map(|c| c.value.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `raw` carries anything the user actually entered.
    pub fn is_filled(&self, raw: Option<&str>) -> bool {
        match raw.map(str::trim) {
            None | Some("") => false,
            Some(value) => match self.kind {
                FieldKind::Boolean => parse_flag(value),
                _ => true,
            },
        }
    }

    /// Converts a raw submitted value and runs the field's validators.
    pub fn clean(&self, raw: Option<&str>) -> Result<FieldValue, Vec<ValidationError>> {
        let value = self.to_value(raw).map_err(|err| vec![err])?;
        if value == FieldValue::Empty {
            return Ok(value);
        }
        let errors: Vec<ValidationError> = self
            .validators
            .iter()
            .filter_map(|validator| validator.validate(&value).err())
            .collect();
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(errors)
        }
    }

    fn to_value(&self, raw: Option<&str>) -> Result<FieldValue, ValidationError> {
        let trimmed = raw.map(str::trim).unwrap_or_default();

        if let FieldKind::Boolean = self.kind {
            return Ok(FieldValue::Flag(parse_flag(trimmed)));
        }
        if trimmed.is_empty() {
            return if self.required {
                Err(ValidationError::new(REQUIRED_MESSAGE))
            } else {
                Ok(FieldValue::Empty)
            };
        }

        match &self.kind {
            FieldKind::Text => Ok(FieldValue::Text(trimmed.to_string())),
            FieldKind::Slug => {
                if SLUG_RE.is_match(trimmed) {
                    Ok(FieldValue::Text(trimmed.to_string()))
                } else {
                    Err(ValidationError::new(
                        "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                    ))
                }
            }
            FieldKind::Decimal => trimmed
                .parse::<Decimal>()
                .map(FieldValue::Decimal)
                .map_err(|_| ValidationError::new("Enter a number.")),
            FieldKind::Date => parse_date(trimmed)
                .map(FieldValue::Date)
                .ok_or_else(|| ValidationError::new("Enter a valid date.")),
            FieldKind::Choice(options) => options
                .iter()
                .find(|choice| choice.value == trimmed)
                .map(|choice| FieldValue::Choice(choice.value.clone()))
                .ok_or_else(|| {
                    ValidationError::new(format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        trimmed
                    ))
                }),
            FieldKind::Reference(options) => trimmed
                .parse::<RecordId>()
                .ok()
                .filter(|id| options.iter().any(|choice| choice.value == *id))
                .map(FieldValue::Reference)
                .ok_or_else(|| ValidationError::new(INVALID_REFERENCE_MESSAGE)),
            FieldKind::Boolean => Ok(FieldValue::Flag(parse_flag(trimmed))),
        }
    }
}

/// Checkbox semantics: absent or an explicit false-like word is `false`.
pub fn parse_flag(raw: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    !(normalized.is_empty() || FALSE_VALUES.contains(&normalized.as_str()))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount_field() -> FieldDescriptor {
        FieldDescriptor::new("amount", "Amount", FieldKind::Decimal)
            .with_validator(Validator::MinValue(Decimal::ZERO))
            .with_validator(Validator::DecimalDigits {
                max_digits: 20,
                decimal_places: 2,
            })
    }

    fn messages(result: Result<FieldValue, Vec<ValidationError>>) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|err| err.message)
            .collect()
    }

    #[test]
    fn required_text_rejects_blank() {
        let field = FieldDescriptor::new("name", "Name", FieldKind::Text);
        assert_eq!(messages(field.clean(Some("   "))), vec![REQUIRED_MESSAGE]);
        assert_eq!(messages(field.clean(None)), vec![REQUIRED_MESSAGE]);
    }

    #[test]
    fn optional_text_allows_blank_and_trims() {
        let field = FieldDescriptor::new("name", "Name", FieldKind::Text).with_optional();
        assert_eq!(field.clean(None).unwrap(), FieldValue::Empty);
        assert_eq!(
            field.clean(Some("  Ops  ")).unwrap(),
            FieldValue::Text("Ops".into())
        );
    }

    #[test]
    fn max_length_counts_characters() {
        let field = FieldDescriptor::new("code", "Code", FieldKind::Text)
            .with_validator(Validator::MaxLength(4));
        assert!(field.clean(Some("1010")).is_ok());
        assert_eq!(
            messages(field.clean(Some("10100"))),
            vec!["Ensure this value has at most 4 characters (it has 5)."]
        );
    }

    #[test]
    fn amount_must_be_non_negative_number() {
        let field = amount_field();
        assert_eq!(
            field.clean(Some("100.00")).unwrap(),
            FieldValue::Decimal(dec!(100.00))
        );
        assert_eq!(field.clean(Some("0")).unwrap(), FieldValue::Decimal(dec!(0)));
        assert_eq!(messages(field.clean(Some("abc"))), vec!["Enter a number."]);
        assert_eq!(
            messages(field.clean(Some("-1.00"))),
            vec!["Ensure this value is greater than or equal to 0."]
        );
    }

    #[test]
    fn amount_digit_limits() {
        let field = amount_field();
        assert_eq!(
            messages(field.clean(Some("1.005"))),
            vec!["Ensure that there are no more than 2 decimal places."]
        );
        assert_eq!(
            messages(field.clean(Some("1234567890123456789"))),
            vec!["Ensure that there are no more than 18 digits before the decimal point."]
        );
        assert_eq!(
            messages(field.clean(Some("123456789012345678901"))),
            vec!["Ensure that there are no more than 20 digits in total."]
        );
    }

    #[test]
    fn choice_matches_stored_value_exactly() {
        let field = FieldDescriptor::new(
            "tx_type",
            "Tx type",
            FieldKind::choices_from(vec![("debit", "Debit"), ("credit", "Credit")]),
        );
        assert_eq!(
            field.clean(Some("credit")).unwrap(),
            FieldValue::Choice("credit".into())
        );
        assert_eq!(
            messages(field.clean(Some("Credit"))),
            vec!["Select a valid choice. Credit is not one of the available choices."]
        );
    }

    #[test]
    fn reference_requires_listed_id() {
        let field = FieldDescriptor::new(
            "parent",
            "Parent",
            FieldKind::Reference(vec![Choice::new(RecordId(3), "1000 - Assets")]),
        )
        .with_optional();
        assert_eq!(
            field.clean(Some("3")).unwrap(),
            FieldValue::Reference(RecordId(3))
        );
        assert_eq!(field.clean(Some("")).unwrap(), FieldValue::Empty);
        assert_eq!(messages(field.clean(Some("4"))), vec![INVALID_REFERENCE_MESSAGE]);
        assert_eq!(messages(field.clean(Some("x"))), vec![INVALID_REFERENCE_MESSAGE]);
    }

    #[test]
    fn dates_accept_several_formats() {
        let field = FieldDescriptor::new("date", "Date", FieldKind::Date);
        let expected = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(field.clean(Some("2024-03-15")).unwrap(), expected);
        assert_eq!(field.clean(Some("03/15/2024")).unwrap(), expected);
        assert_eq!(messages(field.clean(Some("15.03.2024"))), vec!["Enter a valid date."]);
    }

    #[test]
    fn booleans_follow_checkbox_semantics() {
        let field = FieldDescriptor::new("locked", "Locked", FieldKind::Boolean);
        assert!(!field.required);
        assert_eq!(field.clean(None).unwrap(), FieldValue::Flag(false));
        assert_eq!(field.clean(Some("on")).unwrap(), FieldValue::Flag(true));
        assert_eq!(field.clean(Some("False")).unwrap(), FieldValue::Flag(false));
        assert!(!field.is_filled(Some("0")));
    }

    #[test]
    fn slug_charset_and_uniqueness() {
        let field = FieldDescriptor::new("slug", "CoA ID", FieldKind::Slug).with_validator(
            Validator::Unique {
                existing: HashSet::from(["ops".to_string()]),
                message: "taken".into(),
            },
        );
        assert!(field.clean(Some("ops-2024")).is_ok());
        assert_eq!(messages(field.clean(Some("ops"))), vec!["taken"]);
        assert_eq!(
            messages(field.clean(Some("ops 2024"))),
            vec!["Enter a valid slug consisting of letters, numbers, underscores or hyphens."]
        );
    }
}
