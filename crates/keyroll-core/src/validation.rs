//! Field validation rules.
//!
//! Rules are pure and synchronous. A field carries an ordered list of rules;
//! the first failing rule decides the message and blocks the commit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language used for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

/// One option of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The value held by a cell while it is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text input. `None` means the field has no value at all.
    Text(Option<String>),
    /// Select input. `None` means nothing is selected.
    Select(Option<SelectOption>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(Some(value.into()))
    }

    /// The string the rules look at: the text, or the option's `value`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => text.as_deref(),
            FieldValue::Select(option) => option.as_ref().map(|o| o.value.as_str()),
        }
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Must be at most {max} characters")]
    TooLong { max: usize },
}

impl ValidationError {
    /// The message shown next to the field.
    pub fn message(&self, locale: Locale) -> String {
        match (self, locale) {
            (_, Locale::En) => self.to_string(),
            (ValidationError::Required, Locale::De) => "Dieses Feld ist erforderlich".to_string(),
            (ValidationError::TooLong { max }, Locale::De) => {
                format!("Höchstens {max} Zeichen erlaubt")
            }
        }
    }
}

/// Fails when the value is absent or empty.
pub fn required(value: &FieldValue) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(ValidationError::Required),
    }
}

/// Fails when the value is longer than `max` characters. An absent value
/// passes; pair with [`required`] to reject it.
pub fn limited_length(value: &FieldValue, max: usize) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if s.chars().count() > max => Err(ValidationError::TooLong { max }),
        _ => Ok(()),
    }
}

/// A composable rule primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    LimitedLength(usize),
}

impl Rule {
    pub fn check(&self, value: &FieldValue) -> Result<(), ValidationError> {
        match *self {
            Rule::Required => required(value),
            Rule::LimitedLength(max) => limited_length(value, max),
        }
    }
}

/// Run `rules` in order and return the first localized failure.
pub fn validate(rules: &[Rule], value: &FieldValue, locale: Locale) -> Result<(), String> {
    rules
        .iter()
        .try_for_each(|rule| rule.check(value))
        .map_err(|e| e.message(locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_empty_and_absent() {
        assert_eq!(required(&FieldValue::text("")), Err(ValidationError::Required));
        assert_eq!(required(&FieldValue::Text(None)), Err(ValidationError::Required));
        assert_eq!(required(&FieldValue::text("x")), Ok(()));
    }

    #[test]
    fn required_checks_select_value() {
        assert!(required(&FieldValue::Select(None)).is_err());
        assert!(required(&FieldValue::Select(Some(SelectOption::new("", "None")))).is_err());
        assert!(required(&FieldValue::Select(Some(SelectOption::new("local", "Local")))).is_ok());
    }

    #[test]
    fn limited_length_boundary() {
        assert_eq!(limited_length(&FieldValue::text("a".repeat(50)), 50), Ok(()));
        assert_eq!(
            limited_length(&FieldValue::text("a".repeat(51)), 50),
            Err(ValidationError::TooLong { max: 50 })
        );
    }

    #[test]
    fn limited_length_counts_characters() {
        assert!(limited_length(&FieldValue::text("ä".repeat(10)), 10).is_ok());
    }

    #[test]
    fn first_failing_rule_wins() {
        let rules = [Rule::Required, Rule::LimitedLength(3)];
        assert_eq!(
            validate(&rules, &FieldValue::text(""), Locale::En),
            Err("This field is required".to_string())
        );
        assert_eq!(
            validate(&rules, &FieldValue::text("abcd"), Locale::De),
            Err("Höchstens 3 Zeichen erlaubt".to_string())
        );
        assert_eq!(validate(&rules, &FieldValue::text("abc"), Locale::En), Ok(()));
    }
}
