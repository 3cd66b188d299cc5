//! Form component types and submission parsing.
//!
//! Resource forms are posted as flat `application/x-www-form-urlencoded`
//! maps. [`FormValues`] holds the raw strings so a rejected form can be
//! re-rendered exactly as submitted; [`FormParser`] turns them into typed
//! input, recording a field error for anything that does not parse.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dashdesk_core::{Choice, Price, ValidationErrors, humanize};

use super::data_table::FilterOption;

/// `datetime-local` input format, interpreted as UTC.
pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Raw submitted form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Trimmed value, empty when missing.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", |v| v.trim())
    }

    /// Trimmed value, `None` when missing or blank.
    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        Some(self.get(name)).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.get(name), "on" | "true" | "1" | "yes")
    }
}

impl From<BTreeMap<String, String>> for FormValues {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Url,
    Number,
    Decimal,
    DateTime,
    Password,
    TextArea,
    Select,
    Checkbox,
}

impl FieldKind {
    /// `type` attribute for `<input>` kinds.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Number | Self::Decimal => "number",
            Self::DateTime => "datetime-local",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::Text | Self::TextArea | Self::Select => "text",
        }
    }

    /// Which element renders this kind: `input`, `textarea`, `select` or `checkbox`.
    #[must_use]
    pub const fn widget(self) -> &'static str {
        match self {
            Self::TextArea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            _ => "input",
        }
    }
}

/// One rendered form field.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
    pub required: bool,
    pub help: Option<String>,
    /// Options for selects.
    pub options: Vec<FilterOption>,
    pub error: Option<String>,
}

impl FormField {
    fn build(kind: FieldKind, name: &str, label: &str, values: &FormValues) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            value: values.get(name).to_string(),
            required: false,
            help: None,
            options: vec![],
            error: None,
        }
    }

    #[must_use]
    pub fn text(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Text, name, label, values)
    }

    #[must_use]
    pub fn email(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Email, name, label, values)
    }

    #[must_use]
    pub fn tel(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Tel, name, label, values)
    }

    #[must_use]
    pub fn url(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Url, name, label, values)
    }

    #[must_use]
    pub fn number(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Number, name, label, values)
    }

    #[must_use]
    pub fn decimal(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::Decimal, name, label, values)
    }

    #[must_use]
    pub fn datetime(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::DateTime, name, label, values)
    }

    /// Password inputs never echo the submitted value back.
    #[must_use]
    pub fn password(name: &str, label: &str) -> Self {
        Self::build(FieldKind::Password, name, label, &FormValues::new())
    }

    #[must_use]
    pub fn textarea(name: &str, label: &str, values: &FormValues) -> Self {
        Self::build(FieldKind::TextArea, name, label, values)
    }

    #[must_use]
    pub fn checkbox(name: &str, label: &str, values: &FormValues) -> Self {
        let mut field = Self::build(FieldKind::Checkbox, name, label, values);
        field.value = if values.checked(name) { "on" } else { "" }.to_string();
        field
    }

    /// A select over every variant of a status enum.
    #[must_use]
    pub fn choice<T: Choice>(name: &str, label: &str, values: &FormValues) -> Self {
        Self::select(name, label, FilterOption::all::<T>(), values)
    }

    /// A select over arbitrary options.
    #[must_use]
    pub fn select(
        name: &str,
        label: &str,
        options: Vec<FilterOption>,
        values: &FormValues,
    ) -> Self {
        let mut field = Self::build(FieldKind::Select, name, label, values);
        field.options = FilterOption::select(options, values.get(name));
        field.required = true;
        field
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Attach the first error for each field.
#[must_use]
pub fn with_errors(mut fields: Vec<FormField>, errors: &ValidationErrors) -> Vec<FormField> {
    for field in &mut fields {
        field.error = errors.first(&field.name).map(str::to_string);
    }
    fields
}

/// Errors that belong to no rendered field, shown above the form.
#[must_use]
pub fn unmatched_errors(fields: &[FormField], errors: &ValidationErrors) -> Vec<String> {
    errors
        .errors()
        .iter()
        .filter(|e| !fields.iter().any(|f| f.name == e.field))
        .map(|e| e.message.clone())
        .collect()
}

/// Format a timestamp for a `datetime-local` input.
#[must_use]
pub fn datetime_value(at: &DateTime<Utc>) -> String {
    at.format(DATETIME_INPUT_FORMAT).to_string()
}

/// Typed reads over [`FormValues`] that collect parse failures.
#[derive(Debug)]
pub struct FormParser<'a> {
    values: &'a FormValues,
    errors: ValidationErrors,
}

impl<'a> FormParser<'a> {
    #[must_use]
    pub fn new(values: &'a FormValues) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
        }
    }

    /// Trimmed text; blank is left to the validation rules.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.values.get(name).to_string()
    }

    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        self.values.optional(name)
    }

    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        self.values.checked(name)
    }

    /// Record an error for `name`.
    pub fn error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    /// A status enum value; falls back to `default` with an error when the
    /// submitted value is unknown.
    pub fn choice<T: Choice>(&mut self, name: &str, default: T) -> T {
        let values = self.values;
        match values.get(name) {
            "" => {
                self.errors.add(name, format!("{} is required", humanize(name)));
                default
            }
            raw => T::from_str(raw).unwrap_or_else(|_| {
                self.errors.add(name, format!("Choose a valid {}", humanize(name).to_lowercase()));
                default
            }),
        }
    }

    /// Required value parsed with [`FromStr`].
    fn parse<T: FromStr>(&mut self, name: &str, what: &str) -> Option<T> {
        let values = self.values;
        let raw = values.get(name);
        if raw.is_empty() {
            self.errors.add(name, format!("{} is required", humanize(name)));
            return None;
        }
        self.parse_present(name, raw, what)
    }

    /// Optional value parsed with [`FromStr`]; blank is `None`.
    fn parse_optional<T: FromStr>(&mut self, name: &str, what: &str) -> Option<T> {
        let values = self.values;
        match values.get(name) {
            "" => None,
            raw => self.parse_present(name, raw, what),
        }
    }

    fn parse_present<T: FromStr>(&mut self, name: &str, raw: &str, what: &str) -> Option<T> {
        raw.parse().map_or_else(
            |_| {
                self.errors.add(name, format!("{} must be {what}", humanize(name)));
                None
            },
            Some,
        )
    }

    pub fn decimal(&mut self, name: &str) -> Decimal {
        self.parse(name, "a number").unwrap_or_default()
    }

    pub fn optional_decimal(&mut self, name: &str) -> Option<Decimal> {
        self.parse_optional(name, "a number")
    }

    pub fn price(&mut self, name: &str) -> Price {
        Price::new(self.decimal(name))
    }

    pub fn optional_price(&mut self, name: &str) -> Option<Price> {
        self.optional_decimal(name).map(Price::new)
    }

    pub fn whole_number(&mut self, name: &str) -> u32 {
        self.parse(name, "a whole number").unwrap_or_default()
    }

    pub fn optional_whole_number(&mut self, name: &str) -> Option<u32> {
        self.parse_optional(name, "a whole number")
    }

    /// A `datetime-local` value read as UTC.
    pub fn datetime(&mut self, name: &str) -> DateTime<Utc> {
        let values = self.values;
        let raw = values.get(name);
        if raw.is_empty() {
            self.errors.add(name, format!("{} is required", humanize(name)));
            return DateTime::<Utc>::UNIX_EPOCH;
        }
        NaiveDateTime::parse_from_str(raw, DATETIME_INPUT_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_or_else(
                |_| {
                    self.errors
                        .add(name, format!("{} must be a date and time", humanize(name)));
                    DateTime::<Utc>::UNIX_EPOCH
                },
                |naive| naive.and_utc(),
            )
    }

    /// Finish parsing: the input when every field parsed, otherwise the
    /// parse errors followed by whatever the input's own rules report.
    ///
    /// # Errors
    ///
    /// Returns the collected errors if any field failed to parse.
    pub fn finish<T: dashdesk_core::Validate>(self, input: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            return Ok(input);
        }
        let mut errors = self.errors;
        if let Err(rules) = input.validate() {
            for error in rules.errors() {
                if !errors.has(&error.field) {
                    errors.add(&error.field, error.message.clone());
                }
            }
        }
        Err(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dashdesk_core::{OrderStatus, Validator};

    use super::*;

    #[derive(Debug)]
    struct Sample {
        name: String,
    }

    impl dashdesk_core::Validate for Sample {
        fn validate(&self) -> Result<(), ValidationErrors> {
            Validator::new().required("name", &self.name).finish()
        }
    }

    #[test]
    fn test_values_are_trimmed() {
        let values = FormValues::new().with("name", "  Ngozi  ").with("note", "   ");
        assert_eq!(values.get("name"), "Ngozi");
        assert_eq!(values.optional("note"), None);
        assert_eq!(values.get("missing"), "");
    }

    #[test]
    fn test_widgets() {
        assert_eq!(FieldKind::TextArea.widget(), "textarea");
        assert_eq!(FieldKind::Select.widget(), "select");
        assert_eq!(FieldKind::DateTime.widget(), "input");
        assert_eq!(FieldKind::DateTime.input_type(), "datetime-local");
    }

    #[test]
    fn test_parse_errors_name_the_field() {
        let values = FormValues::new()
            .with("commission_rate", "abc")
            .with("usage_limit", "")
            .with("servings", "2.5");
        let mut parser = FormParser::new(&values);
        assert_eq!(parser.decimal("commission_rate"), Decimal::ZERO);
        assert_eq!(parser.optional_whole_number("usage_limit"), None);
        assert_eq!(parser.whole_number("servings"), 0);

        let errors = parser.finish(Sample { name: String::new() }).unwrap_err();
        assert_eq!(
            errors.first("commission_rate"),
            Some("Commission rate must be a number")
        );
        assert_eq!(errors.first("servings"), Some("Servings must be a whole number"));
        assert_eq!(errors.first("name"), Some("Name is required"));
        assert!(!errors.has("usage_limit"));
    }

    #[test]
    fn test_choice_parsing() {
        let values = FormValues::new().with("status", "picked_up").with("other", "warp");
        let mut parser = FormParser::new(&values);
        assert_eq!(parser.choice("status", OrderStatus::Pending), OrderStatus::PickedUp);
        assert_eq!(parser.choice("other", OrderStatus::Pending), OrderStatus::Pending);
        let errors = parser.finish(Sample { name: "x".into() }).unwrap_err();
        assert_eq!(errors.first("other"), Some("Choose a valid other"));
    }

    #[test]
    fn test_datetime_round_trip() {
        let values = FormValues::new().with("starts_at", "2026-11-06T09:30");
        let mut parser = FormParser::new(&values);
        let at = parser.datetime("starts_at");
        assert_eq!(datetime_value(&at), "2026-11-06T09:30");
        assert!(parser.finish(Sample { name: "x".into() }).is_ok());
    }

    #[test]
    fn test_fields_pick_up_values_and_errors() {
        let values = FormValues::new()
            .with("email", "nope")
            .with("status", "blocked")
            .with("password", "hunter22");
        let errors = ValidationErrors::single("email", "Email is not valid");
        let fields = with_errors(
            vec![
                FormField::email("email", "Email", &values).required(),
                FormField::choice::<dashdesk_core::CustomerStatus>("status", "Status", &values),
                FormField::password("password", "Password"),
            ],
            &errors,
        );

        assert_eq!(fields[0].value, "nope");
        assert_eq!(fields[0].error.as_deref(), Some("Email is not valid"));
        assert!(fields[1].options.iter().any(|o| o.selected && o.value == "blocked"));
        assert_eq!(fields[2].value, "");
    }

    #[test]
    fn test_unmatched_errors() {
        let fields = vec![FormField::text("name", "Name", &FormValues::new())];
        let mut errors = ValidationErrors::single("name", "Name is required");
        errors.add("items", "Add at least one item");
        assert_eq!(unmatched_errors(&fields, &errors), vec!["Add at least one item"]);
    }
}
