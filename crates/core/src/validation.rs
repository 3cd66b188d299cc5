//! Form validation rules.
//!
//! Every create/update payload is checked before it is submitted to the
//! marketplace API. Validation collects all field errors instead of stopping at
//! the first one, so a form can highlight every problem at once.
//!
//! ```
//! use dashdesk_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "")
//!     .email("email", "not-an-email")
//!     .finish();
//!
//! let errors = result.unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.first("name"), Some("Name is required"));
//! ```

use core::fmt::Display;

use serde::Serialize;

use crate::types::Email;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name.
    pub field: String,
    /// Message shown next to the field.
    pub message: String,
}

/// All failed rules for one form submission, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}", summarize(.errors))]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create an error set holding a single error.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_owned(),
            message: message.into(),
        });
    }

    /// Append every error from `other`.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Whether no rule failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// All errors in order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` has at least one error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// The first message recorded for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Types that can check themselves before submission.
pub trait Validate {
    /// Run every rule for this value.
    ///
    /// # Errors
    ///
    /// Returns all failed rules.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Builder that runs rules and accumulates their failures.
///
/// Format and length rules skip blank values; pair them with
/// [`Validator::required`] when the field is mandatory.
#[derive(Debug, Default)]
#[must_use]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Minimum digits in a phone number.
    pub const PHONE_MIN_DIGITS: usize = 7;
    /// Maximum digits in a phone number (E.164).
    pub const PHONE_MAX_DIGITS: usize = 15;

    /// Start an empty validation run.
    pub const fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    /// The field must contain something other than whitespace.
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors
                .add(field, format!("{} is required", humanize(field)));
        }
        self
    }

    /// The trimmed value must have at least `min` characters.
    pub fn min_len(mut self, field: &str, value: &str, min: usize) -> Self {
        let len = value.trim().chars().count();
        if len > 0 && len < min {
            self.errors.add(
                field,
                format!("{} must be at least {min} characters", humanize(field)),
            );
        }
        self
    }

    /// The trimmed value must have at most `max` characters.
    pub fn max_len(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.trim().chars().count() > max {
            self.errors.add(
                field,
                format!("{} must be at most {max} characters", humanize(field)),
            );
        }
        self
    }

    /// The value must be a well-formed email address.
    pub fn email(mut self, field: &str, value: &str) -> Self {
        if !value.trim().is_empty()
            && let Err(e) = Email::parse(value)
        {
            self.errors.add(field, capitalize(&e.to_string()));
        }
        self
    }

    /// The value must be an absolute `http` or `https` URL with a host.
    pub fn url(mut self, field: &str, value: &str) -> Self {
        if !value.trim().is_empty() && !is_web_url(value.trim()) {
            self.errors.add(
                field,
                format!("{} must be a valid http(s) URL", humanize(field)),
            );
        }
        self
    }

    /// The value must be a phone number with 7-15 digits.
    ///
    /// A leading `+` is allowed, as are spaces, dashes, dots and parentheses
    /// between digits.
    pub fn phone(mut self, field: &str, value: &str) -> Self {
        if !value.trim().is_empty() && !is_phone(value.trim()) {
            self.errors.add(
                field,
                format!("{} must be a valid phone number", humanize(field)),
            );
        }
        self
    }

    /// The value must lie within `min..=max`.
    pub fn range<T: PartialOrd + Display>(mut self, field: &str, value: T, min: T, max: T) -> Self {
        if value < min || value > max {
            self.errors.add(
                field,
                format!("{} must be between {min} and {max}", humanize(field)),
            );
        }
        self
    }

    /// The value must be at least `min`.
    pub fn at_least<T: PartialOrd + Display>(mut self, field: &str, value: T, min: T) -> Self {
        if value < min {
            self.errors
                .add(field, format!("{} must be at least {min}", humanize(field)));
        }
        self
    }

    /// The value must be strictly greater than zero.
    pub fn positive<T: PartialOrd + Default>(mut self, field: &str, value: T) -> Self {
        if value <= T::default() {
            self.errors
                .add(field, format!("{} must be greater than 0", humanize(field)));
        }
        self
    }

    /// Record `message` for `field` unless `ok` holds.
    pub fn check(mut self, field: &str, ok: bool, message: impl Into<String>) -> Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    /// Fold in errors produced elsewhere (e.g. nested items).
    pub fn extend(mut self, errors: ValidationErrors) -> Self {
        self.errors.merge(errors);
        self
    }

    /// Finish the run.
    ///
    /// # Errors
    ///
    /// Returns every recorded error if any rule failed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

fn is_web_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| {
        matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn is_phone(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let mut digits = 0usize;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    (Validator::PHONE_MIN_DIGITS..=Validator::PHONE_MAX_DIGITS).contains(&digits)
}

/// Turn a field name into a sentence-case label (`business_name` becomes "Business name").
#[must_use]
pub fn humanize(field: &str) -> String {
    capitalize(&field.replace('_', " "))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let errors = Validator::new()
            .required("business_name", "   ")
            .finish()
            .unwrap_err();
        assert_eq!(errors.first("business_name"), Some("Business name is required"));
    }

    #[test]
    fn test_length_rules_skip_blank_values() {
        assert!(Validator::new().min_len("name", "", 2).finish().is_ok());
        assert!(Validator::new().min_len("name", "Al", 2).finish().is_ok());

        let errors = Validator::new().min_len("name", " A ", 2).finish().unwrap_err();
        assert_eq!(errors.first("name"), Some("Name must be at least 2 characters"));

        let errors = Validator::new().max_len("code", "ABCDEF", 5).finish().unwrap_err();
        assert_eq!(errors.first("code"), Some("Code must be at most 5 characters"));
    }

    #[test]
    fn test_min_len_counts_characters_not_bytes() {
        assert!(Validator::new().min_len("name", "Zoë", 3).finish().is_ok());
    }

    #[test]
    fn test_email_rule() {
        assert!(Validator::new().email("email", "ops@example.com").finish().is_ok());

        let errors = Validator::new().email("email", "ops@localhost").finish().unwrap_err();
        assert_eq!(errors.first("email"), Some("Email domain must look like example.com"));
    }

    #[test]
    fn test_url_rule() {
        assert!(Validator::new().url("image_url", "https://cdn.example.com/a.png").finish().is_ok());
        assert!(Validator::new().url("image_url", "ftp://example.com/a.png").finish().is_err());
        assert!(Validator::new().url("image_url", "/relative/path.png").finish().is_err());
        assert!(Validator::new().url("image_url", "").finish().is_ok());
    }

    #[test]
    fn test_phone_rule() {
        assert!(is_phone("+1 (555) 010-9999"));
        assert!(is_phone("0801234567"));
        assert!(!is_phone("12345"));
        assert!(!is_phone("+1234567890123456"));
        assert!(!is_phone("555-CALL-NOW"));
    }

    #[test]
    fn test_numeric_rules() {
        let errors = Validator::new()
            .range("commission_rate", 120, 0, 100)
            .at_least("servings", 0, 1)
            .finish()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.first("commission_rate"),
            Some("Commission rate must be between 0 and 100")
        );
        assert_eq!(errors.first("servings"), Some("Servings must be at least 1"));
    }

    #[test]
    fn test_positive() {
        let errors = Validator::new()
            .positive("delivery_fee", 0)
            .positive("quantity", 3)
            .finish()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first("delivery_fee"),
            Some("Delivery fee must be greater than 0")
        );
    }

    #[test]
    fn test_collects_all_errors_in_order() {
        let errors = Validator::new()
            .required("name", "")
            .email("email", "bad")
            .check("ends_at", false, "End must be after start")
            .finish()
            .unwrap_err();

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "email", "ends_at"]);
        assert_eq!(
            errors.to_string(),
            "name: Name is required; email: Email must contain a single @ symbol; ends_at: End must be after start"
        );
    }

    #[test]
    fn test_serializes_as_list() {
        let errors = ValidationErrors::single("code", "Code is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!([{"field": "code", "message": "Code is required"}]));
    }
}
