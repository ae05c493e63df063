//! Field validation rules and the structured error set they produce.
//!
//! Drafts (`NewUser`, `NewSecret`, `NewComment`) declare their constraints
//! with `validator` derives; the custom rules below cover what the derive
//! cannot express. Failures are collected into [`FieldErrors`], ordered the
//! way the form declares its fields.

use std::borrow::Cow;
use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

use crate::config::MIN_REGISTRATION_AGE;

// =============================================================================
// Messages
// =============================================================================

pub const INVALID_EMAIL: &str = "Not a valid email address";
pub const EMAIL_TAKEN: &str = "Email already exists in the system";
pub const INVALID_BIRTHDAY: &str = "Please enter a valid birthday";
pub const TOO_YOUNG: &str = "You must be at least 13 years old to register";

/// `\w` is ASCII-only here; non-ASCII local parts are rejected.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
        .unicode(false)
        .build()
        .expect("email pattern is valid")
});

/// Accepted birthday formats: HTML date inputs first, then US style.
const BIRTHDAY_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Check an address against the standard email pattern. No DNS lookup.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Full calendar years elapsed between `birthdate` and `today`.
///
/// A 29 February birthday is reached on 1 March in non-leap years.
/// Birthdates in the future yield a negative age.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// True iff someone born on `birthdate` is old enough to register today.
pub fn validate_age(birthdate: NaiveDate) -> bool {
    is_old_enough(birthdate, Utc::now().date_naive())
}

/// Age check against an explicit reference date.
pub fn is_old_enough(birthdate: NaiveDate, today: NaiveDate) -> bool {
    age_on(birthdate, today) >= MIN_REGISTRATION_AGE as i32
}

/// Parse a submitted birthday.
pub fn parse_birthday(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    BIRTHDAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

// =============================================================================
// Custom validators (validator derive hooks)
// =============================================================================

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn email_format(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(error("email", INVALID_EMAIL))
    }
}

pub(crate) fn minimum_age(birthday: &str) -> Result<(), ValidationError> {
    let date = parse_birthday(birthday).ok_or_else(|| error("date", INVALID_BIRTHDAY))?;
    if validate_age(date) {
        Ok(())
    } else {
        Err(error("age", TOO_YOUNG))
    }
}

/// Treat absent, empty and whitespace-only form values alike.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

// =============================================================================
// FieldErrors
// =============================================================================

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered set of per-field validation failures. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error set with exactly one failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages in field order, ready to be flashed.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    /// Messages recorded against one field.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Convert `validator` output, walking fields in `order`.
    pub fn from_validation(errors: &ValidationErrors, order: &[&'static str]) -> Self {
        let by_field = errors.field_errors();
        let mut out = Self::new();

        for field in order {
            let Some(errs) = by_field.get(*field) else {
                continue;
            };
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.push(field, message);
            }
        }

        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("purplesmart@eq.net"));
        assert!(validate_email("night.princess@eq.co.uk"));
        assert!(validate_email("twenty-cooler@eq.net"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
        assert!(!validate_email("@eq.net"));
        assert!(!validate_email("dots..twice@eq.net"));
        assert!(!validate_email("long@eq.netwrk"));
        assert!(!validate_email("ünicode@eq.net"));
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let birth = date(2010, 6, 15);
        assert_eq!(age_on(birth, date(2023, 6, 14)), 12);
        assert_eq!(age_on(birth, date(2023, 6, 15)), 13);
        assert_eq!(age_on(birth, date(2023, 12, 31)), 13);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        let birth = date(2008, 2, 29);
        assert_eq!(age_on(birth, date(2021, 2, 28)), 12);
        assert_eq!(age_on(birth, date(2021, 3, 1)), 13);
    }

    #[test]
    fn test_future_birthdate_is_negative() {
        assert!(age_on(date(2030, 1, 1), date(2025, 1, 1)) < 0);
        assert!(!is_old_enough(date(2030, 1, 1), date(2025, 1, 1)));
    }

    #[test]
    fn test_is_old_enough() {
        let today = date(2025, 3, 10);
        assert!(is_old_enough(date(2012, 3, 10), today));
        assert!(!is_old_enough(date(2012, 3, 11), today));
    }

    #[test]
    fn test_parse_birthday_formats() {
        assert_eq!(parse_birthday("1990-04-01"), Some(date(1990, 4, 1)));
        assert_eq!(parse_birthday("04/01/1990"), Some(date(1990, 4, 1)));
        assert_eq!(parse_birthday("yesterday"), None);
        assert_eq!(parse_birthday("1990-02-30"), None);
    }

    #[test]
    fn test_minimum_age_messages() {
        let err = minimum_age("garbage").unwrap_err();
        assert_eq!(err.message.as_deref(), Some(INVALID_BIRTHDAY));

        let err = minimum_age(&Utc::now().date_naive().to_string()).unwrap_err();
        assert_eq!(err.message.as_deref(), Some(TOO_YOUNG));

        assert!(minimum_age("1990-01-01").is_ok());
    }

    #[test]
    fn test_field_errors_helpers() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.push("email", INVALID_EMAIL);
        errors.push("password", "too short");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("email"), vec![INVALID_EMAIL]);
        assert_eq!(errors.to_string(), format!("{}, too short", INVALID_EMAIL));
    }
}
