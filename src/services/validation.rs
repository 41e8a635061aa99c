use crate::domain::handle::RAW_HANDLE;
use crate::domain::locale::{Locale, Notice};
use crate::domain::submission::{FormCategory, SubmissionRequest};
use email_address::{EmailAddress, Options};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Surname,
    Email,
    Handle,
    Category,
    Payload,
}

impl Field {
    const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Email => "email",
            Self::Handle => "handle",
            Self::Category => "category",
            Self::Payload => "payload",
        }
    }

    /// Key used by the landing page form for the same value.
    const fn form_alias(self) -> Option<&'static str> {
        match self {
            Self::Handle => Some("tiktokId"),
            Self::Category => Some("formType"),
            _ => None,
        }
    }

    fn lookup(self, object: &Map<String, Value>) -> Option<&Value> {
        object.get(self.key()).or_else(|| self.form_alias().and_then(|alias| object.get(alias)))
    }

    const fn notice(self) -> Notice {
        match self {
            Self::Name => Notice::NameTooShort,
            Self::Surname => Notice::SurnameTooShort,
            Self::Email => Notice::EmailInvalid,
            Self::Handle => Notice::HandleInvalid,
            Self::Category => Notice::CategoryInvalid,
            Self::Payload => Notice::PayloadNotObject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Missing,
    TooShort,
    BadEmail,
    BadPattern,
    UnknownCategory,
    NotAnObject,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing or not a string",
            Self::TooShort => "shorter than 2 characters",
            Self::BadEmail => "not a valid email address",
            Self::BadPattern => "does not match the handle pattern",
            Self::UnknownCategory => "not one of signup, consultation",
            Self::NotAnObject => "expected a JSON object",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: Field,
    pub violation: Violation,
}

/// Every schema constraint the payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid submission: {}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn describe(violations: &[FieldViolation]) -> String {
    violations.iter().map(|v| format!("{} {}", v.field.key(), v.violation)).collect::<Vec<_>>().join("; ")
}

impl ValidationError {
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// One localized sentence per offending field, in field order.
    #[must_use]
    pub fn user_message(&self, locale: Locale) -> String {
        let mut fields: Vec<Field> = Vec::new();
        for v in &self.violations {
            if !fields.contains(&v.field) {
                fields.push(v.field);
            }
        }
        fields.iter().map(|f| f.notice().text(locale)).collect::<Vec<_>>().join(" ")
    }
}

/// Turns the raw form payload into a [`SubmissionRequest`].
///
/// # Errors
/// Returns a [`ValidationError`] listing every violated constraint.
pub fn validate(payload: &Value) -> Result<SubmissionRequest, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError {
            violations: vec![FieldViolation { field: Field::Payload, violation: Violation::NotAnObject }],
        });
    };

    let mut violations = Vec::new();
    let mut check = |field: Field, rule: fn(&str) -> Option<Violation>| -> Option<String> {
        match field.lookup(object).and_then(Value::as_str) {
            Some(value) => match rule(value) {
                Some(violation) => {
                    violations.push(FieldViolation { field, violation });
                    None
                }
                None => Some(value.to_owned()),
            },
            None => {
                violations.push(FieldViolation { field, violation: Violation::Missing });
                None
            }
        }
    };

    let name = check(Field::Name, min_chars);
    let surname = check(Field::Surname, min_chars);
    let email = check(Field::Email, email_shape);
    let handle = check(Field::Handle, handle_shape);

    let category = match Field::Category.lookup(object) {
        None | Some(Value::Null) => Some(FormCategory::default()),
        Some(Value::String(raw)) => FormCategory::parse(raw),
        Some(_) => None,
    };
    if category.is_none() {
        violations.push(FieldViolation { field: Field::Category, violation: Violation::UnknownCategory });
    }

    match (name, surname, email, handle, category) {
        (Some(name), Some(surname), Some(email), Some(handle), Some(category)) if violations.is_empty() => {
            Ok(SubmissionRequest { name, surname, email, handle, category })
        }
        _ => Err(ValidationError { violations }),
    }
}

fn min_chars(value: &str) -> Option<Violation> {
    (value.chars().count() < MIN_NAME_CHARS).then_some(Violation::TooShort)
}

/// Plain `local@domain.tld` only: no display name, domain literal or quoted local part.
fn email_shape(value: &str) -> Option<Violation> {
    let options = Options::default().without_display_text().without_domain_literal().with_required_tld();
    match EmailAddress::parse_with_options(value, options) {
        Ok(address) if !address.local_part().starts_with('"') => None,
        _ => Some(Violation::BadEmail),
    }
}

fn handle_shape(value: &str) -> Option<Violation> {
    (!RAW_HANDLE.is_match(value)).then_some(Violation::BadPattern)
}
