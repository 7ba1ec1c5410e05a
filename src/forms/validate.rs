use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{AdventurePayload, ContactPayload};
use crate::error::FieldError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_language_code(code: &str) -> bool {
    lazy_static! {
        static ref LANG_RE: Regex = Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2})?$").unwrap();
    }
    LANG_RE.is_match(code)
}

fn required(value: Option<&str>, field: &str, label: &str, errors: &mut Vec<FieldError>) {
    if value.map(str::trim).unwrap_or_default().is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    }
}

fn check_email(value: Option<&str>, errors: &mut Vec<FieldError>) {
    match value.map(str::trim) {
        None | Some("") => errors.push(FieldError::new("email", "Email is required")),
        Some(email) if !is_valid_email(email) => {
            errors.push(FieldError::new("email", "Email address is invalid"));
        }
        _ => {}
    }
}

/// All-or-nothing validation: returns every violated field at once.
pub fn validate_contact(payload: &ContactPayload) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    required(payload.first_name.as_deref(), "firstName", "First name", &mut errors);
    required(payload.last_name.as_deref(), "lastName", "Last name", &mut errors);
    check_email(payload.email.as_deref(), &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_adventure(payload: &AdventurePayload) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    required(payload.first_name.as_deref(), "firstName", "First name", &mut errors);
    required(payload.last_name.as_deref(), "lastName", "Last name", &mut errors);
    check_email(payload.email.as_deref(), &mut errors);
    required(
        payload.departure_airport.as_deref(),
        "departureAirport",
        "Departure airport",
        &mut errors,
    );
    match payload.group_size {
        None => errors.push(FieldError::new("groupSize", "Group size is required")),
        Some(n) if n < 1 || n > i64::from(i32::MAX) => {
            errors.push(FieldError::new("groupSize", "Group size must be a positive integer"));
        }
        _ => {}
    }
    match payload.language.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new("language", "Preferred language is required")),
        Some(code) if !is_language_code(code) => {
            errors.push(FieldError::new("language", "Preferred language code is invalid"));
        }
        _ => {}
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
