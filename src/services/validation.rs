use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::availability::{to_human_readable, Weekday};
use crate::models::FieldKind;
use crate::services::scheduling;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{8,}$").expect("valid phone regex"));
static ATTENDEES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]*$").expect("valid attendees regex"));

/// Products a demo can be booked for, as (match key, display name).
pub const PRODUCTS: [(&str, &str); 2] = [("ayura", "Ayura"), ("nexakyc", "NexaKYC")];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please type an answer so we can continue.")]
    Empty,

    #[error("Please enter your full name (at least 2 characters).")]
    NameTooShort,

    #[error("That doesn't look like a valid email address. Please try again (e.g. jane@company.com).")]
    InvalidEmail,

    #[error("Please enter your company name (at least 2 characters).")]
    CompanyTooShort,

    #[error("Please enter a valid phone number with at least 8 digits (a leading + is fine).")]
    InvalidPhone,

    #[error("Please choose one of our products: Ayura or NexaKYC.")]
    UnknownProduct,

    #[error("Please enter the number of attendees as a whole number, e.g. 3.")]
    InvalidAttendees,

    #[error("Please pick a weekday between Monday and Friday.")]
    InvalidDay,

    #[error("Please select a day first.")]
    DayNotSelected,

    #[error("Please select a valid time. Available on {day}: {available}.")]
    InvalidTime { day: String, available: String },
}

/// Checks `input` against the rule for `kind` and returns the value to store.
///
/// `answers` holds what the dialogue has collected so far; only the time
/// field looks at it.
pub fn validate(
    kind: FieldKind,
    input: &str,
    answers: &BTreeMap<FieldKind, String>,
) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty);
    }

    match kind {
        FieldKind::Name => validate_min_len(value, ValidationError::NameTooShort),
        FieldKind::Email => validate_email(value),
        FieldKind::Company => validate_min_len(value, ValidationError::CompanyTooShort),
        FieldKind::Phone => validate_phone(value),
        FieldKind::ProductInterest => validate_product(value),
        FieldKind::Attendees => validate_attendees(value),
        FieldKind::SelectedDay => validate_day(value),
        FieldKind::SelectedTime => validate_time(value, answers),
        FieldKind::Notes => Ok(value.to_string()),
    }
}

fn validate_min_len(value: &str, err: ValidationError) -> Result<String, ValidationError> {
    if value.chars().count() < 2 {
        return Err(err);
    }
    Ok(value.to_string())
}

fn validate_email(value: &str) -> Result<String, ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value.to_string())
}

fn validate_phone(value: &str) -> Result<String, ValidationError> {
    if !PHONE_RE.is_match(value) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(value.to_string())
}

fn validate_product(value: &str) -> Result<String, ValidationError> {
    let lower = value.to_lowercase();
    PRODUCTS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, name)| name.to_string())
        .ok_or(ValidationError::UnknownProduct)
}

fn validate_attendees(value: &str) -> Result<String, ValidationError> {
    if !ATTENDEES_RE.is_match(value) {
        return Err(ValidationError::InvalidAttendees);
    }
    // Must fit the count stored on the booking record.
    let count = value
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidAttendees)?;
    Ok(count.to_string())
}

fn validate_day(value: &str) -> Result<String, ValidationError> {
    scheduling::match_day(value)
        .map(|day| day.as_str().to_string())
        .ok_or(ValidationError::InvalidDay)
}

fn validate_time(
    value: &str,
    answers: &BTreeMap<FieldKind, String>,
) -> Result<String, ValidationError> {
    let day = answers
        .get(&FieldKind::SelectedDay)
        .and_then(|d| Weekday::parse(d))
        .ok_or(ValidationError::DayNotSelected)?;

    scheduling::match_time(day, value)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidTime {
            day: day.as_str().to_string(),
            available: to_human_readable(day),
        })
}
