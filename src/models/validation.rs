use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::auth::AppError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("phone pattern compiles"));

/// Normalize an account identifier: an email address or a phone number
pub fn normalize_identifier(raw: &str) -> Result<String, AppError> {
    let identifier = raw.trim().to_lowercase();

    if identifier.is_empty() {
        return Err(AppError::validation("Identifier is required"));
    }

    if identifier.contains('@') {
        if identifier.len() > 255 || !EMAIL_PATTERN.is_match(&identifier) {
            return Err(AppError::validation("Invalid email address"));
        }
        return Ok(identifier);
    }

    let phone: String = identifier
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if !PHONE_PATTERN.is_match(&phone) {
        return Err(AppError::validation(
            "Identifier must be an email address or a phone number",
        ));
    }

    Ok(phone)
}

/// A trimmed, non-empty form field
pub fn required(value: Option<&str>, label: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::validation(format!("{} is required", label))),
    }
}

/// A trimmed form field, `None` when blank
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn parse_count(value: Option<&str>, label: &str) -> Result<u32, AppError> {
    let raw = required(value, label)?;
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::validation(format!(
            "{} must be a whole number of at least 1",
            label
        ))),
    }
}

/// A positive measurement; accepts a decimal comma
pub fn parse_measurement(raw: &str, label: &str) -> Result<f64, AppError> {
    match raw.trim().replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(AppError::validation(format!(
            "{} must be a positive number",
            label
        ))),
    }
}

pub fn parse_optional_measurement(value: Option<&str>, label: &str) -> Result<Option<f64>, AppError> {
    match optional(value) {
        // "-" is the placeholder the forms show for an empty measurement
        Some(raw) if raw == "-" => Ok(None),
        Some(raw) => parse_measurement(&raw, label).map(Some),
        None => Ok(None),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation("Date must use the YYYY-MM-DD format"))
}
