//! Form-level checks applied before any record reaches the database.
//!
//! Every helper trims its input; blank optional text is stored as `NULL`.

use rust_decimal::Decimal;
use thiserror::Error;

pub const CPF_LENGTH: usize = 11;

/// `NUMERIC(12, 2)`: ten integer digits, two decimal places.
const AMOUNT_INTEGER_DIGITS: u32 = 10;
const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} contains control characters")]
    ControlCharacter { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must contain only digits")]
    NotDigits { field: &'static str },
    #[error("{field} must be a CPF with exactly 11 digits")]
    InvalidCpf { field: &'static str },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: &'static str },
    #[error("{field} has an invalid value: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("an admission with CPF {cpf} is already registered (code {employee_code})")]
    DuplicateCpf { cpf: String, employee_code: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn required<T>(field: &'static str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or(ValidationError::Required { field })
}

pub fn required_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<String> {
    optional_text(field, value, max)?.ok_or(ValidationError::Required { field })
}

pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let Some(trimmed) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    // Spreadsheet XML cannot carry them; tabs and line breaks are fine.
    if trimmed
        .chars()
        .any(|ch| ch.is_control() && !matches!(ch, '\t' | '\n' | '\r'))
    {
        return Err(ValidationError::ControlCharacter { field });
    }
    Ok(Some(trimmed.to_string()))
}

/// Bank and phone fields: digits only, no separators.
pub fn optional_digits(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let value = optional_text(field, value, max)?;
    if let Some(digits) = &value {
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ValidationError::NotDigits { field });
        }
    }
    Ok(value)
}

/// Accepts `12345678909` or `123.456.789-09`, returns the bare digits.
pub fn cpf(field: &'static str, value: Option<String>) -> ValidationResult<String> {
    let raw = value.unwrap_or_default();
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let digits: String = raw
        .chars()
        .filter(|ch| !matches!(ch, '.' | '-' | ' '))
        .collect();
    if digits.len() != CPF_LENGTH || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::InvalidCpf { field });
    }
    Ok(digits)
}

pub fn required_email(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<String> {
    let email = required_text(field, value, max)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::InvalidEmail { field }),
    }
}

/// Two-letter federative unit code, stored upper-case.
pub fn state_code(field: &'static str, value: Option<String>) -> ValidationResult<String> {
    let code = required_text(field, value, 2)?.to_ascii_uppercase();
    if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ValidationError::Invalid {
            field,
            reason: "expected a two-letter state code".into(),
        });
    }
    Ok(code)
}

/// Optional currency amount that fits a `NUMERIC(12, 2)` column.
pub fn optional_amount(
    field: &'static str,
    value: Option<Decimal>,
) -> ValidationResult<Option<Decimal>> {
    let Some(amount) = value else {
        return Ok(None);
    };
    let amount = amount.normalize();
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Invalid {
            field,
            reason: "must not be negative".into(),
        });
    }
    if amount.scale() > AMOUNT_SCALE {
        return Err(ValidationError::Invalid {
            field,
            reason: format!("at most {AMOUNT_SCALE} decimal places"),
        });
    }
    if amount.trunc() >= Decimal::from(10u64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(ValidationError::Invalid {
            field,
            reason: format!("at most {AMOUNT_INTEGER_DIGITS} integer digits"),
        });
    }
    Ok(Some(amount))
}
