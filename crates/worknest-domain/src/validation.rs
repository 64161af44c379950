//! Field validation helpers shared by drafts and patches

use crate::error::{DomainError, Result};

/// Require a non-blank value no longer than `max_len` characters
pub fn required(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    bounded(field, value, max_len)
}

/// Require a value no longer than `max_len` characters (blank allowed)
pub fn bounded(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(DomainError::validation(
            field,
            format!("too long (max {} characters)", max_len),
        ));
    }
    Ok(())
}

/// Minimal shape check: `local@domain.tld`, no whitespace
pub fn email(field: &str, value: &str) -> Result<()> {
    let invalid = || DomainError::validation(field, "must be a valid email address");

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// ISO-4217 style code: exactly three ASCII uppercase letters
pub fn currency(field: &str, value: &str) -> Result<()> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(DomainError::validation(
            field,
            "must be a three-letter uppercase currency code",
        ))
    }
}
