//! Field validation shared by all record types

use crate::error::{Error, Result};

/// Maximum length of any record name
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a campaign description
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Reject empty or whitespace-only values
pub fn non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::EmptyField { field });
    }
    Ok(())
}

/// Reject values longer than `max` characters
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::FieldTooLong { field, max, len });
    }
    Ok(())
}

/// Validate a record name: non-empty and at most `MAX_NAME_LEN` characters
pub fn name(field: &'static str, value: &str) -> Result<()> {
    non_empty(field, value)?;
    max_len(field, value, MAX_NAME_LEN)
}
