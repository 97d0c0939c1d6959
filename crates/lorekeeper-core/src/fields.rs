//! Field names at the record/document boundary
//!
//! Records expose some attributes under a different name than the one used
//! in stored documents. `class` collides with reserved identifiers in many
//! languages, so records call it `character_class` while documents keep
//! `class`. Open field maps may use either spelling.
//!
//! In an open field map, `null` clears an optional field. Fields that can
//! never be empty reject it.

use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};

/// `(external name, storage name)` pairs
pub const FIELD_ALIASES: &[(&str, &str)] = &[("character_class", "class")];

/// Map an external field name to its storage key
pub fn storage_name(external: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(ext, _)| *ext == external)
        .map(|(_, stored)| *stored)
        .unwrap_or(external)
}

/// Parse a value whose `null` means "clear"
pub(crate) fn nullable<T>(
    value: &Value,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Option<T>> {
    if value.is_null() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

/// Reject `null` for a field that cannot be cleared
pub(crate) fn required<'a>(field: &str, value: &'a Value) -> Result<&'a Value> {
    if value.is_null() {
        return Err(Error::InvalidValue {
            field: field.to_string(),
            reason: "cannot be cleared".into(),
        });
    }
    Ok(value)
}

/// Serde helper for update slots: a present field, even `null`, is `Some`
pub(crate) fn clearable<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

pub(crate) fn type_error(field: &str, expected: &'static str, got: &Value) -> Error {
    Error::TypeError {
        field: field.to_string(),
        expected,
        got: got.type_name(),
    }
}

pub(crate) fn expect_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| type_error(field, "string", value))
}

pub(crate) fn expect_string_list(field: &str, value: &Value) -> Result<Vec<String>> {
    value
        .as_string_list()
        .ok_or_else(|| type_error(field, "list of strings", value))
}

pub(crate) fn expect_int(field: &str, value: &Value) -> Result<i64> {
    value.as_int().ok_or_else(|| type_error(field, "int", value))
}

pub(crate) fn expect_map<'a>(field: &str, value: &'a Value) -> Result<&'a ValueMap> {
    value.as_map().ok_or_else(|| type_error(field, "map", value))
}

pub(crate) fn expect_i32(field: &str, value: &Value) -> Result<i32> {
    let raw = expect_int(field, value)?;
    i32::try_from(raw).map_err(|_| Error::InvalidValue {
        field: field.to_string(),
        reason: format!("{} is out of range", raw),
    })
}
