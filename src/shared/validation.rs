use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::shared::constants::DESA_KELURAHAN;
use crate::shared::types::FieldErrors;

lazy_static! {
    /// Digits only, at least one
    /// - Valid: "3510123456780001", "081234567890"
    /// - Invalid: "", "0812-3456", "+6281234", "12 34"
    pub static ref DIGITS_REGEX: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// `desaKelurahan` must be one of the fixed locations.
///
/// Blank values pass here and are reported by the length rule instead.
pub fn validate_desa_kelurahan(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || DESA_KELURAHAN.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new("desa_kelurahan")
        .with_message(Cow::from("Desa/Kelurahan tidak terdaftar")))
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flattens validator output into camelCase field -> messages
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<_>>();
        fields
            .entry(to_camel_case(&field))
            .or_default()
            .extend(messages);
    }
    fields
}
