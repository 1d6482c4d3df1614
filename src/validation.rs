use crate::error::{ServiceError, ServiceResult};
use crate::storage::is_object_id;

/// Unwraps a required string field, rejecting missing or blank values.
pub fn required(value: Option<String>, entity: &str, field: &str) -> ServiceResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!(
            "{} validation failed: {} is required",
            entity, field
        ))),
    }
}

/// Rejects a present but blank string field.
pub fn not_blank(
    value: Option<String>,
    entity: &str,
    field: &str,
) -> ServiceResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ServiceError::Validation(format!(
            "{} validation failed: {} cannot be empty",
            entity, field
        ))),
        other => Ok(other),
    }
}

pub fn object_id(value: &str, what: &str) -> ServiceResult<()> {
    if is_object_id(value) {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "Invalid {} id: {}",
            what, value
        )))
    }
}

/// Something `@` something `.` something, none of it whitespace.
pub fn email(value: &str) -> ServiceResult<()> {
    let valid = !value.chars().any(char::is_whitespace)
        && match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.contains('@') && has_dotted_tail(domain)
            }
            None => false,
        };

    if valid {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "{} is not a valid email!",
            value
        )))
    }
}

// At least one non-empty label before some dot and a non-empty tail after it.
fn has_dotted_tail(domain: &str) -> bool {
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}
