//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and a helper
//! to extract + validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

// -- Field checks shared by request DTOs --

/// Require a non-blank string field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

/// Reject a string longer than `max` characters.
pub fn require_max_len(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{field} must not exceed {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), String> {
            require_non_empty("name", &self.name)?;
            require_max_len("name", &self.name, 5)
        }
    }

    #[test]
    fn require_non_empty_rejects_whitespace() {
        assert!(require_non_empty("title", "Ms").is_ok());
        assert_eq!(
            require_non_empty("title", "  ").unwrap_err(),
            "title must not be empty"
        );
    }

    #[test]
    fn require_max_len_counts_chars() {
        assert!(require_max_len("city", "Galle", 5).is_ok());
        assert!(require_max_len("city", "Colombo", 5).is_err());
    }

    #[test]
    fn validate_trait_composes_checks() {
        assert!(Named { name: "Ann".into() }.validate().is_ok());
        assert!(Named { name: "".into() }.validate().is_err());
        assert!(Named { name: "Annabel".into() }.validate().is_err());
    }
}
