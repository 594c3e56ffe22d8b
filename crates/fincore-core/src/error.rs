//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Eligibility rejections live next to the gate in
//! [`crate::eligibility`]; this module holds the format-level errors.

use thiserror::Error;

/// Errors raised while parsing a Sri Lankan NIC number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NicError {
    /// The input matches neither the old (9 digits + `V`) nor the new
    /// (12 digits) NIC shape.
    #[error("invalid Sri Lankan NIC format: \"{input}\" (expected 9 digits followed by V, or 12 digits)")]
    InvalidFormat {
        /// The raw input, before normalization.
        input: String,
    },
}

/// Errors raised while parsing enumerated domain values from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Sex marker is neither `Male` nor `Female`.
    #[error("invalid sex: \"{0}\" (expected Male or Female)")]
    InvalidSex(String),

    /// Declared gender is not one of `Male`, `Female`, `Other`.
    #[error("invalid gender: \"{0}\" (expected Male, Female or Other)")]
    InvalidGender(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nic_error_display_names_input() {
        let err = NicError::InvalidFormat {
            input: "12345".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"12345\""));
        assert!(msg.contains("12 digits"));
    }

    #[test]
    fn validation_error_lists_accepted_values() {
        let err = ValidationError::InvalidGender("x".to_string());
        assert_eq!(
            err.to_string(),
            "invalid gender: \"x\" (expected Male, Female or Other)"
        );
    }
}
