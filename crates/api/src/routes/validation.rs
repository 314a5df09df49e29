//! Request validation helpers.
//!
//! Validation runs before any persistence attempt; failures collect into a
//! field-error array returned with HTTP 422.

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Serde helper distinguishing an absent field from an explicit `null`,
/// for partial updates where `null` clears a value.
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    /// Deserializes a present value (or `null`) into `Some(..)`; absent
    /// fields fall back to the `#[serde(default)]` of `None`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// The offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Accumulator for field-level validation failures.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Returns true when no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the collected failures as a 422 response.
    #[must_use]
    pub fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "errors": self.0 })),
        )
            .into_response()
    }
}

/// Parses a decimal-string amount that must be strictly positive.
pub fn parse_positive_amount(
    value: &str,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match Decimal::from_str(value) {
        Ok(amount) if amount > Decimal::ZERO => Some(amount),
        Ok(_) => {
            errors.push(field, "must be greater than 0");
            None
        }
        Err(_) => {
            errors.push(field, "must be a decimal number");
            None
        }
    }
}

/// Parses a decimal-string amount that must be zero or positive.
pub fn parse_non_negative_amount(
    value: &str,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match Decimal::from_str(value) {
        Ok(amount) if amount >= Decimal::ZERO => Some(amount),
        Ok(_) => {
            errors.push(field, "must not be negative");
            None
        }
        Err(_) => {
            errors.push(field, "must be a decimal number");
            None
        }
    }
}

/// Checks a required, length-bounded text field.
pub fn check_required_text(
    value: &str,
    field: &'static str,
    max_len: usize,
    errors: &mut FieldErrors,
) {
    if value.trim().is_empty() {
        errors.push(field, "must not be empty");
    } else if value.len() > max_len {
        errors.push(field, format!("must be at most {max_len} characters"));
    }
}

/// Checks an optional, length-bounded text field.
pub fn check_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_len: usize,
    errors: &mut FieldErrors,
) {
    if let Some(value) = value {
        if value.len() > max_len {
            errors.push(field, format!("must be at most {max_len} characters"));
        }
    }
}

/// Lightweight email shape check: one `@` with a dotted domain after it.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Checks an email field.
pub fn check_email(value: &str, field: &'static str, errors: &mut FieldErrors) {
    if !is_valid_email(value) {
        errors.push(field, "must be a valid email address");
    }
}

/// Checks a password field.
pub fn check_password(value: &str, field: &'static str, errors: &mut FieldErrors) {
    if value.len() < 6 {
        errors.push(field, "must be at least 6 characters");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("a@b.co", true)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("user@nodot", false)]
    #[case("user@.com", false)]
    #[case("user@example.", false)]
    fn test_email_shapes(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(input), valid);
    }

    #[test]
    fn test_positive_amount_accepted() {
        let mut errors = FieldErrors::new();
        let amount = parse_positive_amount("123.45", "amount", &mut errors);
        assert_eq!(amount, Some(dec!(123.45)));
        assert!(errors.is_empty());
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("abc")]
    fn test_bad_amounts_rejected(#[case] input: &str) {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_positive_amount(input, "amount", &mut errors), None);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_non_negative_accepts_zero() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            parse_non_negative_amount("0", "salary", &mut errors),
            Some(dec!(0))
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_text_bounds() {
        let mut errors = FieldErrors::new();
        check_required_text("  ", "name", 100, &mut errors);
        check_required_text(&"x".repeat(101), "name", 100, &mut errors);
        check_required_text("fine", "name", 100, &mut errors);
        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn test_password_minimum_length() {
        let mut errors = FieldErrors::new();
        check_password("short", "password", &mut errors);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        check_password("longenough", "password", &mut errors);
        assert!(errors.is_empty());
    }
}
