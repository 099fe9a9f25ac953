//! Request validation for the billing API
//!
//! Provides type-safe validation with clear error messages.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{AppError, ValidationBuilder};

/// Validation result type
pub type ValidationResult<T> = Result<T, AppError>;

/// Upper bound for a single time entry
pub const MAX_HOURS_PER_ENTRY: i64 = 24;

/// Longest accepted name/email column value
pub const MAX_NAME_LENGTH: usize = 255;

/// Money and hours columns keep cents only
pub const MAX_DECIMAL_PLACES: u32 = 2;

fn field_error(field: &str, message: String) -> AppError {
    let mut details = HashMap::new();
    details.insert(field.to_string(), vec![message]);
    AppError::ValidationError { details }
}

/// Email validation
pub mod email {
    use super::*;

    /// Validate email format
    pub fn validate(value: &str, field: &str) -> ValidationResult<String> {
        let email = value.trim().to_lowercase();

        if email.is_empty() {
            return Err(field_error(field, format!("{} is required", field)));
        }

        // Must contain @ and have parts before and after
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(field_error(field, "Invalid email format".to_string()));
        }

        // Domain must contain at least one dot
        if !parts[1].contains('.') {
            return Err(field_error(field, "Invalid email domain".to_string()));
        }

        Ok(email)
    }
}

/// Numeric validation
pub mod number {
    use super::*;

    /// Validate decimal/money amount
    pub fn valid_amount(value: &Decimal, field: &str) -> ValidationResult<Decimal> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(field_error(field, format!("{} cannot be negative", field)));
        }
        Ok(*value)
    }

    /// Largest value a `NUMERIC(10, 2)` rate column holds
    pub fn max_rate() -> Decimal {
        Decimal::new(9_999_999_999, 2)
    }

    /// Reject values that would be rounded when stored at two decimal places
    pub fn within_cents(value: &Decimal, field: &str) -> ValidationResult<Decimal> {
        if value.normalize().scale() > MAX_DECIMAL_PLACES {
            return Err(field_error(
                field,
                format!("{} must have at most {} decimal places", field, MAX_DECIMAL_PLACES),
            ));
        }
        Ok(*value)
    }

    /// Validate a strictly positive decimal no larger than `max`
    pub fn positive_at_most(value: &Decimal, field: &str, max: Decimal) -> ValidationResult<Decimal> {
        if *value <= Decimal::ZERO {
            return Err(field_error(field, format!("{} must be greater than 0", field)));
        }
        if *value > max {
            return Err(field_error(field, format!("{} cannot exceed {}", field, max)));
        }
        Ok(*value)
    }
}

/// Date validation
pub mod date {
    use super::*;

    /// Validate date range (from not after to); open bounds always pass
    pub fn valid_range(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        from_field: &str,
        to_field: &str,
    ) -> ValidationResult<()> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => Err(field_error(
                from_field,
                format!("{} must not be after {}", from_field, to_field),
            )),
            _ => Ok(()),
        }
    }
}

/// Validator builder for complex validations
pub struct Validator {
    builder: ValidationBuilder,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            builder: ValidationBuilder::new(),
        }
    }

    /// Add error for a field
    pub fn error(mut self, field: &str, message: &str) -> Self {
        self.builder = self.builder.error(field, message);
        self
    }

    /// Validate required string
    pub fn required(self, value: &str, field: &str) -> Self {
        if value.trim().is_empty() {
            self.error(field, &format!("{} is required", field))
        } else {
            self
        }
    }

    /// Validate an optional string that must not be blank when provided
    pub fn not_blank(self, value: Option<&str>, field: &str) -> Self {
        match value {
            Some(s) if s.trim().is_empty() => self.error(field, &format!("{} cannot be empty", field)),
            _ => self,
        }
    }

    /// Validate email format
    pub fn email(self, value: Option<&str>, field: &str) -> Self {
        match value {
            Some(e) if email::validate(e, field).is_err() => self.error(field, "Invalid email format"),
            _ => self,
        }
    }

    /// Validate max length
    pub fn max_length(self, value: Option<&str>, field: &str, max: usize) -> Self {
        match value {
            Some(s) if s.len() > max => {
                self.error(field, &format!("{} must be {} characters or less", field, max))
            }
            _ => self,
        }
    }

    /// Validate a rate: non-negative, in cents, within the column range
    pub fn amount(self, value: Option<&Decimal>, field: &str) -> Self {
        let Some(v) = value else {
            return self;
        };
        if number::valid_amount(v, field).is_err() {
            self.error(field, &format!("{} cannot be negative", field))
        } else if *v > number::max_rate() {
            self.error(field, &format!("{} cannot exceed {}", field, number::max_rate()))
        } else {
            self.cents(v, field)
        }
    }

    /// Validate logged hours: positive, at most one day, in hundredths
    pub fn hours(self, value: Option<&Decimal>, field: &str) -> Self {
        let max = Decimal::from(MAX_HOURS_PER_ENTRY);
        let Some(v) = value else {
            return self;
        };
        if number::positive_at_most(v, field, max).is_err() {
            self.error(
                field,
                &format!("{} must be greater than 0 and at most {}", field, max),
            )
        } else {
            self.cents(v, field)
        }
    }

    fn cents(self, value: &Decimal, field: &str) -> Self {
        match number::within_cents(value, field) {
            Ok(_) => self,
            Err(_) => self.error(
                field,
                &format!("{} must have at most {} decimal places", field, MAX_DECIMAL_PLACES),
            ),
        }
    }

    /// Validate ordered date range
    pub fn date_range(
        self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        from_field: &str,
        to_field: &str,
    ) -> Self {
        if date::valid_range(from, to, from_field, to_field).is_err() {
            self.error(from_field, &format!("{} must not be after {}", from_field, to_field))
        } else {
            self
        }
    }

    /// Finish validation, returning error if any
    pub fn finish(self) -> ValidationResult<()> {
        match self.builder.build() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
