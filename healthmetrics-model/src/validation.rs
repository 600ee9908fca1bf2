use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;

/// A single rejected field together with a message fit for displaying
/// next to the corresponding form input.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All problems found in one submitted record.
#[derive(Clone, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
#[error("{}", .0.iter().join("; "))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message))
    }

    /// Records `message` against `field` when `condition` does not hold.
    pub fn check(&mut self, condition: bool, field: &'static str, message: impl Into<String>) {
        if !condition {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

/// Entry-time checks of a record. `today` is supplied by the caller so
/// that checks against the current date stay deterministic.
pub trait Validate {
    fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors>;
}

pub(crate) fn check_not_in_future(
    errors: &mut ValidationErrors,
    field: &'static str,
    date: NaiveDate,
    today: NaiveDate,
) {
    errors.check(
        date <= today,
        field,
        format!("Date {} cannot be in the future.", date),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_failed_checks_only() {
        let mut errors = ValidationErrors::new();
        errors.check(true, "height", "Height must be positive.");
        errors.check(false, "weight", "Weight must be positive.");

        assert!(!errors.contains("height"));
        assert!(errors.contains("weight"));
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_errors_are_ok() {
        assert_eq!(ValidationErrors::new().into_result(), Ok(()));
    }

    #[test]
    fn display_joins_all_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("duration", "Duration must be positive.");
        errors.add("distance", "Distance cannot be negative.");

        assert_eq!(
            errors.to_string(),
            "duration: Duration must be positive.; distance: Distance cannot be negative."
        );
    }
}
