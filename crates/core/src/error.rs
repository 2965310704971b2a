//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation, step
/// gating). Rendering and materialization failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more submitted fields failed validation.
    ///
    /// Recoverable: the caller shows the messages and the session carries on.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A caller tried to bypass step gating (skip, back or edit from the wrong step).
    #[error("illegal transition: {0}")]
    Transition(String),
}

impl DomainError {
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    /// Field errors carried by a validation failure, if this is one.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Transition(_) => None,
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition(_))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// A single rejected field and the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found while validating one record, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message reported for `field`, if it was rejected.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field name → message, the shape a form host displays.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|e| (e.field.to_string(), e.message.clone()))
            .collect()
    }

    /// `Ok(value)` when nothing was collected, otherwise the full error set.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, e) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(e, f)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_field_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::new("taxId", "Invalid GSTIN format."));
        errors.push(FieldError::new("phone", "Phone number must be 10 digits."));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("phone"), Some("Phone number must be 10 digits."));
        assert!(!errors.contains("email"));
        assert_eq!(
            errors.to_string(),
            "taxId: Invalid GSTIN format.; phone: Phone number must be 10 digits."
        );
    }

    #[test]
    fn into_result_only_builds_value_when_clean() {
        let clean = ValidationErrors::new();
        assert_eq!(clean.into_result(|| 7), Ok(7));

        let mut dirty = ValidationErrors::new();
        dirty.push(FieldError::new("name", "Please enter a valid name."));
        let err = dirty.into_result(|| 7).unwrap_err();
        assert_eq!(err.to_map().get("name").map(String::as_str), Some("Please enter a valid name."));
    }

    #[test]
    fn domain_error_exposes_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::new("budget", "Budget must be a positive number."));
        let err = DomainError::from(errors.clone());
        assert_eq!(err.field_errors(), Some(&errors));
        assert!(!err.is_transition());
        assert!(DomainError::transition("skip").is_transition());
    }
}
