use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::value_objects::{InvoiceId, ValueObjectError};

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(ValidationFailure),

  #[error("Invoice not found: {0}")]
  NotFound(InvoiceId),

  #[error("Database error: {0}")]
  Persistence(#[from] sqlx::Error),
}

impl From<ValidationFailure> for InvoiceError {
  fn from(failure: ValidationFailure) -> Self {
    InvoiceError::Validation(failure)
  }
}

impl From<ValueObjectError> for InvoiceError {
  fn from(error: ValueObjectError) -> Self {
    InvoiceError::Validation(ValidationFailure::single(FieldError::from(error)))
  }
}

/// Why a single form field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
  Missing,
  InvalidType,
  NotAllowed,
  OutOfRange,
}

impl FieldErrorKind {
  /// Code used for `validator::ValidationError` on custom checks.
  pub fn code(&self) -> &'static str {
    match self {
      FieldErrorKind::Missing => "required",
      FieldErrorKind::InvalidType => "invalid_type",
      FieldErrorKind::NotAllowed => "not_allowed",
      FieldErrorKind::OutOfRange => "out_of_range",
    }
  }

  pub fn from_code(code: &str) -> Self {
    match code {
      "required" => FieldErrorKind::Missing,
      "not_allowed" => FieldErrorKind::NotAllowed,
      "out_of_range" => FieldErrorKind::OutOfRange,
      _ => FieldErrorKind::InvalidType,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  /// Form key as submitted, e.g. `customerId`
  pub field: String,
  pub kind: FieldErrorKind,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      kind,
      message: message.into(),
    }
  }
}

impl From<ValueObjectError> for FieldError {
  fn from(error: ValueObjectError) -> Self {
    let message = error.to_string();
    match error {
      ValueObjectError::InvalidInvoiceId(_) => {
        FieldError::new("id", FieldErrorKind::Missing, message)
      }
      ValueObjectError::InvalidCustomerId(_) => {
        FieldError::new("customerId", FieldErrorKind::Missing, message)
      }
      ValueObjectError::InvalidAmount(_) => {
        FieldError::new("amount", FieldErrorKind::InvalidType, message)
      }
      ValueObjectError::AmountOutOfRange(_) => {
        FieldError::new("amount", FieldErrorKind::OutOfRange, message)
      }
      ValueObjectError::InvalidStatus(_) => {
        FieldError::new("status", FieldErrorKind::NotAllowed, message)
      }
    }
  }
}

/// Every field that failed validation for one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
  pub errors: Vec<FieldError>,
}

impl ValidationFailure {
  pub fn new(errors: Vec<FieldError>) -> Self {
    Self { errors }
  }

  pub fn single(error: FieldError) -> Self {
    Self {
      errors: vec![error],
    }
  }

  pub fn field(&self, name: &str) -> Option<&FieldError> {
    self.errors.iter().find(|e| e.field == name)
  }

  pub fn fields(&self) -> Vec<&str> {
    self.errors.iter().map(|e| e.field.as_str()).collect()
  }
}

impl fmt::Display for ValidationFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .errors
      .iter()
      .map(|e| format!("{}: {}", e.field, e.message))
      .collect();
    write!(f, "{}", parts.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_value_object_error_maps_to_form_field() {
    let err = FieldError::from(ValueObjectError::InvalidStatus("x".to_string()));
    assert_eq!(err.field, "status");
    assert_eq!(err.kind, FieldErrorKind::NotAllowed);

    let err = FieldError::from(ValueObjectError::AmountOutOfRange("x".to_string()));
    assert_eq!(err.field, "amount");
    assert_eq!(err.kind, FieldErrorKind::OutOfRange);
  }

  #[test]
  fn test_kind_codes_round_trip_through_validator_codes() {
    for kind in [
      FieldErrorKind::Missing,
      FieldErrorKind::InvalidType,
      FieldErrorKind::NotAllowed,
      FieldErrorKind::OutOfRange,
    ] {
      assert_eq!(FieldErrorKind::from_code(kind.code()), kind);
    }
  }

  #[test]
  fn test_validation_failure_display() {
    let failure = ValidationFailure::new(vec![
      FieldError::new("customerId", FieldErrorKind::Missing, "Please select a customer."),
      FieldError::new("status", FieldErrorKind::NotAllowed, "Please select an invoice status."),
    ]);
    assert_eq!(
      failure.to_string(),
      "customerId: Please select a customer., status: Please select an invoice status."
    );
    assert_eq!(failure.fields(), vec!["customerId", "status"]);
    assert!(failure.field("amount").is_none());
  }
}
