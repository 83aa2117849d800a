use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use super::errors::{FieldError, FieldErrorKind, InvoiceError, ValidationFailure};
use super::value_objects::{AmountInCents, CustomerId, InvoiceStatus};

/// Raw submitted form: ordered key/value pairs, untrusted and untyped.
///
/// Lookups return the first value for a key, the way a browser `FormData`
/// does when a field is repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
  entries: Vec<(String, String)>,
}

impl FormData {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.entries.push((key.into(), value.into()));
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      entries: iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }
}

/// Form keys in the order errors are reported
const FORM_FIELDS: [(&str, &str); 3] = [
  ("customer_id", "customerId"),
  ("amount", "amount"),
  ("status", "status"),
];

/// Input schema shared by invoice create and update.
///
/// `id` and `date` are not part of the schema and are never read from
/// caller-supplied data.
#[derive(Debug, Clone, Default, Validate)]
pub struct InvoiceForm {
  #[validate(required(message = "Please select a customer."))]
  pub customer_id: Option<String>,

  #[validate(
    required(message = "Please enter an amount."),
    custom(function = "validate_amount")
  )]
  pub amount: Option<String>,

  #[validate(
    required(message = "Please select an invoice status."),
    custom(function = "validate_status")
  )]
  pub status: Option<String>,
}

/// Fields that passed validation, already converted to domain types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
  pub customer_id: CustomerId,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
}

impl InvoiceForm {
  /// Picks the schema fields out of a raw form. Blank values count as missing.
  pub fn from_form_data(form: &FormData) -> Self {
    let read = |key: &str| {
      form
        .get(key)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
    };

    Self {
      customer_id: read("customerId"),
      amount: read("amount"),
      status: read("status"),
    }
  }

  pub fn parse(self) -> Result<InvoiceFields, InvoiceError> {
    self.validate().map_err(ValidationFailure::from)?;

    Ok(InvoiceFields {
      customer_id: CustomerId::new(self.customer_id.unwrap_or_default())?,
      amount: AmountInCents::parse(self.amount.as_deref().unwrap_or_default())?,
      status: self.status.as_deref().unwrap_or_default().parse()?,
    })
  }
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
  AmountInCents::parse(value)
    .map(|_| ())
    .map_err(|e| to_validation_error(FieldError::from(e)))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
  value
    .parse::<InvoiceStatus>()
    .map(|_| ())
    .map_err(|_| {
      to_validation_error(FieldError::new(
        "status",
        FieldErrorKind::NotAllowed,
        "Please select an invoice status.",
      ))
    })
}

fn to_validation_error(error: FieldError) -> ValidationError {
  ValidationError::new(error.kind.code()).with_message(Cow::Owned(error.message))
}

impl From<ValidationErrors> for ValidationFailure {
  fn from(errors: ValidationErrors) -> Self {
    let field_errors = errors.field_errors();

    let errors = FORM_FIELDS
      .iter()
      .filter_map(|(struct_field, form_key)| {
        field_errors
          .iter()
          .find(|(name, _)| name.to_string() == *struct_field)
          .and_then(|(_, errs)| errs.first())
          .map(|err| {
            let kind = FieldErrorKind::from_code(&err.code);
            let message = err
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", form_key));
            FieldError::new(*form_key, kind, message)
          })
      })
      .collect();

    ValidationFailure::new(errors)
  }
}
