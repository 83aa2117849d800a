use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::invoice::{FormData, ValidationFailure};

use super::errors::ApiError;

/// Submitted values echoed back into a re-rendered invoice form
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceFormValues {
  pub customer_id: String,
  pub amount: String,
  pub status: String,
}

impl From<&FormData> for InvoiceFormValues {
  fn from(form: &FormData) -> Self {
    let value = |key: &str| form.get(key).unwrap_or_default().to_string();
    Self {
      customer_id: value("customerId"),
      amount: value("amount"),
      status: value("status"),
    }
  }
}

/// Field key to message, as the form partial looks errors up
pub fn field_messages(failure: &ValidationFailure) -> BTreeMap<String, String> {
  failure
    .errors
    .iter()
    .map(|e| (e.field.clone(), e.message.clone()))
    .collect()
}

/// Decodes an `application/x-www-form-urlencoded` body, keeping order and repeats
pub fn decode_form(body: &[u8]) -> Result<FormData, ApiError> {
  serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
    .map(FormData::from_iter)
    .map_err(|e| ApiError::BadRequest(format!("Malformed form body: {}", e)))
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Per-field errors for validation failures
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
