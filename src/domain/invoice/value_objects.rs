use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice id: {0}")]
  InvalidInvoiceId(String),
  #[error("Invalid customer id: {0}")]
  InvalidCustomerId(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Amount out of range: {0}")]
  AmountOutOfRange(String),
  #[error("Invalid status: {0}")]
  InvalidStatus(String),
}

// Invoice Id - server-assigned, opaque to callers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceId(String);

impl InvoiceId {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidInvoiceId(
        "Invoice id cannot be empty".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// Fresh identifier for a row about to be inserted.
  pub fn generate() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for InvoiceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Customer Id - reference to a customer managed elsewhere, no format check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    if value.trim().is_empty() {
      return Err(ValueObjectError::InvalidCustomerId(
        "Customer id cannot be empty".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub const ALLOWED: [&'static str; 2] = ["pending", "paid"];

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  /// Exact match only: "Paid" or " paid" are rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Expected one of 'pending' or 'paid', got '{}'",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

// Amount In Cents - integer minor units, the only form an amount is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmountInCents(i64);

impl AmountInCents {
  /// Converts a major-unit decimal into cents, rounding half away from zero.
  pub fn from_decimal(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::AmountOutOfRange(
        "Amount cannot be negative".to_string(),
      ));
    }

    let cents = amount
      .checked_mul(Decimal::ONE_HUNDRED)
      .map(|c| c.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
      .and_then(|c| c.to_i64())
      .ok_or_else(|| ValueObjectError::AmountOutOfRange("Amount is too large".to_string()))?;

    Ok(Self(cents))
  }

  /// Parses raw form text ("45.50", "10", "1e3") and converts it to cents.
  pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
    Self::from_decimal(parse_decimal(raw)?)
  }

  pub fn from_cents(cents: i64) -> Self {
    Self(cents)
  }

  pub fn cents(&self) -> i64 {
    self.0
  }

  /// Major-unit view for display, always two decimal places.
  pub fn to_decimal(&self) -> Decimal {
    Decimal::new(self.0, 2)
  }
}

impl fmt::Display for AmountInCents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_decimal())
  }
}

fn parse_decimal(raw: &str) -> Result<Decimal, ValueObjectError> {
  let trimmed = raw.trim();
  let not_a_number = || ValueObjectError::InvalidAmount(format!("'{}' is not a number", raw));

  // rust_decimal skips '_' separators
  if !trimmed
    .chars()
    .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
  {
    return Err(not_a_number());
  }

  Decimal::from_str(trimmed)
    .or_else(|_| Decimal::from_scientific(trimmed))
    .map_err(|_| not_a_number())
}
