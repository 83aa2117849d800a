use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::form::InvoiceFields;
use super::value_objects::{AmountInCents, CustomerId, InvoiceId, InvoiceStatus};

// Invoice - one row of the invoices table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: InvoiceId,
  pub customer_id: CustomerId,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl Invoice {
  /// New invoice with a fresh id, dated `date`.
  pub fn new(fields: InvoiceFields, date: NaiveDate) -> Self {
    Self {
      id: InvoiceId::generate(),
      customer_id: fields.customer_id,
      amount: fields.amount,
      status: fields.status,
      date,
    }
  }

  /// Applies an update. `id` and `date` are fixed at creation.
  pub fn apply(&mut self, fields: InvoiceFields) {
    self.customer_id = fields.customer_id;
    self.amount = fields.amount;
    self.status = fields.status;
  }
}

/// Outcome of an update or delete.
///
/// Zero rows affected is reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReceipt {
  pub invoice_id: InvoiceId,
  pub rows_affected: u64,
}

impl MutationReceipt {
  pub fn matched(&self) -> bool {
    self.rows_affected > 0
  }
}
