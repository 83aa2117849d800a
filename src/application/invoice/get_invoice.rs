use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug)]
pub struct GetInvoiceCommand {
  pub invoice_id: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  pub id: String,
  pub customer_id: String,
  pub amount_cents: i64,
  pub amount: String,
  pub status: String,
  pub date: NaiveDate,
}

pub struct GetInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let invoice = self
      .invoice_service
      .get_invoice(&command.invoice_id)
      .await?;

    Ok(InvoiceDetailsResponse {
      amount: invoice.amount.to_string(),
      amount_cents: invoice.amount.cents(),
      status: invoice.status.as_str().to_string(),
      customer_id: invoice.customer_id.value().to_string(),
      id: invoice.id.into_inner(),
      date: invoice.date,
    })
  }
}
