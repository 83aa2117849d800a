use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceService};

#[derive(Debug, Default)]
pub struct ListInvoicesCommand;

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: String,
  pub customer_id: String,
  pub amount_cents: i64,
  /// Major units with two decimals, e.g. "45.50"
  pub amount: String,
  pub status: String,
  pub date: NaiveDate,
}

impl From<Invoice> for InvoiceListItemDto {
  fn from(invoice: Invoice) -> Self {
    Self {
      amount: invoice.amount.to_string(),
      amount_cents: invoice.amount.cents(),
      status: invoice.status.as_str().to_string(),
      customer_id: invoice.customer_id.value().to_string(),
      id: invoice.id.into_inner(),
      date: invoice.date,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    _command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    Ok(ListInvoicesResponse {
      invoices: invoices.into_iter().map(InvoiceListItemDto::from).collect(),
    })
  }
}
