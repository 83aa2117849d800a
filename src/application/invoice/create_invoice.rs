use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{FormData, InvoiceError, InvoiceService, Navigator};

#[derive(Debug)]
pub struct CreateInvoiceCommand {
  pub form: FormData,
}

#[derive(Debug, Serialize)]
pub struct CreateInvoiceResponse {
  pub invoice_id: String,
  pub amount_cents: i64,
  pub status: String,
  pub date: NaiveDate,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
    navigator: &dyn Navigator,
  ) -> Result<CreateInvoiceResponse, InvoiceError> {
    let invoice = self
      .invoice_service
      .create_invoice(&command.form, navigator)
      .await?;

    Ok(CreateInvoiceResponse {
      invoice_id: invoice.id.into_inner(),
      amount_cents: invoice.amount.cents(),
      status: invoice.status.as_str().to_string(),
      date: invoice.date,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::INVOICES_PATH;
  use crate::domain::invoice::test_support::{
    InMemoryInvoiceRepository, RecordingNavigator, RecordingViewCache, form,
  };

  #[tokio::test]
  async fn test_create_invoice_response() {
    let repo = Arc::new(InMemoryInvoiceRepository::new());
    let service = Arc::new(InvoiceService::new(
      repo.clone(),
      Arc::new(RecordingViewCache::new()),
    ));
    let use_case = CreateInvoiceUseCase::new(service);
    let navigator = RecordingNavigator::new();

    let response = use_case
      .execute(
        CreateInvoiceCommand {
          form: form(&[("customerId", "c1"), ("amount", "45.50"), ("status", "pending")]),
        },
        &navigator,
      )
      .await
      .unwrap();

    assert_eq!(response.amount_cents, 4550);
    assert_eq!(response.status, "pending");
    assert_eq!(repo.rows()[0].id.value(), response.invoice_id);
    assert_eq!(navigator.locations(), vec![INVOICES_PATH]);
  }
}
