use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug)]
pub struct DeleteInvoiceCommand {
  pub invoice_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteInvoiceResponse {
  pub invoice_id: String,
  pub rows_affected: u64,
}

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: DeleteInvoiceCommand,
  ) -> Result<DeleteInvoiceResponse, InvoiceError> {
    let receipt = self
      .invoice_service
      .delete_invoice(&command.invoice_id)
      .await?;

    Ok(DeleteInvoiceResponse {
      invoice_id: receipt.invoice_id.into_inner(),
      rows_affected: receipt.rows_affected,
    })
  }
}
