use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{FormData, InvoiceError, InvoiceService, Navigator};

#[derive(Debug)]
pub struct UpdateInvoiceCommand {
  /// Taken from the request path, never from the form body
  pub invoice_id: String,
  pub form: FormData,
}

#[derive(Debug, Serialize)]
pub struct UpdateInvoiceResponse {
  pub invoice_id: String,
  pub rows_affected: u64,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: UpdateInvoiceCommand,
    navigator: &dyn Navigator,
  ) -> Result<UpdateInvoiceResponse, InvoiceError> {
    let receipt = self
      .invoice_service
      .update_invoice(&command.invoice_id, &command.form, navigator)
      .await?;

    Ok(UpdateInvoiceResponse {
      invoice_id: receipt.invoice_id.into_inner(),
      rows_affected: receipt.rows_affected,
    })
  }
}
