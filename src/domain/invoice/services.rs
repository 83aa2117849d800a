use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use super::entities::{Invoice, MutationReceipt};
use super::errors::InvoiceError;
use super::form::{FormData, InvoiceForm};
use super::ports::{InvoiceRepository, Navigator, ViewCache};
use super::value_objects::InvoiceId;

/// Logical path of the invoice listing view
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  view_cache: Arc<dyn ViewCache>,
}

impl InvoiceService {
  pub fn new(invoice_repo: Arc<dyn InvoiceRepository>, view_cache: Arc<dyn ViewCache>) -> Self {
    Self {
      invoice_repo,
      view_cache,
    }
  }

  pub async fn create_invoice(
    &self,
    form: &FormData,
    navigator: &dyn Navigator,
  ) -> Result<Invoice, InvoiceError> {
    let fields = InvoiceForm::from_form_data(form).parse()?;

    let invoice = Invoice::new(fields, today());
    let invoice = self.invoice_repo.create(invoice).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      amount_cents = invoice.amount.cents(),
      "Invoice created"
    );

    self.revalidate_listing().await;
    navigator.redirect(INVOICES_PATH);

    Ok(invoice)
  }

  pub async fn update_invoice(
    &self,
    id: &str,
    form: &FormData,
    navigator: &dyn Navigator,
  ) -> Result<MutationReceipt, InvoiceError> {
    let id = InvoiceId::new(id)?;
    let fields = InvoiceForm::from_form_data(form).parse()?;

    let rows_affected = self.invoice_repo.update(&id, &fields).await?;
    if rows_affected == 0 {
      tracing::warn!(invoice_id = %id, "Update matched no invoice");
    } else {
      tracing::info!(invoice_id = %id, "Invoice updated");
    }

    self.revalidate_listing().await;
    navigator.redirect(INVOICES_PATH);

    Ok(MutationReceipt {
      invoice_id: id,
      rows_affected,
    })
  }

  /// Deletes without redirecting: the caller is already on the listing.
  pub async fn delete_invoice(&self, id: &str) -> Result<MutationReceipt, InvoiceError> {
    let id = InvoiceId::new(id)?;

    let rows_affected = self.invoice_repo.delete(&id).await?;
    if rows_affected == 0 {
      tracing::warn!(invoice_id = %id, "Delete matched no invoice");
    } else {
      tracing::info!(invoice_id = %id, "Invoice deleted");
    }

    self.revalidate_listing().await;

    Ok(MutationReceipt {
      invoice_id: id,
      rows_affected,
    })
  }

  pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
    self.invoice_repo.find_all().await
  }

  pub async fn get_invoice(&self, id: &str) -> Result<Invoice, InvoiceError> {
    let id = InvoiceId::new(id)?;
    self
      .invoice_repo
      .find_by_id(&id)
      .await?
      .ok_or(InvoiceError::NotFound(id))
  }

  // The write is already committed, so a cache failure only leaves a stale view.
  async fn revalidate_listing(&self) {
    if let Err(e) = self.view_cache.revalidate(INVOICES_PATH).await {
      tracing::warn!(path = INVOICES_PATH, error = %e, "Failed to revalidate view");
    }
  }
}

fn today() -> NaiveDate {
  Utc::now().date_naive()
}
