use actix_web::{
  HttpRequest, HttpResponse,
  http::{StatusCode, header},
  web,
};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{InvoiceFormValues, decode_form, field_messages},
  errors::ApiError,
  navigation::{ResponseNavigator, is_htmx},
  templates::{TemplateEngine, path_segment},
};
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, DeleteInvoiceCommand, DeleteInvoiceUseCase,
  GetInvoiceCommand, GetInvoiceUseCase, ListInvoicesCommand, ListInvoicesUseCase,
  UpdateInvoiceCommand, UpdateInvoiceUseCase,
};
use crate::domain::invoice::{
  CachedView, INVOICES_PATH, InvoiceError, ValidationFailure, ViewCache,
};

const CACHE_STATUS_HEADER: &str = "X-Cache";

/// Everything the invoice form partial needs to render
struct FormPage<'a> {
  template: &'a str,
  action: String,
  submit_label: &'a str,
  invoice_id: Option<&'a str>,
  values: InvoiceFormValues,
  failure: Option<&'a ValidationFailure>,
}

impl FormPage<'_> {
  fn render(&self, templates: &TemplateEngine) -> Result<String, ApiError> {
    let mut context = tera::Context::new();
    context.insert("action", &self.action);
    context.insert("submit_label", self.submit_label);
    context.insert("invoice_id", &self.invoice_id);
    context.insert("form", &self.values);
    context.insert(
      "errors",
      &self.failure.map(field_messages).unwrap_or_default(),
    );

    Ok(templates.render(self.template, &context)?)
  }
}

fn edit_action(invoice_id: &str) -> String {
  format!("{}/{}/edit", INVOICES_PATH, path_segment(invoice_id))
}

fn html(status: StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/html; charset=utf-8")
    .body(body)
}

fn listing(body: String, cache_status: &'static str) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/html; charset=utf-8")
    .insert_header((CACHE_STATUS_HEADER, cache_status))
    .body(body)
}

/// Re-renders the submitted form with field errors.
///
/// htmx swaps only the form partial; a plain post gets the whole page back.
fn rejected_form(
  req: &HttpRequest,
  templates: &TemplateEngine,
  mut page: FormPage<'_>,
) -> Result<HttpResponse, ApiError> {
  if is_htmx(req) {
    page.template = "partials/invoice_form.html.tera";
  }
  Ok(html(StatusCode::BAD_REQUEST, page.render(templates)?))
}

// GET /dashboard/invoices - List all invoices
pub async fn invoices_page(
  templates: web::Data<TemplateEngine>,
  view_cache: web::Data<Arc<dyn ViewCache>>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let generation = match view_cache.lookup(INVOICES_PATH).await {
    Ok(CachedView::Hit(body)) => {
      tracing::debug!("Serving {} from view cache", INVOICES_PATH);
      return Ok(listing(body, "HIT"));
    }
    Ok(CachedView::Miss { generation }) => Some(generation),
    Err(e) => {
      tracing::warn!("View cache read failed for {}: {}", INVOICES_PATH, e);
      None
    }
  };

  let response = list_invoices_use_case
    .execute(ListInvoicesCommand)
    .await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);

  let body = templates.render("pages/invoices.html.tera", &context)?;

  // Stored under the generation seen before the read; a write since then has moved past it
  if let Some(generation) = generation {
    if let Err(e) = view_cache.put(INVOICES_PATH, generation, &body).await {
      tracing::warn!("View cache write failed for {}: {}", INVOICES_PATH, e);
    }
  }

  Ok(listing(body, "MISS"))
}

// GET /dashboard/invoices/create - Show invoice creation form
pub async fn invoice_create_page(
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ApiError> {
  let page = FormPage {
    template: "pages/invoice_create.html.tera",
    action: format!("{}/create", INVOICES_PATH),
    submit_label: "Create Invoice",
    invoice_id: None,
    values: InvoiceFormValues::default(),
    failure: None,
  };

  Ok(html(StatusCode::OK, page.render(&templates)?))
}

// POST /dashboard/invoices/create - Create a new invoice
pub async fn create_invoice_submit(
  req: HttpRequest,
  body: web::Bytes,
  templates: web::Data<TemplateEngine>,
  create_invoice_use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let form = decode_form(&body)?;
  let navigator = ResponseNavigator::new();

  let result = create_invoice_use_case
    .execute(CreateInvoiceCommand { form: form.clone() }, &navigator)
    .await;

  match result {
    Ok(created) => {
      tracing::debug!("Invoice {} created via web form", created.invoice_id);
      Ok(navigator.into_response(&req))
    }
    Err(InvoiceError::Validation(failure)) => rejected_form(
      &req,
      &templates,
      FormPage {
        template: "pages/invoice_create.html.tera",
        action: format!("{}/create", INVOICES_PATH),
        submit_label: "Create Invoice",
        invoice_id: None,
        values: InvoiceFormValues::from(&form),
        failure: Some(&failure),
      },
    ),
    Err(e) => Err(e.into()),
  }
}

// GET /dashboard/invoices/{id}/edit - Show invoice edit form
pub async fn invoice_edit_page(
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  get_invoice_use_case: web::Data<Arc<GetInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = path.into_inner();

  let invoice = get_invoice_use_case
    .execute(GetInvoiceCommand {
      invoice_id: invoice_id.clone(),
    })
    .await?;

  let page = FormPage {
    template: "pages/invoice_edit.html.tera",
    action: edit_action(&invoice.id),
    submit_label: "Edit Invoice",
    invoice_id: Some(&invoice_id),
    values: InvoiceFormValues {
      customer_id: invoice.customer_id.clone(),
      amount: invoice.amount.clone(),
      status: invoice.status.clone(),
    },
    failure: None,
  };

  Ok(html(StatusCode::OK, page.render(&templates)?))
}

// POST /dashboard/invoices/{id}/edit - Update an invoice
pub async fn update_invoice_submit(
  req: HttpRequest,
  path: web::Path<String>,
  body: web::Bytes,
  templates: web::Data<TemplateEngine>,
  update_invoice_use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = path.into_inner();
  let form = decode_form(&body)?;
  let navigator = ResponseNavigator::new();

  let result = update_invoice_use_case
    .execute(
      UpdateInvoiceCommand {
        invoice_id: invoice_id.clone(),
        form: form.clone(),
      },
      &navigator,
    )
    .await;

  match result {
    Ok(_) => Ok(navigator.into_response(&req)),
    Err(InvoiceError::Validation(failure)) => rejected_form(
      &req,
      &templates,
      FormPage {
        template: "pages/invoice_edit.html.tera",
        action: edit_action(&invoice_id),
        submit_label: "Edit Invoice",
        invoice_id: Some(&invoice_id),
        values: InvoiceFormValues::from(&form),
        failure: Some(&failure),
      },
    ),
    Err(e) => Err(e.into()),
  }
}

// POST /dashboard/invoices/{id}/delete and DELETE /dashboard/invoices/{id}
pub async fn delete_invoice(
  req: HttpRequest,
  path: web::Path<String>,
  delete_invoice_use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = delete_invoice_use_case
    .execute(DeleteInvoiceCommand {
      invoice_id: path.into_inner(),
    })
    .await?;

  tracing::debug!(
    "Delete of {} removed {} row(s)",
    response.invoice_id,
    response.rows_affected
  );

  if !is_htmx(&req) {
    return Ok(
      HttpResponse::SeeOther()
        .insert_header((header::LOCATION, INVOICES_PATH))
        .finish(),
    );
  }

  // Empty body lets an htmx row swap remove the element
  Ok(HttpResponse::Ok().finish())
}
