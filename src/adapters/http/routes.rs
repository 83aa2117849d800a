use actix_web::{HttpResponse, http::header, web};
use std::sync::Arc;

use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, ListInvoicesUseCase,
  UpdateInvoiceUseCase,
};
use crate::domain::invoice::{INVOICES_PATH, ViewCache};

use super::handlers::invoices_web;
use super::templates::TemplateEngine;

/// Dependencies needed to mount the dashboard
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub view_cache: Arc<dyn ViewCache>,
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub get_invoice_use_case: Arc<GetInvoiceUseCase>,
}

/// Configure web UI routes
///
/// # Routes
///
/// - GET / - Redirect to the invoice listing
/// - GET /dashboard/invoices - Invoice listing (served from the view cache when fresh)
/// - GET /dashboard/invoices/create - Creation form
/// - POST /dashboard/invoices/create - Create an invoice
/// - GET /dashboard/invoices/{id}/edit - Edit form
/// - POST /dashboard/invoices/{id}/edit - Update an invoice
/// - POST /dashboard/invoices/{id}/delete - Delete an invoice
/// - DELETE /dashboard/invoices/{id} - Delete an invoice (htmx)
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, deps: WebRouteDependencies) {
  cfg.app_data(web::Data::new(deps.templates.clone()));

  cfg.route(
    "/",
    web::get().to(|| async {
      HttpResponse::Found()
        .insert_header((header::LOCATION, INVOICES_PATH))
        .finish()
    }),
  );

  cfg.service(
    web::scope(INVOICES_PATH)
      .app_data(web::Data::new(deps.templates))
      .app_data(web::Data::new(deps.view_cache))
      .app_data(web::Data::new(deps.create_invoice_use_case))
      .app_data(web::Data::new(deps.update_invoice_use_case))
      .app_data(web::Data::new(deps.delete_invoice_use_case))
      .app_data(web::Data::new(deps.list_invoices_use_case))
      .app_data(web::Data::new(deps.get_invoice_use_case))
      .route("", web::get().to(invoices_web::invoices_page))
      .route("/create", web::get().to(invoices_web::invoice_create_page))
      .route(
        "/create",
        web::post().to(invoices_web::create_invoice_submit),
      )
      .route(
        "/{invoice_id}/edit",
        web::get().to(invoices_web::invoice_edit_page),
      )
      .route(
        "/{invoice_id}/edit",
        web::post().to(invoices_web::update_invoice_submit),
      )
      .route(
        "/{invoice_id}/delete",
        web::post().to(invoices_web::delete_invoice),
      )
      .route(
        "/{invoice_id}",
        web::delete().to(invoices_web::delete_invoice),
      ),
  );
}

/// GET /health - Liveness probe
pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
