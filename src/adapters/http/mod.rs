pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod navigation;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{ErrorResponse, InvoiceFormValues};
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use navigation::ResponseNavigator;
pub use routes::{WebRouteDependencies, configure_web_routes, health_check};
pub use templates::TemplateEngine;
