pub mod entities;
pub mod errors;
pub mod form;
pub mod ports;
pub mod services;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod test_support;

pub use entities::{Invoice, MutationReceipt};
pub use errors::{FieldError, FieldErrorKind, InvoiceError, ValidationFailure};
pub use form::{FormData, InvoiceFields, InvoiceForm};
pub use ports::{CacheError, CachedView, InvoiceRepository, Navigator, ViewCache};
pub use services::{INVOICES_PATH, InvoiceService};
pub use value_objects::{AmountInCents, CustomerId, InvoiceId, InvoiceStatus, ValueObjectError};
