pub mod create_invoice;
pub mod delete_invoice;
pub mod get_invoice;
pub mod list_invoices;
pub mod update_invoice;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceResponse, CreateInvoiceUseCase};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceResponse, DeleteInvoiceUseCase};
pub use get_invoice::{GetInvoiceCommand, GetInvoiceUseCase, InvoiceDetailsResponse};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceResponse, UpdateInvoiceUseCase};
