//! Application layer
//!
//! Use cases that wrap the invoice service for the HTTP adapter. Each one
//! takes a command, calls the domain service and shapes a response DTO.

pub mod invoice;
