//! Typed access to the remote commerce API, one module per resource family.
pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod feedback;
pub mod invoices;

pub use client::{ApiClient, ApiError, Session, REQUEST_ID_HEADER};

pub(crate) const NO_QUERY: &[(&str, &str)] = &[];
