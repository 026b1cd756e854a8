//! Storefront
//!
//! Customer storefront and employee back office served over a remote commerce API.
//!
//! ## Features
//! - Catalog browsing with brand/color/size/price facets
//! - Product detail with color and size variant selection
//! - Cart, wishlist and checkout with Momo / VNPay redirects
//! - Reviews and threaded comments
//! - Back office for invoices, products, catalog attributes and accounts
//!
//! Every record is owned by the remote API. This crate fetches the slice a
//! view needs, shapes it into a view model and forwards user actions upstream.

use thiserror::Error;
use validator::ValidationErrors;

pub mod api;
pub mod config;
pub mod domain;
pub mod web;

pub use api::{ApiClient, ApiError, Session};
pub use config::Config;
pub use domain::aggregates::invoice::InvoiceStatus;
pub use domain::aggregates::{CartError, FeedbackError, SelectionError, WishlistError};

/// Identifier assigned by the remote API.
pub type Id = i64;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Cannot move invoice from {from} to {to}")]
    InvalidTransition { from: InvoiceStatus, to: InvoiceStatus },

    #[error("Please choose a color and size first")]
    SelectionIncomplete,

    #[error("This variant is out of stock")]
    OutOfStock,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please sign in to continue")]
    Unauthorized,

    #[error(transparent)]
    Upstream(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

impl From<ValidationErrors> for StorefrontError {
    fn from(errors: ValidationErrors) -> Self { Self::Validation(validation_message(&errors)) }
}

impl From<SelectionError> for StorefrontError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::Incomplete => Self::SelectionIncomplete,
            SelectionError::OutOfStock => Self::OutOfStock,
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<CartError> for StorefrontError {
    fn from(e: CartError) -> Self {
        match e { CartError::LineNotFound(_) => Self::NotFound("Cart line") }
    }
}

impl From<WishlistError> for StorefrontError {
    fn from(e: WishlistError) -> Self {
        match e { WishlistError::ItemNotFound(_) => Self::NotFound("Wishlist item") }
    }
}

impl From<FeedbackError> for StorefrontError {
    fn from(e: FeedbackError) -> Self {
        match e { FeedbackError::ParentNotFound(_) => Self::NotFound("Parent comment") }
    }
}

/// Flattens field errors into one toast-sized line, fields in name order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    let mut parts = Vec::new();
    for (field, errs) in fields {
        for err in errs {
            let detail = err.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| err.code.to_string());
            parts.push(if field == "__all__" { detail } else { format!("{field}: {detail}") });
        }
    }
    if parts.is_empty() { "Invalid input".to_string() } else { parts.join("; ") }
}
