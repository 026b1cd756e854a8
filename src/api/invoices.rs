//! Invoices and payment gateway hand-off.

use reqwest::Method;

use super::{ApiError, Session, NO_QUERY};
use crate::domain::aggregates::{CheckoutForm, CreatePayment, Invoice, InvoiceFilter, InvoiceStatus, PaymentRedirect, PaymentReturn, StatusUpdate};
use crate::domain::value_objects::Paged;
use crate::Id;

impl Session<'_> {
    /// Turns the current cart into an invoice.
    pub async fn place_invoice(&self, form: &CheckoutForm) -> Result<Invoice, ApiError> {
        self.api.send_json(Method::POST, "/Invoices", form, Some(self.token)).await
    }

    pub async fn my_invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        self.api.get_json("/Invoices/Mine", NO_QUERY, Some(self.token)).await
    }

    pub async fn invoices(&self, filter: &InvoiceFilter) -> Result<Paged<Invoice>, ApiError> {
        self.api.get_json("/Invoices", &filter.to_params(), Some(self.token)).await
    }

    pub async fn invoice(&self, id: Id) -> Result<Invoice, ApiError> {
        self.api.get_json(&format!("/Invoices/{id}"), NO_QUERY, Some(self.token)).await
    }

    pub async fn set_invoice_status(&self, id: Id, status: InvoiceStatus) -> Result<(), ApiError> {
        self.api.send_discard(Method::PUT, &format!("/Invoices/{id}/Status"), &StatusUpdate { status }, Some(self.token)).await
    }

    /// Asks the server for a gateway URL; `gateway` is `Momo` or `VnPay`.
    pub async fn create_payment(&self, gateway: &str, payment: &CreatePayment) -> Result<PaymentRedirect, ApiError> {
        self.api.send_json(Method::POST, &format!("/Payments/{gateway}"), payment, Some(self.token)).await
    }
}

impl super::ApiClient {
    /// Forwards the gateway's return query for server-side verification.
    /// The shopper's browser lands here straight from the gateway, so no token is sent.
    pub async fn confirm_payment_return(&self, ret: &PaymentReturn) -> Result<(), ApiError> {
        let gateway = ret.method().gateway().unwrap_or("Cod");
        self.get_discard(&format!("/Payments/{gateway}Return"), ret.params(), None).await
    }
}
