//! Invoice Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::domain::aggregates::catalog::Product;
use crate::domain::events::{InvoiceEvent, StoreEvent};
use crate::domain::value_objects::{not_blank, validate_phone, Money, PageRequest, DEFAULT_CURRENCY};
use crate::{Id, StorefrontError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus { #[default] Placed, Approved, Shipped, Received, Cancelled }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod { #[default] Cod, Momo, VnPay }

/// Who is asking for a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor { Customer, Staff }

impl InvoiceStatus {
    pub fn is_terminal(&self) -> bool { matches!(self, Self::Received | Self::Cancelled) }

    pub fn allowed_next(&self, actor: Actor) -> &'static [InvoiceStatus] {
        use InvoiceStatus::*;
        match (actor, self) {
            (Actor::Staff, Placed) => &[Approved, Cancelled],
            (Actor::Staff, Approved) => &[Shipped, Cancelled],
            (Actor::Staff, Shipped) => &[Received],
            (Actor::Customer, Placed) => &[Cancelled],
            (Actor::Customer, Shipped) => &[Received],
            _ => &[],
        }
    }

    pub fn can_transition(&self, to: InvoiceStatus, actor: Actor) -> bool { self.allowed_next(actor).contains(&to) }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self { Self::Placed => "Placed", Self::Approved => "Approved", Self::Shipped => "Shipped", Self::Received => "Received", Self::Cancelled => "Cancelled" };
        f.write_str(s)
    }
}

impl PaymentMethod {
    /// Gateway path segment for online methods; cash on delivery has none.
    pub fn gateway(&self) -> Option<&'static str> {
        match self { Self::Cod => None, Self::Momo => Some("Momo"), Self::VnPay => Some("VnPay") }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    pub id: Id,
    #[serde(default)] pub invoice_id: Option<Id>,
    pub product_id: Id,
    #[serde(default)] pub product: Option<Product>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl InvoiceDetail {
    pub fn line_total(&self) -> Money { Money::vnd(self.unit_price).multiply(self.quantity) }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Id,
    #[serde(default)] pub account_id: Option<Id>,
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)] pub note: Option<String>,
    pub status: InvoiceStatus,
    #[serde(default)] pub payment_method: PaymentMethod,
    #[serde(default)] pub is_paid: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)] pub details: Vec<InvoiceDetail>,
    #[serde(default)] pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<StoreEvent>,
}

impl Invoice {
    pub fn status(&self) -> InvoiceStatus { self.status }

    /// Sum of the line items when present, otherwise the server's total.
    pub fn total(&self) -> Money {
        if self.details.is_empty() { return Money::vnd(self.total); }
        self.details.iter().fold(Money::zero(DEFAULT_CURRENCY), |acc, d| acc.add(&d.line_total()).unwrap_or(acc))
    }

    pub fn available_transitions(&self, actor: Actor) -> Vec<InvoiceStatus> { self.status.allowed_next(actor).to_vec() }

    /// Validates and applies a status change, returning the previous status.
    pub fn transition(&mut self, to: InvoiceStatus, actor: Actor) -> Result<InvoiceStatus, StorefrontError> {
        let from = self.status;
        if !from.can_transition(to, actor) { return Err(StorefrontError::InvalidTransition { from, to }); }
        self.status = to;
        self.events.push(StoreEvent::Invoice(InvoiceEvent::StatusChanged { invoice_id: self.id, from, to }));
        Ok(from)
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> { std::mem::take(&mut self.events) }

    pub fn view(&self, actor: Actor) -> InvoiceView {
        InvoiceView {
            id: self.id,
            receiver_name: self.receiver_name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            note: self.note.clone(),
            status: self.status,
            payment_method: self.payment_method,
            is_paid: self.is_paid,
            total: self.total().format(),
            created_at: self.created_at,
            details: self.details.iter().map(|d| InvoiceDetailView {
                product_id: d.product_id,
                name: d.product.as_ref().and_then(|p| p.model_name.clone()).unwrap_or_default(),
                color: d.product.as_ref().map(|p| p.color.name.clone()),
                size: d.product.as_ref().map(|p| p.size.name.clone()),
                quantity: d.quantity,
                unit_price: Money::vnd(d.unit_price).format(),
                line_total: d.line_total().format(),
            }).collect(),
            actions: self.available_transitions(actor),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailView {
    pub product_id: Id,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub id: Id,
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    pub note: Option<String>,
    pub status: InvoiceStatus,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub total: String,
    pub created_at: Option<DateTime<Utc>>,
    pub details: Vec<InvoiceDetailView>,
    pub actions: Vec<InvoiceStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusUpdate { pub status: InvoiceStatus }

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub receiver_name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 1, max = 300), custom = "not_blank")]
    pub address: String,
    #[serde(default)] #[validate(length(max = 500))]
    pub note: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Trimmed copy for the upstream `POST /Invoices`.
    pub fn normalized(self) -> Self {
        Self {
            receiver_name: self.receiver_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            note: self.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            payment_method: self.payment_method,
        }
    }
}

/// Body for `POST /Payments/{gateway}`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub invoice_id: Id,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub return_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRedirect { pub pay_url: String }

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl InvoiceFilter {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let page = PageRequest::new(self.page, self.page_size);
        let mut params = vec![("page", page.page().to_string()), ("pageSize", page.page_size().to_string())];
        if let Some(status) = self.status { params.push(("status", status.to_string())); }
        params
    }
}

pub fn placed_event(invoice: &Invoice) -> StoreEvent {
    StoreEvent::Invoice(InvoiceEvent::Placed { invoice_id: invoice.id, method: invoice.payment_method })
}
