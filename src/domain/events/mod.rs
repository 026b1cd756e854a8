//! Domain events
//!
//! Raised by aggregates while they mirror a completed upstream call; handlers
//! drain them with `take_events` and log them.

use crate::domain::aggregates::invoice::{InvoiceStatus, PaymentMethod};
use crate::Id;

#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
    Feedback(FeedbackEvent),
    Invoice(InvoiceEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    LineAdded { product_id: Id, quantity: u32 },
    LineUpdated { line_id: Id, quantity: u32 },
    LineRemoved { line_id: Id },
}

#[derive(Clone, Debug, PartialEq)]
pub enum WishlistEvent {
    Added { product_id: Id },
    Removed { item_id: Id },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackEvent {
    ReviewPosted { model_id: Id, rating: u8 },
    CommentPosted { model_id: Id, comment_id: Id, parent_id: Option<Id> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum InvoiceEvent {
    Placed { invoice_id: Id, method: PaymentMethod },
    StatusChanged { invoice_id: Id, from: InvoiceStatus, to: InvoiceStatus },
    PaymentReturned { invoice_id: Option<Id>, method: PaymentMethod, success: bool },
}

impl StoreEvent {
    /// Emits the event on the `storefront::events` tracing target.
    pub fn log(&self) {
        match self {
            StoreEvent::Cart(e) => tracing::info!(target: "storefront::events", event = ?e, "cart"),
            StoreEvent::Wishlist(e) => tracing::info!(target: "storefront::events", event = ?e, "wishlist"),
            StoreEvent::Feedback(e) => tracing::info!(target: "storefront::events", event = ?e, "feedback"),
            StoreEvent::Invoice(e) => tracing::info!(target: "storefront::events", event = ?e, "invoice"),
        }
    }
}

pub fn log_all(events: impl IntoIterator<Item = StoreEvent>) {
    for event in events { event.log(); }
}
