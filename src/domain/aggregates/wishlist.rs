//! Wishlist Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::catalog::Product;
use crate::domain::events::{StoreEvent, WishlistEvent};
use crate::Id;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: Id,
    pub product: Product,
    #[serde(default)] pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItem { pub product_id: Id }

#[derive(Clone, Debug, Default)]
pub struct Wishlist { items: Vec<WishlistItem>, events: Vec<StoreEvent> }

impl Wishlist {
    pub fn from_items(items: Vec<WishlistItem>) -> Self { Self { items, events: vec![] } }
    pub fn items(&self) -> &[WishlistItem] { &self.items }
    pub fn item(&self, item_id: Id) -> Option<&WishlistItem> { self.items.iter().find(|i| i.id == item_id) }
    pub fn contains(&self, product_id: Id) -> bool { self.items.iter().any(|i| i.product.id == product_id) }

    /// Returns false when the product was already saved.
    pub fn apply_added(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.product.id) { return false; }
        self.events.push(StoreEvent::Wishlist(WishlistEvent::Added { product_id: item.product.id }));
        self.items.insert(0, item);
        true
    }

    pub fn apply_removed(&mut self, item_id: Id) -> Result<WishlistItem, WishlistError> {
        let pos = self.items.iter().position(|i| i.id == item_id).ok_or(WishlistError::ItemNotFound(item_id))?;
        self.events.push(StoreEvent::Wishlist(WishlistEvent::Removed { item_id }));
        Ok(self.items.remove(pos))
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> { std::mem::take(&mut self.events) }

    pub fn view(&self) -> Vec<WishlistItemView> {
        self.items.iter().map(|i| WishlistItemView {
            id: i.id,
            product_id: i.product.id,
            model_id: i.product.model_id,
            name: i.product.model_name.clone().unwrap_or_default(),
            color: i.product.color.name.clone(),
            size: i.product.size.name.clone(),
            price: i.product.price().format(),
            in_stock: i.product.in_stock(),
        }).collect()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemView {
    pub id: Id,
    pub product_id: Id,
    pub model_id: Id,
    pub name: String,
    pub color: String,
    pub size: String,
    pub price: String,
    pub in_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WishlistError {
    #[error("Wishlist item {0} not found")]
    ItemNotFound(Id),
}
