//! Cart and wishlist endpoints. Both are per-account, so every call needs a session.

use reqwest::Method;
use serde_json::json;

use super::{ApiError, Session, NO_QUERY};
use crate::domain::aggregates::{AddCartLine, AddWishlistItem, CartLine, WishlistItem};
use crate::Id;

impl Session<'_> {
    pub async fn cart(&self) -> Result<Vec<CartLine>, ApiError> {
        self.api.get_json("/Carts", NO_QUERY, Some(self.token)).await
    }

    /// Returns the line as stored, with any merged quantity.
    pub async fn add_to_cart(&self, line: &AddCartLine) -> Result<CartLine, ApiError> {
        self.api.send_json(Method::POST, "/Carts", line, Some(self.token)).await
    }

    pub async fn update_cart_line(&self, line_id: Id, quantity: u32) -> Result<(), ApiError> {
        self.api.send_discard(Method::PUT, &format!("/Carts/{line_id}"), &json!({ "quantity": quantity }), Some(self.token)).await
    }

    pub async fn remove_cart_line(&self, line_id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Carts/{line_id}"), Some(self.token)).await
    }

    pub async fn wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        self.api.get_json("/Wishlists", NO_QUERY, Some(self.token)).await
    }

    pub async fn add_to_wishlist(&self, item: &AddWishlistItem) -> Result<WishlistItem, ApiError> {
        self.api.send_json(Method::POST, "/Wishlists", item, Some(self.token)).await
    }

    pub async fn remove_from_wishlist(&self, item_id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Wishlists/{item_id}"), Some(self.token)).await
    }
}
