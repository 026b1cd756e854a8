//! Cart and wishlist actions. Each action loads the current list, forwards one
//! mutation upstream and answers with the patched view.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use super::catalog::{load_model, select};
use super::extract::{Bearer, ValidatedJson};
use super::{AppResult, AppState};
use crate::domain::aggregates::wishlist::WishlistItemView;
use crate::domain::aggregates::{AddCartLine, AddWishlistItem, Cart, CartView, Wishlist};
use crate::domain::events::{self, CartEvent, StoreEvent};
use crate::{Id, StorefrontError};

pub async fn get_cart(State(s): State<AppState>, auth: Bearer) -> AppResult<Json<CartView>> {
    let lines = auth.session(&s.api).cart().await?;
    Ok(Json(Cart::from_lines(lines).view()))
}

/// What the product detail page submits: the shopper's picks, resolved to a variant here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub model_id: Id,
    pub color_id: Option<Id>,
    pub size_id: Option<Id>,
    #[serde(default = "one")]
    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,
}

fn one() -> u32 { 1 }

pub async fn add_to_cart(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<AddToCartForm>) -> AppResult<Json<CartView>> {
    let session = auth.session(&s.api);
    let model = load_model(&s.api, form.model_id).await?;
    let line = select(model, form.color_id, form.size_id, Some(form.quantity))?.to_cart_line()?;
    let mut cart = Cart::from_lines(session.cart().await?);
    let stored = session.add_to_cart(&line).await?;
    cart.apply_added(stored);
    events::log_all(cart.take_events());
    Ok(Json(cart.view()))
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate { pub quantity: u32 }

pub async fn update_line(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, Json(update): Json<QuantityUpdate>) -> AppResult<Json<CartView>> {
    let session = auth.session(&s.api);
    let mut cart = Cart::from_lines(session.cart().await?);
    let quantity = cart.clamped_quantity(id, update.quantity)?;
    if quantity == 0 {
        session.remove_cart_line(id).await?;
    } else {
        session.update_cart_line(id, quantity).await?;
    }
    cart.apply_quantity(id, quantity)?;
    events::log_all(cart.take_events());
    Ok(Json(cart.view()))
}

pub async fn remove_line(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<CartView>> {
    let session = auth.session(&s.api);
    let mut cart = Cart::from_lines(session.cart().await?);
    if cart.line(id).is_none() { return Err(StorefrontError::NotFound("Cart line")); }
    session.remove_cart_line(id).await?;
    cart.apply_removed(id)?;
    events::log_all(cart.take_events());
    Ok(Json(cart.view()))
}

pub async fn get_wishlist(State(s): State<AppState>, auth: Bearer) -> AppResult<Json<Vec<WishlistItemView>>> {
    let items = auth.session(&s.api).wishlist().await?;
    Ok(Json(Wishlist::from_items(items).view()))
}

/// Saving a product twice is a no-op that never reaches the upstream.
pub async fn add_to_wishlist(State(s): State<AppState>, auth: Bearer, Json(item): Json<AddWishlistItem>) -> AppResult<Json<Vec<WishlistItemView>>> {
    let session = auth.session(&s.api);
    let mut wishlist = Wishlist::from_items(session.wishlist().await?);
    if !wishlist.contains(item.product_id) {
        let saved = session.add_to_wishlist(&item).await?;
        wishlist.apply_added(saved);
        events::log_all(wishlist.take_events());
    }
    Ok(Json(wishlist.view()))
}

pub async fn remove_from_wishlist(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<Vec<WishlistItemView>>> {
    let session = auth.session(&s.api);
    let mut wishlist = Wishlist::from_items(session.wishlist().await?);
    if wishlist.item(id).is_none() { return Err(StorefrontError::NotFound("Wishlist item")); }
    session.remove_from_wishlist(id).await?;
    wishlist.apply_removed(id)?;
    events::log_all(wishlist.take_events());
    Ok(Json(wishlist.view()))
}

pub async fn move_to_cart(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<Vec<WishlistItemView>>> {
    let session = auth.session(&s.api);
    let mut wishlist = Wishlist::from_items(session.wishlist().await?);
    let item = wishlist.item(id).ok_or(StorefrontError::NotFound("Wishlist item"))?;
    if !item.product.in_stock() { return Err(StorefrontError::OutOfStock); }
    let line = session.add_to_cart(&AddCartLine { product_id: item.product.id, quantity: 1 }).await?;
    StoreEvent::Cart(CartEvent::LineAdded { product_id: line.product.id, quantity: line.quantity }).log();
    if let Err(e) = session.remove_from_wishlist(id).await {
        tracing::warn!(error = %e, item_id = id, product_id = line.product.id, "added to cart but still on the wishlist");
        return Err(e.into());
    }
    wishlist.apply_removed(id)?;
    events::log_all(wishlist.take_events());
    Ok(Json(wishlist.view()))
}
