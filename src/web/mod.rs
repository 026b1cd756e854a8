//! HTTP surface the browser UI talks to: storefront pages, customer actions,
//! payment returns and the back office.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::{ApiClient, Config};

pub mod accounts;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod extract;

pub use error::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: ApiClient, config: Config) -> Self { Self { api, config: Arc::new(config) } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/catalog", get(catalog::catalog_page))
        .route("/models/:id", get(catalog::product_detail))
        .route("/models/:id/reviews", get(catalog::list_reviews).post(catalog::post_review))
        .route("/models/:id/comments", get(catalog::list_comments).post(catalog::post_comment))
        .route("/auth/login", post(accounts::login))
        .route("/auth/register", post(accounts::register))
        .route("/account", get(accounts::me))
        .route("/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/cart/:id", put(cart::update_line).delete(cart::remove_line))
        .route("/wishlist", get(cart::get_wishlist).post(cart::add_to_wishlist))
        .route("/wishlist/:id", delete(cart::remove_from_wishlist))
        .route("/wishlist/:id/move-to-cart", post(cart::move_to_cart))
        .route("/checkout", post(checkout::checkout))
        .route("/payment/momo-return", get(checkout::momo_return))
        .route("/payment/vnpay-return", get(checkout::vnpay_return))
        .route("/orders", get(checkout::my_orders))
        .route("/orders/:id/cancel", post(checkout::cancel_order))
        .route("/orders/:id/received", post(checkout::confirm_received))
        .nest("/admin", admin::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
