mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

fn shop() -> FakeUpstream {
    FakeUpstream::new()
        .on(Method::GET, "/Models/1", runner_model())
        .on(Method::GET, "/Products", runner_products())
}

#[tokio::test]
async fn test_cart_requires_sign_in() {
    let h = shop().start().await;
    assert_eq!(h.get("/cart").await.status, StatusCode::UNAUTHORIZED);
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_add_without_size_is_rejected() {
    let h = shop().on(Method::GET, "/Carts", json!([])).start().await;
    let res = h.send(Method::POST, "/cart", Some(json!({ "modelId": 1, "colorId": 1 })), true).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "SELECTION_INCOMPLETE");
    assert!(h.writes().is_empty());
}

#[tokio::test]
async fn test_add_sold_out_variant_is_rejected() {
    let h = shop().on(Method::GET, "/Carts", json!([])).start().await;
    let res = h.send(Method::POST, "/cart", Some(json!({ "modelId": 1, "colorId": 1, "sizeId": 41 })), true).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "OUT_OF_STOCK");
    assert!(h.writes().is_empty());
}

#[tokio::test]
async fn test_add_clamps_to_stock() {
    let h = shop()
        .on(Method::GET, "/Carts", json!([]))
        .on(Method::POST, "/Carts", cart_line(5, 101, 3, 3))
        .start()
        .await;
    let res = h.send(Method::POST, "/cart", Some(json!({ "modelId": 1, "colorId": 1, "sizeId": 40, "quantity": 9 })), true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(h.writes()[0].body, json!({ "productId": 101, "quantity": 3 }));
    assert_eq!(res.body["itemCount"], 3);
    assert_eq!(res.body["subtotal"], "2.700.000 ₫");
}

#[tokio::test]
async fn test_add_merges_with_existing_line() {
    let h = shop()
        .on(Method::GET, "/Carts", json!([cart_line(5, 101, 1, 3)]))
        .on(Method::POST, "/Carts", cart_line(5, 101, 2, 3))
        .start()
        .await;
    let res = h.send(Method::POST, "/cart", Some(json!({ "modelId": 1, "colorId": 1, "sizeId": 40 })), true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["lines"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["lines"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_quantity_update_is_clamped() {
    let h = FakeUpstream::new()
        .on(Method::GET, "/Carts", json!([cart_line(5, 101, 1, 3)]))
        .on(Method::PUT, "/Carts/5", json!(null))
        .start()
        .await;
    let res = h.send(Method::PUT, "/cart/5", Some(json!({ "quantity": 10 })), true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(h.writes()[0].body, json!({ "quantity": 3 }));
    assert_eq!(res.body["lines"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let h = FakeUpstream::new()
        .on(Method::GET, "/Carts", json!([cart_line(5, 101, 2, 3)]))
        .on(Method::DELETE, "/Carts/5", json!(null))
        .start()
        .await;
    let res = h.send(Method::PUT, "/cart/5", Some(json!({ "quantity": 0 })), true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(h.writes()[0].method, Method::DELETE);
    assert_eq!(res.body["lines"], json!([]));
    assert_eq!(res.body["subtotal"], "0 ₫");
}

#[tokio::test]
async fn test_remove_unknown_line() {
    let h = FakeUpstream::new().on(Method::GET, "/Carts", json!([])).start().await;
    let res = h.send(Method::DELETE, "/cart/8", None, true).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(h.writes().is_empty());
}

#[tokio::test]
async fn test_expired_session_passes_through() {
    let h = FakeUpstream::new().on_status(Method::GET, "/Carts", StatusCode::UNAUTHORIZED, json!({ "message": "expired" })).start().await;
    let res = h.get_auth("/cart").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

fn saved(id: i64, product_id: i64, stock: u32) -> serde_json::Value {
    json!({ "id": id, "product": product(product_id, color(1, "Red"), size(40, "40", 40), 900_000, stock) })
}

#[tokio::test]
async fn test_wishlist_add_is_idempotent() {
    let h = FakeUpstream::new().on(Method::GET, "/Wishlists", json!([saved(1, 101, 3)])).start().await;
    let res = h.send(Method::POST, "/wishlist", Some(json!({ "productId": 101 })), true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().unwrap().len(), 1);
    assert!(h.writes().is_empty());
}

#[tokio::test]
async fn test_move_to_cart() {
    let h = FakeUpstream::new()
        .on(Method::GET, "/Wishlists", json!([saved(1, 101, 3)]))
        .on(Method::POST, "/Carts", cart_line(5, 101, 1, 3))
        .on(Method::DELETE, "/Wishlists/1", json!(null))
        .start()
        .await;
    let res = h.send(Method::POST, "/wishlist/1/move-to-cart", None, true).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
    let writes = h.writes();
    assert_eq!(writes[0].body, json!({ "productId": 101, "quantity": 1 }));
    assert_eq!(writes[1].path, "/Wishlists/1");
}

#[tokio::test]
async fn test_move_sold_out_item_is_rejected() {
    let h = FakeUpstream::new().on(Method::GET, "/Wishlists", json!([saved(1, 101, 0)])).start().await;
    let res = h.send(Method::POST, "/wishlist/1/move-to-cart", None, true).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(h.writes().is_empty());
}

#[tokio::test]
async fn test_move_to_cart_reports_failed_wishlist_removal() {
    let h = FakeUpstream::new()
        .on(Method::GET, "/Wishlists", json!([saved(1, 101, 3)]))
        .on(Method::POST, "/Carts", cart_line(5, 101, 1, 3))
        .on_status(Method::DELETE, "/Wishlists/1", StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "boom" }))
        .start()
        .await;
    let res = h.send(Method::POST, "/wishlist/1/move-to-cart", None, true).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    let paths: Vec<String> = h.writes().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, ["/Carts", "/Wishlists/1"]);
}
