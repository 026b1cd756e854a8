mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

fn catalog_upstream() -> FakeUpstream {
    let mut model = runner_model();
    model["products"] = runner_products();
    FakeUpstream::new()
        .on(Method::GET, "/Models", json!({ "items": [model], "page": 2, "pageSize": 12, "totalCount": 40 }))
        .on(Method::GET, "/Brands", json!([{ "id": 1, "name": "Bitis" }]))
        .on(Method::GET, "/Colors", json!([color(1, "Red"), color(2, "Blue")]))
        .on(Method::GET, "/Sizes", json!([size(41, "41", 41), size(40, "40", 40)]))
}

fn detail_upstream() -> FakeUpstream {
    FakeUpstream::new()
        .on(Method::GET, "/Models/1", runner_model())
        .on(Method::GET, "/Products", runner_products())
        .on(Method::GET, "/Reviews", paged(json!([
            { "id": 1, "modelId": 1, "rating": 5, "content": "Great" },
            { "id": 2, "modelId": 1, "rating": 4, "content": "Good" }
        ]), 2))
}

#[tokio::test]
async fn test_catalog_page_forwards_filters() {
    let h = catalog_upstream().start().await;
    let res = h.get("/catalog?brandId=1&page=2&search=%20run%20&sort=price_asc").await;
    assert_eq!(res.status, StatusCode::OK);

    let card = &res.body["models"]["items"][0];
    assert_eq!(card["name"], "Runner");
    assert_eq!(card["brand"], "Bitis");
    assert_eq!(card["price"], "900.000 ₫ - 950.000 ₫");
    assert_eq!(card["thumbnail"], "http://img/red.jpg");
    assert_eq!(res.body["pages"], json!([1, 2, 3, 4]));
    assert_eq!(res.body["facets"]["sizes"][0]["name"], "40");

    let models = h.calls().into_iter().find(|c| c.path == "/Models").unwrap();
    let query = models.query.unwrap();
    assert!(query.contains("brandId=1"));
    assert!(query.contains("page=2"));
    assert!(query.contains("sort=price_asc"));
    assert!(query.contains("search=run"));
    assert!(models.auth.is_none());
}

#[tokio::test]
async fn test_catalog_rejects_inverted_price_range() {
    let h = catalog_upstream().start().await;
    let res = h.get("/catalog?minPrice=500000&maxPrice=100000").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_product_detail_replays_selection() {
    let h = detail_upstream().start().await;
    let res = h.get("/models/1?color=1&size=40&quantity=9").await;
    assert_eq!(res.status, StatusCode::OK);

    let selection = &res.body["selection"];
    assert_eq!(selection["selectedProductId"], 101);
    assert_eq!(selection["quantity"], 3);
    assert_eq!(selection["stock"], 3);
    assert_eq!(selection["canAddToCart"], true);
    assert_eq!(selection["images"], json!(["http://img/red.jpg"]));
    assert_eq!(selection["sizes"][1]["inStock"], false);
    assert_eq!(res.body["rating"]["count"], 2);
    assert_eq!(res.body["rating"]["average"], 4.5);
    assert_eq!(res.body["model"]["brand"], "Bitis");
}

#[tokio::test]
async fn test_product_detail_without_color_shows_price_range() {
    let h = detail_upstream().start().await;
    let res = h.get("/models/1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["selection"]["priceLabel"], "900.000 ₫ - 950.000 ₫");
    assert_eq!(res.body["selection"]["sizes"], json!([]));
    assert_eq!(res.body["selection"]["canAddToCart"], false);
}

#[tokio::test]
async fn test_product_detail_unknown_color() {
    let h = detail_upstream().start().await;
    let res = h.get("/models/1?color=9").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_model_is_not_found() {
    let h = FakeUpstream::new().on(Method::GET, "/Products", json!([])).on(Method::GET, "/Reviews", paged(json!([]), 0)).start().await;
    let res = h.get("/models/77").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_requires_sign_in() {
    let h = detail_upstream().start().await;
    let res = h.send(Method::POST, "/models/1/reviews", Some(json!({ "rating": 5, "content": "Nice" })), false).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_review_never_reaches_upstream() {
    let h = detail_upstream().start().await;
    for body in [json!({ "rating": 6, "content": "Nice" }), json!({ "rating": 3, "content": "   " })] {
        let res = h.send(Method::POST, "/models/1/reviews", Some(body), true).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn test_post_review_forwards_token() {
    let h = FakeUpstream::new()
        .on_status(Method::POST, "/Reviews", StatusCode::CREATED, json!({ "id": 9, "modelId": 1, "rating": 4, "content": "Comfy" }))
        .start()
        .await;
    let res = h.send(Method::POST, "/models/1/reviews", Some(json!({ "rating": 4, "content": "  Comfy " })), true).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let post = &h.writes()[0];
    assert_eq!(post.auth.as_deref(), Some("Bearer test-token"));
    assert_eq!(post.body, json!({ "modelId": 1, "rating": 4, "content": "Comfy" }));
}

#[tokio::test]
async fn test_comments_are_threaded() {
    let h = FakeUpstream::new()
        .on(Method::GET, "/Comments", paged(json!([
            { "id": 1, "modelId": 1, "content": "Old", "createdAt": "2024-05-01T10:00:00Z" },
            { "id": 2, "modelId": 1, "content": "New", "createdAt": "2024-05-02T10:00:00Z" },
            { "id": 3, "modelId": 1, "content": "Reply", "parentId": 1, "createdAt": "2024-05-03T10:00:00Z" }
        ]), 2))
        .start()
        .await;
    let res = h.get("/models/1/comments").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["total"], 3);
    let roots = &res.body["thread"]["roots"];
    assert_eq!(roots[0]["id"], 2);
    assert_eq!(roots[1]["replies"][0]["id"], 3);
}

fn comment(id: i64, parent: Option<i64>, day: u32, content: &str) -> serde_json::Value {
    json!({ "id": id, "modelId": 1, "content": content, "parentId": parent, "createdAt": format!("2024-05-{day:02}T10:00:00Z") })
}

#[tokio::test]
async fn test_posted_reply_missing_from_refetch_is_attached() {
    let h = FakeUpstream::new()
        .on_status(Method::POST, "/Comments", StatusCode::CREATED, comment(5, Some(1), 4, "Thanks"))
        .on(Method::GET, "/Comments", paged(json!([comment(1, None, 1, "Is it true to size?")]), 1))
        .start()
        .await;
    let res = h.send(Method::POST, "/models/1/comments", Some(json!({ "content": " Thanks ", "parentId": 1 })), true).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["thread"]["roots"][0]["replies"][0]["id"], 5);

    let post = &h.writes()[0];
    assert_eq!(post.auth.as_deref(), Some("Bearer test-token"));
    assert_eq!(post.body, json!({ "modelId": 1, "content": "Thanks", "parentId": 1 }));
}

#[tokio::test]
async fn test_posted_comment_already_listed_is_not_duplicated() {
    let h = FakeUpstream::new()
        .on_status(Method::POST, "/Comments", StatusCode::CREATED, comment(6, None, 5, "Love it"))
        .on(Method::GET, "/Comments", paged(json!([comment(6, None, 5, "Love it"), comment(1, None, 1, "Old")]), 2))
        .start()
        .await;
    let res = h.send(Method::POST, "/models/1/comments", Some(json!({ "content": "Love it" })), true).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["thread"]["roots"][0]["id"], 6);
}

#[tokio::test]
async fn test_blank_comment_never_reaches_upstream() {
    let h = FakeUpstream::new().start().await;
    let res = h.send(Method::POST, "/models/1/comments", Some(json!({ "content": "   " })), true).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let res = h.send(Method::POST, "/models/1/comments", Some(json!({ "content": "Hi" })), false).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(h.calls().is_empty());
}
