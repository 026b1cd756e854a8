//! Shared harness: a fake remote API on a random local port and a helper to
//! drive the storefront router in-process.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::Response;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::web::{self, AppState};
use storefront::{ApiClient, Config};

pub const TOKEN: &str = "test-token";
pub const FRONTEND: &str = "http://shop.test";
pub const PUBLIC: &str = "http://bff.test";

/// A request the fake upstream received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
    pub auth: Option<String>,
}

#[derive(Clone)]
struct Stub { method: Method, path: String, status: StatusCode, body: Value }

#[derive(Clone, Default)]
struct FakeState { stubs: Arc<Vec<Stub>>, calls: Arc<Mutex<Vec<Recorded>>> }

#[derive(Default)]
pub struct FakeUpstream { stubs: Vec<Stub> }

impl FakeUpstream {
    pub fn new() -> Self { Self::default() }

    pub fn on(self, method: Method, path: &str, body: Value) -> Self {
        self.on_status(method, path, StatusCode::OK, body)
    }

    pub fn on_status(mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Self {
        self.stubs.push(Stub { method, path: path.to_string(), status, body });
        self
    }

    /// Starts the fake API and a storefront router pointed at it.
    pub async fn start(self) -> Harness {
        let state = FakeState { stubs: Arc::new(self.stubs), calls: Arc::default() };
        let calls = state.calls.clone();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream = Router::new().fallback(respond).with_state(state);
        tokio::spawn(async move { axum::serve(listener, upstream).await.unwrap() });

        let config = Config {
            api_base_url: format!("http://{addr}/api"),
            public_url: PUBLIC.into(),
            frontend_url: FRONTEND.into(),
            request_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        let api = ApiClient::new(config.api_base_url.clone(), config.request_timeout).unwrap();
        Harness { app: web::router(AppState::new(api, config)), calls }
    }
}

async fn respond(State(state): State<FakeState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().trim_start_matches("/api").to_string();
    state.calls.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        auth: headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string),
    });
    let stub = state.stubs.iter().find(|s| s.method == method && s.path == path);
    let (status, body) = match stub {
        Some(s) => (s.status, s.body.clone()),
        None => (StatusCode::NOT_FOUND, json!({ "message": format!("no stub for {method} {path}") })),
    };
    axum::response::IntoResponse::into_response((status, Json(body)))
}

pub struct Harness { app: Router, calls: Arc<Mutex<Vec<Recorded>>> }

pub struct Reply { pub status: StatusCode, pub headers: HeaderMap, pub body: Value }

impl Harness {
    pub fn calls(&self) -> Vec<Recorded> { self.calls.lock().unwrap().clone() }

    /// Upstream calls other than plain reads.
    pub fn writes(&self) -> Vec<Recorded> { self.calls().into_iter().filter(|c| c.method != Method::GET).collect() }

    pub async fn get(&self, uri: &str) -> Reply { self.send(Method::GET, uri, None, false).await }
    pub async fn get_auth(&self, uri: &str) -> Reply { self.send(Method::GET, uri, None, true).await }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, auth: bool) -> Reply {
        let mut req = Request::builder().method(method).uri(uri);
        if auth { req = req.header(header::AUTHORIZATION, format!("Bearer {TOKEN}")); }
        let req = match body {
            Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(b.to_string())).unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Reply { status, headers, body }
    }
}

// ---- fixtures ----

pub fn color(id: i64, name: &str) -> Value { json!({ "id": id, "name": name, "hexCode": null }) }
pub fn size(id: i64, name: &str, order: i32) -> Value { json!({ "id": id, "name": name, "sortOrder": order }) }

pub fn product(id: i64, color: Value, size: Value, price: u64, quantity: u32) -> Value {
    json!({ "id": id, "modelId": 1, "modelName": "Runner", "color": color, "size": size, "price": price, "quantity": quantity })
}

/// Model 1: red in sizes 40 (3 left) and 41 (sold out), blue in size 40.
pub fn runner_products() -> Value {
    json!([
        product(101, color(1, "Red"), size(40, "40", 40), 900_000, 3),
        product(102, color(1, "Red"), size(41, "41", 41), 900_000, 0),
        product(103, color(2, "Blue"), size(40, "40", 40), 950_000, 5),
    ])
}

pub fn runner_model() -> Value {
    json!({
        "id": 1, "name": "Runner", "description": "Road shoe",
        "brand": { "id": 1, "name": "Bitis" },
        "images": [
            { "id": 1, "modelId": 1, "colorId": 1, "url": "http://img/red.jpg" },
            { "id": 2, "modelId": 1, "colorId": null, "url": "http://img/main.jpg" }
        ]
    })
}

pub fn paged(items: Value, total: u64) -> Value {
    json!({ "items": items, "page": 1, "pageSize": 12, "totalCount": total })
}

pub fn cart_line(id: i64, product_id: i64, quantity: u32, stock: u32) -> Value {
    json!({ "id": id, "quantity": quantity, "product": product(product_id, color(1, "Red"), size(40, "40", 40), 900_000, stock) })
}

pub fn invoice(id: i64, status: &str, method: &str) -> Value {
    json!({
        "id": id, "receiverName": "An", "phone": "0901234567", "address": "1 Le Loi",
        "status": status, "paymentMethod": method, "total": 1_800_000,
        "details": [{ "id": 1, "productId": 101, "quantity": 2, "unitPrice": 900_000 }]
    })
}
