//! Back office: order processing, catalog upkeep and staff accounts.
//!
//! Every route requires a bearer token; the upstream decides whether the
//! caller's role may use it and its 403 is passed through.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;

use super::catalog::PageParams;
use super::checkout::change_status;
use super::extract::{Bearer, ValidatedJson, ValidatedQuery};
use super::{AppResult, AppState};
use crate::domain::aggregates::{
    Account, Actor, Brand, CatalogAttribute, CatalogQuery, Color, EmployeeForm, Image, ImageForm, InvoiceFilter, InvoiceView, Model,
    ModelForm, Product, ProductForm, Size, StatusUpdate, Supplier,
};
use crate::domain::value_objects::Paged;
use crate::{Id, StorefrontError};

const PAGE_LINKS: u32 = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/:id", get(invoice_detail))
        .route("/invoices/:id/status", put(update_invoice_status))
        .route("/models", get(list_models).post(create_model))
        .route("/models/:id", put(update_model).delete(delete_model))
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/images", post(add_image))
        .route("/images/:id", delete(delete_image))
        .route("/reviews/:id", delete(delete_review))
        .route("/comments/:id", delete(delete_comment))
        .route("/customers", get(list_customers))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", put(update_employee).delete(delete_employee))
        .nest("/brands", attribute_routes::<Brand>())
        .nest("/colors", attribute_routes::<Color>())
        .nest("/sizes", attribute_routes::<Size>())
        .nest("/suppliers", attribute_routes::<Supplier>())
}

/// Same CRUD surface for every catalog attribute collection.
fn attribute_routes<A: CatalogAttribute>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attributes::<A>).post(create_attribute::<A>))
        .route("/:id", put(update_attribute::<A>).delete(delete_attribute::<A>))
}

// ---- invoices ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicesPage { pub invoices: Paged<InvoiceView>, pub pages: Vec<u32> }

async fn list_invoices(State(s): State<AppState>, auth: Bearer, Query(filter): Query<InvoiceFilter>) -> AppResult<Json<InvoicesPage>> {
    let invoices = auth.session(&s.api).invoices(&filter).await?.map(|i| i.view(Actor::Staff));
    let pages = invoices.page_window(PAGE_LINKS);
    Ok(Json(InvoicesPage { invoices, pages }))
}

async fn invoice_detail(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<Json<InvoiceView>> {
    let invoice = auth.session(&s.api).invoice(id).await?;
    Ok(Json(invoice.view(Actor::Staff)))
}

async fn update_invoice_status(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, Json(update): Json<StatusUpdate>) -> AppResult<Json<InvoiceView>> {
    change_status(auth.session(&s.api), id, update.status, Actor::Staff).await.map(Json)
}

// ---- models, variants and images ----

async fn list_models(State(s): State<AppState>, _auth: Bearer, ValidatedQuery(query): ValidatedQuery<CatalogQuery>) -> AppResult<Json<Paged<Model>>> {
    Ok(Json(s.api.list_models(&query).await?))
}

async fn create_model(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<ModelForm>) -> AppResult<(StatusCode, Json<Model>)> {
    let model = auth.session(&s.api).create_model(&form).await?;
    tracing::info!(model_id = model.id, name = %model.name, "model created");
    Ok((StatusCode::CREATED, Json(model)))
}

async fn update_model(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, ValidatedJson(form): ValidatedJson<ModelForm>) -> AppResult<Json<Model>> {
    Ok(Json(auth.session(&s.api).update_model(id, &form).await?))
}

async fn delete_model(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_model(id).await?;
    tracing::info!(model_id = id, "model deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn create_product(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<ProductForm>) -> AppResult<(StatusCode, Json<Product>)> {
    let product = auth.session(&s.api).create_product(&form).await?;
    tracing::info!(product_id = product.id, model_id = product.model_id, "variant created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, ValidatedJson(form): ValidatedJson<ProductForm>) -> AppResult<Json<Product>> {
    Ok(Json(auth.session(&s.api).update_product(id, &form).await?))
}

async fn delete_product(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_image(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<ImageForm>) -> AppResult<(StatusCode, Json<Image>)> {
    Ok((StatusCode::CREATED, Json(auth.session(&s.api).add_image(&form).await?)))
}

async fn delete_image(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- moderation ----

async fn delete_review(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_review(id).await?;
    tracing::info!(review_id = id, "review removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_comment(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_comment(id).await?;
    tracing::info!(comment_id = id, "comment removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---- catalog attributes ----

async fn list_attributes<A: CatalogAttribute>(State(s): State<AppState>, _auth: Bearer) -> AppResult<Json<Vec<A>>> {
    Ok(Json(s.api.list_attributes::<A>().await?))
}

async fn create_attribute<A: CatalogAttribute>(State(s): State<AppState>, auth: Bearer, ValidatedJson(attribute): ValidatedJson<A>) -> AppResult<(StatusCode, Json<A>)> {
    let created = auth.session(&s.api).create_attribute(&attribute).await?;
    tracing::info!(kind = A::LABEL, id = created.id(), "attribute created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_attribute<A: CatalogAttribute>(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, ValidatedJson(attribute): ValidatedJson<A>) -> AppResult<Json<A>> {
    Ok(Json(auth.session(&s.api).update_attribute(id, &attribute).await?))
}

async fn delete_attribute<A: CatalogAttribute>(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_attribute::<A>(id).await?;
    tracing::info!(kind = A::LABEL, id, "attribute deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---- accounts ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersPage { pub customers: Paged<Account>, pub pages: Vec<u32> }

async fn list_customers(State(s): State<AppState>, auth: Bearer, Query(p): Query<PageParams>) -> AppResult<Json<CustomersPage>> {
    let customers = auth.session(&s.api).customers(p.request()).await?;
    let pages = customers.page_window(PAGE_LINKS);
    Ok(Json(CustomersPage { customers, pages }))
}

async fn list_employees(State(s): State<AppState>, auth: Bearer) -> AppResult<Json<Vec<Account>>> {
    Ok(Json(auth.session(&s.api).employees().await?))
}

async fn create_employee(State(s): State<AppState>, auth: Bearer, ValidatedJson(form): ValidatedJson<EmployeeForm>) -> AppResult<(StatusCode, Json<Account>)> {
    if form.password.is_none() {
        return Err(StorefrontError::Validation("password: is required".into()));
    }
    let account = auth.session(&s.api).create_employee(&form).await?;
    tracing::info!(account_id = account.id, role = ?account.role, "employee created");
    Ok((StatusCode::CREATED, Json(account)))
}

async fn update_employee(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>, ValidatedJson(form): ValidatedJson<EmployeeForm>) -> AppResult<Json<Account>> {
    Ok(Json(auth.session(&s.api).update_employee(id, &form).await?))
}

async fn delete_employee(State(s): State<AppState>, auth: Bearer, Path(id): Path<Id>) -> AppResult<StatusCode> {
    auth.session(&s.api).delete_employee(id).await?;
    tracing::info!(account_id = id, "employee removed");
    Ok(StatusCode::NO_CONTENT)
}
