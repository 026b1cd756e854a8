//! Catalog browsing, product detail, reviews and comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::extract::{Bearer, ValidatedJson, ValidatedQuery};
use super::{AppResult, AppState};
use crate::domain::aggregates::{
    Brand, CatalogQuery, Color, CommentForm, CommentThread, Model, ProductSelection, RatingSummary, Review, ReviewForm,
    SelectionView, Size,
};
use crate::domain::events::{self, FeedbackEvent, StoreEvent};
use crate::domain::value_objects::{PageRequest, Paged};
use crate::{ApiClient, Id, StorefrontError};

const PAGE_LINKS: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    pub id: Id,
    pub name: String,
    pub brand: Option<String>,
    pub price: String,
    pub thumbnail: Option<String>,
}

impl From<&Model> for ModelCard {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            brand: m.brand.as_ref().map(|b| b.name.clone()),
            price: m.price_label(),
            thumbnail: m.thumbnail().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Facets { pub brands: Vec<Brand>, pub colors: Vec<Color>, pub sizes: Vec<Size> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub models: Paged<ModelCard>,
    pub pages: Vec<u32>,
    pub facets: Facets,
    pub filter: CatalogQuery,
}

pub async fn catalog_page(State(s): State<AppState>, ValidatedQuery(filter): ValidatedQuery<CatalogQuery>) -> AppResult<Json<CatalogPage>> {
    let (models, brands, colors, mut sizes) = tokio::try_join!(
        s.api.list_models(&filter),
        s.api.list_attributes::<Brand>(),
        s.api.list_attributes::<Color>(),
        s.api.list_attributes::<Size>(),
    )?;
    sizes.sort_by_key(|z| z.sort_order);
    let models = models.map(|m| ModelCard::from(&m));
    let pages = models.page_window(PAGE_LINKS);
    Ok(Json(CatalogPage { models, pages, facets: Facets { brands, colors, sizes }, filter }))
}

/// Model with its variants. Some servers embed the variants in `GET /Models/{id}`,
/// others only serve them from `/Products`, so both are fetched.
pub(crate) async fn load_model(api: &ApiClient, id: Id) -> AppResult<Model> {
    let (mut model, products) = tokio::try_join!(api.get_model(id), api.list_products(id))?;
    if !products.is_empty() { model.products = products; }
    Ok(model)
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams { pub color: Option<Id>, pub size: Option<Id>, pub quantity: Option<u32> }

/// Replays the shopper's picks onto a fresh selection.
pub(crate) fn select(model: Model, color: Option<Id>, size: Option<Id>, quantity: Option<u32>) -> AppResult<ProductSelection> {
    let mut selection = ProductSelection::new(model);
    if let Some(color) = color { selection.select_color(color)?; }
    if let Some(size) = size { selection.select_size(size)?; }
    if let Some(quantity) = quantity { selection.set_quantity(quantity); }
    Ok(selection)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelHeader { pub id: Id, pub name: String, pub description: Option<String>, pub brand: Option<String>, pub supplier: Option<String> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailPage {
    pub model: ModelHeader,
    pub selection: SelectionView,
    pub reviews: Paged<Review>,
    pub rating: RatingSummary,
}

pub async fn product_detail(State(s): State<AppState>, Path(id): Path<Id>, Query(params): Query<SelectionParams>) -> AppResult<Json<ProductDetailPage>> {
    let (model, reviews) = tokio::try_join!(load_model(&s.api, id), async { s.api.reviews(id, PageRequest::default()).await.map_err(StorefrontError::from) })?;
    let selection = select(model, params.color, params.size, params.quantity)?;
    let m = selection.model();
    let header = ModelHeader {
        id: m.id,
        name: m.name.clone(),
        description: m.description.clone(),
        brand: m.brand.as_ref().map(|b| b.name.clone()),
        supplier: m.supplier.as_ref().map(|x| x.name.clone()),
    };
    let rating = RatingSummary::from_reviews(&reviews.items);
    Ok(Json(ProductDetailPage { model: header, selection: selection.view(), reviews, rating }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams { pub page: Option<u32>, pub page_size: Option<u32> }

impl PageParams {
    pub fn request(&self) -> PageRequest { PageRequest::new(self.page, self.page_size) }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPage { pub reviews: Paged<Review>, pub pages: Vec<u32>, pub rating: RatingSummary }

pub async fn list_reviews(State(s): State<AppState>, Path(id): Path<Id>, Query(p): Query<PageParams>) -> AppResult<Json<ReviewsPage>> {
    let reviews = s.api.reviews(id, p.request()).await?;
    let rating = RatingSummary::from_reviews(&reviews.items);
    let pages = reviews.page_window(PAGE_LINKS);
    Ok(Json(ReviewsPage { reviews, pages, rating }))
}

pub async fn post_review(
    State(s): State<AppState>,
    auth: Bearer,
    Path(id): Path<Id>,
    ValidatedJson(form): ValidatedJson<ReviewForm>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let review = form.into_new(id).ok_or_else(|| StorefrontError::Validation("rating: must be between 1 and 5".into()))?;
    let posted = auth.session(&s.api).post_review(&review).await?;
    StoreEvent::Feedback(FeedbackEvent::ReviewPosted { model_id: id, rating: posted.rating.value() }).log();
    Ok((StatusCode::CREATED, Json(posted)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    pub thread: CommentThread,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
    pub pages: Vec<u32>,
}

impl CommentsPage {
    fn new<T>(thread: CommentThread, paged: &Paged<T>) -> Self {
        Self { total: thread.total(), page: paged.page, total_pages: paged.total_pages(), pages: paged.page_window(PAGE_LINKS), thread }
    }
}

pub async fn list_comments(State(s): State<AppState>, Path(id): Path<Id>, Query(p): Query<PageParams>) -> AppResult<Json<CommentsPage>> {
    let mut paged = s.api.comments(id, p.request()).await?;
    let thread = CommentThread::from_comments(std::mem::take(&mut paged.items));
    Ok(Json(CommentsPage::new(thread, &paged)))
}

/// Posts a comment or reply and returns the refreshed first page. A reply the
/// refetch does not show yet is attached locally so the poster sees it.
pub async fn post_comment(
    State(s): State<AppState>,
    auth: Bearer,
    Path(id): Path<Id>,
    ValidatedJson(form): ValidatedJson<CommentForm>,
) -> AppResult<(StatusCode, Json<CommentsPage>)> {
    let posted = auth.session(&s.api).post_comment(&form.into_new(id)).await?;
    let mut paged = s.api.comments(id, PageRequest::default()).await?;
    let mut thread = CommentThread::from_comments(std::mem::take(&mut paged.items));
    let listed = thread.roots().iter().any(|r| r.id == posted.id || r.replies.iter().any(|c| c.id == posted.id));
    if listed {
        StoreEvent::Feedback(FeedbackEvent::CommentPosted { model_id: id, comment_id: posted.id, parent_id: posted.parent_id }).log();
    } else if let Err(e) = thread.attach(posted) {
        tracing::warn!(error = %e, "posted reply has no parent on the first page");
    }
    events::log_all(thread.take_events());
    Ok((StatusCode::CREATED, Json(CommentsPage::new(thread, &paged))))
}
