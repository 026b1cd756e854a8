//! Catalog records and the product detail selection state

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::domain::value_objects::{message, not_blank, validate_phone, Money, PageRequest, Quantity};
use crate::Id;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(default)] pub id: Id,
    #[validate(length(min = 1, max = 100), custom = "not_blank")]
    pub name: String,
    #[serde(default)] #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    #[serde(default)] pub id: Id,
    #[validate(length(min = 1, max = 50), custom = "not_blank")]
    pub name: String,
    #[serde(default)] #[validate(custom = "validate_hex")]
    pub hex_code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    #[serde(default)] pub id: Id,
    #[validate(length(min = 1, max = 20), custom = "not_blank")]
    pub name: String,
    #[serde(default)] pub sort_order: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default)] pub id: Id,
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: String,
    #[serde(default)] #[validate(email)]
    pub email: Option<String>,
    #[serde(default)] #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[serde(default)] pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Id,
    #[serde(default)] pub model_id: Option<Id>,
    #[serde(default)] pub color_id: Option<Id>,
    pub url: String,
}

/// A sellable color/size variant of a [`Model`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub model_id: Id,
    #[serde(default)] pub model_name: Option<String>,
    pub color: Color,
    pub size: Size,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl Product {
    pub fn price(&self) -> Money { Money::vnd(self.price) }
    pub fn in_stock(&self) -> bool { self.quantity > 0 }
}

/// A product line aggregating its variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Id,
    pub name: String,
    #[serde(default)] pub description: Option<String>,
    #[serde(default)] pub brand: Option<Brand>,
    #[serde(default)] pub supplier: Option<Supplier>,
    #[serde(default)] pub products: Vec<Product>,
    #[serde(default)] pub images: Vec<Image>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_price: Option<Decimal>,
    #[serde(default)] pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Lowest and highest variant price, falling back to the listed minimum.
    pub fn price_range(&self) -> Option<(Money, Money)> {
        let min = self.products.iter().map(|p| p.price).min();
        let max = self.products.iter().map(|p| p.price).max();
        match (min, max) {
            (Some(lo), Some(hi)) => Some((Money::vnd(lo), Money::vnd(hi))),
            _ => self.min_price.map(|p| (Money::vnd(p), Money::vnd(p))),
        }
    }

    pub fn price_label(&self) -> String {
        match self.price_range() {
            Some((lo, hi)) if lo == hi => lo.format(),
            Some((lo, hi)) => format!("{} - {}", lo.format(), hi.format()),
            None => "Contact us".to_string(),
        }
    }

    pub fn thumbnail(&self) -> Option<&str> { self.images.first().map(|i| i.url.as_str()) }
}

/// Back-office form for creating or editing a [`Model`].
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModelForm {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub name: String,
    #[serde(default)] #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub brand_id: Id,
    #[serde(default)] pub supplier_id: Option<Id>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub model_id: Id,
    pub color_id: Id,
    pub size_id: Id,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "positive_price")]
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageForm {
    pub model_id: Id,
    #[serde(default)] pub color_id: Option<Id>,
    #[validate(url)]
    pub url: String,
}

fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_positive() && !price.is_zero() { Ok(()) } else { Err(message("price", "must be greater than zero")) }
}

fn validate_hex(value: &str) -> Result<(), ValidationError> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) { Ok(()) }
    else { Err(message("hex", "must be a hex color like #1a2b3c")) }
}

/// Attribute collections the back office edits with the same list/create/update/delete flow.
pub trait CatalogAttribute: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// Remote collection path, e.g. `/Brands`.
    const PATH: &'static str;
    const LABEL: &'static str;
    fn id(&self) -> Id;
}

macro_rules! catalog_attribute {
    ($ty:ty, $path:literal, $label:literal) => {
        impl CatalogAttribute for $ty {
            const PATH: &'static str = $path;
            const LABEL: &'static str = $label;
            fn id(&self) -> Id { self.id }
        }
    };
}

catalog_attribute!(Brand, "/Brands", "Brand");
catalog_attribute!(Color, "/Colors", "Color");
catalog_attribute!(Size, "/Sizes", "Size");
catalog_attribute!(Supplier, "/Suppliers", "Supplier");

// =============================================================================
// Catalog browsing
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Newest => "newest", Self::PriceAsc => "price_asc", Self::PriceDesc => "price_desc", Self::NameAsc => "name_asc" }
    }
}

/// Catalog filter as it arrives from the browser query string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_price_range"))]
pub struct CatalogQuery {
    pub brand_id: Option<Id>,
    pub color_id: Option<Id>,
    pub size_id: Option<Id>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn validate_price_range(q: &CatalogQuery) -> Result<(), ValidationError> {
    match (q.min_price, q.max_price) {
        (Some(lo), Some(hi)) if lo > hi => Err(message("price_range", "minimum price is above maximum price")),
        _ => Ok(()),
    }
}

impl CatalogQuery {
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Query pairs for `GET /Models`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let page = self.page_request();
        let mut params = vec![
            ("page", page.page().to_string()),
            ("pageSize", page.page_size().to_string()),
            ("sort", self.sort.unwrap_or_default().as_str().to_string()),
        ];
        if let Some(v) = self.brand_id { params.push(("brandId", v.to_string())); }
        if let Some(v) = self.color_id { params.push(("colorId", v.to_string())); }
        if let Some(v) = self.size_id { params.push(("sizeId", v.to_string())); }
        if let Some(v) = self.min_price { params.push(("minPrice", v.to_string())); }
        if let Some(v) = self.max_price { params.push(("maxPrice", v.to_string())); }
        if let Some(v) = self.search_text() { params.push(("search", v.to_string())); }
        params
    }
}

// =============================================================================
// Product detail selection
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Color {0} is not offered for this product")]
    UnknownColor(Id),
    #[error("Choose a color before choosing a size")]
    NoColorSelected,
    #[error("Size {0} is not available in the selected color")]
    SizeUnavailable(Id),
    #[error("Choose a color and size first")]
    Incomplete,
    #[error("Out of stock")]
    OutOfStock,
}

/// Line the detail page asks the cart to add.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLine { pub product_id: Id, pub quantity: u32 }

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption { pub id: Id, pub name: String, pub hex_code: Option<String>, pub selected: bool }

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOption { pub id: Id, pub name: String, pub in_stock: bool, pub selected: bool }

/// Serializable snapshot of a [`ProductSelection`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub colors: Vec<ColorOption>,
    pub sizes: Vec<SizeOption>,
    pub selected_product_id: Option<Id>,
    pub price_label: String,
    pub stock: Option<u32>,
    pub quantity: u32,
    pub images: Vec<String>,
    pub can_add_to_cart: bool,
}

#[derive(Clone, Debug)]
pub struct ProductSelection {
    model: Model,
    color_id: Option<Id>,
    size_id: Option<Id>,
    quantity: Quantity,
}

impl ProductSelection {
    pub fn new(model: Model) -> Self { Self { model, color_id: None, size_id: None, quantity: Quantity::new(1) } }

    pub fn model(&self) -> &Model { &self.model }
    pub fn color_id(&self) -> Option<Id> { self.color_id }
    pub fn size_id(&self) -> Option<Id> { self.size_id }
    pub fn quantity(&self) -> u32 { self.quantity.value() }

    /// Distinct colors in order of first appearance.
    pub fn colors(&self) -> Vec<&Color> {
        let mut seen = Vec::new();
        for p in &self.model.products {
            if !seen.iter().any(|c: &&Color| c.id == p.color.id) { seen.push(&p.color); }
        }
        seen
    }

    fn variants_of(&self, color_id: Id) -> impl Iterator<Item = &Product> {
        self.model.products.iter().filter(move |p| p.color.id == color_id)
    }

    /// Sizes offered in the selected color; empty until a color is chosen.
    pub fn size_options(&self) -> Vec<SizeOption> {
        let Some(color_id) = self.color_id else { return vec![] };
        let mut variants: Vec<&Product> = self.variants_of(color_id).collect();
        variants.sort_by(|a, b| a.size.sort_order.cmp(&b.size.sort_order).then_with(|| a.size.name.cmp(&b.size.name)));
        variants.dedup_by_key(|p| p.size.id);
        variants.into_iter().map(|p| SizeOption {
            id: p.size.id, name: p.size.name.clone(), in_stock: p.in_stock(), selected: self.size_id == Some(p.size.id),
        }).collect()
    }

    pub fn select_color(&mut self, color_id: Id) -> Result<(), SelectionError> {
        if self.variants_of(color_id).next().is_none() { return Err(SelectionError::UnknownColor(color_id)); }
        self.color_id = Some(color_id);
        if let Some(size_id) = self.size_id {
            if !self.variants_of(color_id).any(|p| p.size.id == size_id) { self.size_id = None; }
        }
        self.reclamp();
        Ok(())
    }

    pub fn select_size(&mut self, size_id: Id) -> Result<(), SelectionError> {
        let color_id = self.color_id.ok_or(SelectionError::NoColorSelected)?;
        if !self.variants_of(color_id).any(|p| p.size.id == size_id) { return Err(SelectionError::SizeUnavailable(size_id)); }
        self.size_id = Some(size_id);
        self.reclamp();
        Ok(())
    }

    pub fn selected_product(&self) -> Option<&Product> {
        let (color_id, size_id) = (self.color_id?, self.size_id?);
        self.model.products.iter().find(|p| p.color.id == color_id && p.size.id == size_id)
    }

    pub fn price_label(&self) -> String {
        match self.selected_product() {
            Some(p) => p.price().format(),
            None => self.model.price_label(),
        }
    }

    /// Images of the selected color, or the model's untagged images when none are tagged for it.
    pub fn images(&self) -> Vec<&Image> {
        if let Some(color_id) = self.color_id {
            let tagged: Vec<&Image> = self.model.images.iter().filter(|i| i.color_id == Some(color_id)).collect();
            if !tagged.is_empty() { return tagged; }
        }
        let untagged: Vec<&Image> = self.model.images.iter().filter(|i| i.color_id.is_none()).collect();
        if untagged.is_empty() { self.model.images.iter().collect() } else { untagged }
    }

    /// Sets the requested quantity, clamped to the stock of the selected variant.
    pub fn set_quantity(&mut self, quantity: u32) -> u32 {
        self.quantity = Quantity::new(quantity);
        self.reclamp();
        self.quantity.value()
    }

    fn reclamp(&mut self) {
        self.quantity = match self.selected_product() {
            Some(p) => self.quantity.clamp_to(p.quantity),
            None => Quantity::new(self.quantity.value().max(1)),
        };
    }

    pub fn to_cart_line(&self) -> Result<AddCartLine, SelectionError> {
        let product = self.selected_product().ok_or(SelectionError::Incomplete)?;
        if !product.in_stock() { return Err(SelectionError::OutOfStock); }
        Ok(AddCartLine { product_id: product.id, quantity: self.quantity.value() })
    }

    pub fn view(&self) -> SelectionView {
        let selected = self.selected_product();
        SelectionView {
            colors: self.colors().into_iter().map(|c| ColorOption {
                id: c.id, name: c.name.clone(), hex_code: c.hex_code.clone(), selected: self.color_id == Some(c.id),
            }).collect(),
            sizes: self.size_options(),
            selected_product_id: selected.map(|p| p.id),
            price_label: self.price_label(),
            stock: selected.map(|p| p.quantity),
            quantity: self.quantity.value(),
            images: self.images().into_iter().map(|i| i.url.clone()).collect(),
            can_add_to_cart: selected.is_some_and(Product::in_stock),
        }
    }
}
