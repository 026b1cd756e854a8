//! Models, variants, images and catalog attributes.

use reqwest::Method;

use super::{ApiClient, ApiError, Session, NO_QUERY};
use crate::domain::aggregates::{CatalogAttribute, CatalogQuery, Image, ImageForm, Model, ModelForm, Product, ProductForm};
use crate::domain::value_objects::Paged;
use crate::Id;

impl ApiClient {
    /// `GET /Models` filtered and paged.
    pub async fn list_models(&self, query: &CatalogQuery) -> Result<Paged<Model>, ApiError> {
        self.get_json("/Models", &query.to_params(), None).await
    }

    pub async fn get_model(&self, id: Id) -> Result<Model, ApiError> {
        self.get_json(&format!("/Models/{id}"), NO_QUERY, None).await
    }

    /// Variants of one model.
    pub async fn list_products(&self, model_id: Id) -> Result<Vec<Product>, ApiError> {
        self.get_json("/Products", &[("modelId", model_id)], None).await
    }

    pub async fn list_attributes<A: CatalogAttribute>(&self) -> Result<Vec<A>, ApiError> {
        self.get_json(A::PATH, NO_QUERY, None).await
    }
}

impl Session<'_> {
    pub async fn create_model(&self, form: &ModelForm) -> Result<Model, ApiError> {
        self.api.send_json(Method::POST, "/Models", form, Some(self.token)).await
    }

    pub async fn update_model(&self, id: Id, form: &ModelForm) -> Result<Model, ApiError> {
        self.api.send_json(Method::PUT, &format!("/Models/{id}"), form, Some(self.token)).await
    }

    pub async fn delete_model(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Models/{id}"), Some(self.token)).await
    }

    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        self.api.send_json(Method::POST, "/Products", form, Some(self.token)).await
    }

    pub async fn update_product(&self, id: Id, form: &ProductForm) -> Result<Product, ApiError> {
        self.api.send_json(Method::PUT, &format!("/Products/{id}"), form, Some(self.token)).await
    }

    pub async fn delete_product(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Products/{id}"), Some(self.token)).await
    }

    pub async fn add_image(&self, form: &ImageForm) -> Result<Image, ApiError> {
        self.api.send_json(Method::POST, "/Images", form, Some(self.token)).await
    }

    pub async fn delete_image(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Images/{id}"), Some(self.token)).await
    }

    pub async fn create_attribute<A: CatalogAttribute>(&self, attribute: &A) -> Result<A, ApiError> {
        self.api.send_json(Method::POST, A::PATH, attribute, Some(self.token)).await
    }

    pub async fn update_attribute<A: CatalogAttribute>(&self, id: Id, attribute: &A) -> Result<A, ApiError> {
        self.api.send_json(Method::PUT, &format!("{}/{id}", A::PATH), attribute, Some(self.token)).await
    }

    pub async fn delete_attribute<A: CatalogAttribute>(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("{}/{id}", A::PATH), Some(self.token)).await
    }
}
