//! Reviews and comments.

use reqwest::Method;

use super::{ApiClient, ApiError, Session};
use crate::domain::aggregates::{Comment, NewComment, NewReview, Review};
use crate::domain::value_objects::{PageRequest, Paged};
use crate::Id;

fn page_params(model_id: Id, page: PageRequest) -> [(&'static str, String); 3] {
    [("modelId", model_id.to_string()), ("page", page.page().to_string()), ("pageSize", page.page_size().to_string())]
}

impl ApiClient {
    pub async fn reviews(&self, model_id: Id, page: PageRequest) -> Result<Paged<Review>, ApiError> {
        self.get_json("/Reviews", &page_params(model_id, page), None).await
    }

    /// Top-level comments for one page; replies come nested or flat depending on the server.
    pub async fn comments(&self, model_id: Id, page: PageRequest) -> Result<Paged<Comment>, ApiError> {
        self.get_json("/Comments", &page_params(model_id, page), None).await
    }
}

impl Session<'_> {
    pub async fn post_review(&self, review: &NewReview) -> Result<Review, ApiError> {
        self.api.send_json(Method::POST, "/Reviews", review, Some(self.token)).await
    }

    pub async fn delete_review(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Reviews/{id}"), Some(self.token)).await
    }

    pub async fn post_comment(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        self.api.send_json(Method::POST, "/Comments", comment, Some(self.token)).await
    }

    pub async fn delete_comment(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/Comments/{id}"), Some(self.token)).await
    }
}
