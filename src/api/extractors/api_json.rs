//! JSON extractor with rejection mapping.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::{AppError, FieldErrors};

/// JSON extractor whose rejections surface as the API's validation error
/// shape instead of axum's plain-text default.
///
/// A document that fails to parse at all has no per-field structure to
/// report, so the parser message lands under a single `body` entry.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            let mut fields = FieldErrors::new();
            fields.insert("body", e.body_text());
            AppError::validation(fields)
        })?;

        Ok(ApiJson(value))
    }
}
