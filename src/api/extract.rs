//! Request extractors whose rejections are `AppError`s

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `axum::extract::Path` answering bad values with the JSON error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// `axum::extract::Query` answering bad values with the JSON error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// JSON form submission.
///
/// A field that does not deserialize (say `"renewal_date": "2030-13-45"`)
/// is reported under that field name, like any other form error.
/// A body that is not a JSON object at all is a plain bad request.
pub struct FormJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let deserializer = &mut serde_json::Deserializer::from_slice(&body);
        serde_path_to_error::deserialize(deserializer)
            .map(FormJson)
            .map_err(malformed_field)
    }
}

fn malformed_field(err: serde_path_to_error::Error<serde_json::Error>) -> AppError {
    let field = err.path().to_string();
    let inner = err.into_inner();

    if field == "." || field.starts_with('[') || inner.is_syntax() || inner.is_eof() {
        return AppError::BadRequest(format!("Malformed form body: {}", inner));
    }

    tracing::debug!("Rejected form field {}: {}", field, inner);
    AppError::invalid_field(field, "Enter a valid value.")
}
