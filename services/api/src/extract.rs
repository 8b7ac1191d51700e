//! Request extractors that report failures as `ApiError`

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

const INVALID_BODY: &str = "Invalid request body";

/// JSON body whose failures render as `400 { message }`
///
/// A missing or blank body reads as `{}`, so absent fields surface through
/// the request's own validation. Parser details are logged, never returned.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            warn!("Unreadable request body: {}", rejection.body_text());
            ApiError::BadRequest(INVALID_BODY.to_string())
        })?;

        decode(&bytes).map(Self)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    serde_json::from_slice(raw).map_err(|err| {
        warn!("Rejected request body: {}", err);
        ApiError::BadRequest(INVALID_BODY.to_string())
    })
}

/// Parse an id taken from the request path
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid ID".to_string()))
}
