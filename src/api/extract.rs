use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::ApiError;

/// Request binding failures. Always reported to the client as 4xx.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("Unsupported Media Type: expected application/json, got {0}")]
    UnsupportedMediaType(String),

    #[error("invalid request body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid request body: expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("request body too large: {0}")]
    TooLarge(String),

    #[error("invalid expense id: {0:?}")]
    InvalidId(String),
}

/// JSON body extractor that reports every failure as `{message}` with 400.
///
/// An empty body binds to `T::default()`; a non-empty one must carry a JSON
/// content type.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                BindError::TooLarge(rejection.body_text())
            } else {
                BindError::Body(rejection.body_text())
            }
        })?;

        Ok(JsonBody(decode_body(content_type.as_deref(), &bytes)?))
    }
}

/// Decode a request body the way `JsonBody` does
pub fn decode_body<T>(content_type: Option<&str>, bytes: &[u8]) -> Result<T, BindError>
where
    T: DeserializeOwned + Default,
{
    if bytes.is_empty() {
        return Ok(T::default());
    }

    match content_type {
        Some(ct) if is_json_content_type(ct) => {}
        Some(ct) => return Err(BindError::UnsupportedMediaType(ct.to_string())),
        None => return Err(BindError::UnsupportedMediaType("no content type".to_string())),
    }

    // Only a top-level object binds; duplicate keys keep the last value
    match serde_json::from_slice::<Value>(bytes)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(BindError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Integer expense id taken from the `:id` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ExpenseId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| BindError::InvalidId(rejection.body_text()))?;

        match raw.trim().parse::<i32>() {
            Ok(id) => Ok(ExpenseId(id)),
            Err(_) => Err(BindError::InvalidId(raw).into()),
        }
    }
}
