//! Request identification and body decoding.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) unless the client sent one
//! - Echo the request ID on the response
//! - Decode form bodies into a `ContactPayload`
//! - Decode query strings into `FilterCriteria`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Both `multipart/form-data` and `application/x-www-form-urlencoded` are accepted
//! - Any other content type is a client error naming the body

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query},
    http::{header, HeaderName, Request, StatusCode},
    Form,
};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

use crate::contacts::{ContactPayload, FilterCriteria, ValidationError};
use crate::error::ApiError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning a UUID request ID to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Access to the request ID assigned by [`set_request_id_layer`].
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<RequestId>()
            .map(RequestId::header_value)
            .or_else(|| self.headers().get(&X_REQUEST_ID))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Decode the query string of a listing request.
pub fn read_filter(request: &Request<Body>) -> Result<FilterCriteria, ApiError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .map_err(|e| ValidationError::new("query", e.body_text()))?;
    Ok(FilterCriteria::from_query_pairs(pairs)?)
}

/// Decode a form body into a payload.
pub async fn read_payload(request: Request<Body>) -> Result<ContactPayload, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let fields = if content_type.starts_with("multipart/form-data") {
        read_multipart(request).await?
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|e| body_error("body", e.status(), e.body_text()))?;
        fields
    } else {
        return Err(ValidationError::new(
            "body",
            "expected multipart/form-data or application/x-www-form-urlencoded",
        )
        .into());
    };

    Ok(ContactPayload::from_fields(fields)?)
}

async fn read_multipart(request: Request<Body>) -> Result<Vec<(String, String)>, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| body_error("body", e.status(), e.body_text()))?;

    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_error("body", e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            tracing::debug!(field = %name, "Skipping file upload field");
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| body_error(name.clone(), e.status(), e.body_text()))?;
        fields.push((name, value));
    }
    Ok(fields)
}

/// A body rejection. Running past the body limit is a 413, anything else
/// is a malformed body.
fn body_error(field: impl Into<String>, status: StatusCode, text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ValidationError::new(field, text).into()
    }
}
