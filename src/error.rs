//! Request-level errors and their HTTP mapping.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::contacts::{StoreError, ValidationError};
use crate::http::response::{respond, Failure, PAYLOAD_TOO_LARGE_MESSAGE};
use crate::routing::MethodNotAllowed;

/// Everything that can end a request without a success envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The path exists but the verb is not registered for it.
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: Method, allowed: Vec<Method> },

    /// The path matches no resource.
    #[error("resource not found")]
    NotFound,

    /// The request body ran past the configured size limit.
    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    /// Malformed query parameter or request body.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The contact store reported a failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<MethodNotAllowed> for ApiError {
    fn from(err: MethodNotAllowed) -> Self {
        ApiError::MethodNotAllowed {
            method: err.method,
            allowed: err.allowed,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Server-side details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            ApiError::Validation(err) => err.to_string(),
            ApiError::Store(StoreError::NotFound(_)) => "Contact not found".to_string(),
            ApiError::Store(err) if err.is_client_error() => err.to_string(),
            ApiError::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let mut response = respond(status, Failure::new(status, self.client_message()));

        if let ApiError::MethodNotAllowed { allowed, .. } = &self {
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}
