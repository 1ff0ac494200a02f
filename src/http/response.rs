//! Response envelopes.
//!
//! # Responsibilities
//! - Wrap contact data in the `{status, data: {contacts}}` success envelope
//! - Produce the `{status, message}` body for client and server errors
//!
//! # Design Decisions
//! - `status` is `success`, `fail` (client error) or `error` (server error)
//! - Deletes answer with `data: null`
//! - Errors raised by tower layers (body limit, timeout) get the same envelope

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";
pub const REQUEST_TIMEOUT_MESSAGE: &str = "Request timed out";

/// Payload carried under `data`.
#[derive(Debug, Serialize)]
pub struct ContactsData<T> {
    pub contacts: T,
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    pub data: Option<ContactsData<T>>,
}

impl<T: Serialize> Success<T> {
    pub fn contacts(contacts: T) -> Self {
        Self {
            status: "success",
            data: Some(ContactsData { contacts }),
        }
    }
}

impl Success<()> {
    /// Envelope for operations that return no data.
    pub fn empty() -> Self {
        Self {
            status: "success",
            data: None,
        }
    }
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub status: &'static str,
    pub message: String,
}

impl Failure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: if status.is_server_error() { "error" } else { "fail" },
            message: message.into(),
        }
    }
}

/// Serialize an envelope with the given status code.
pub fn respond<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

/// Rewrite non-JSON error responses into the `{status, message}` envelope.
///
/// Handler errors are already enveloped. This catches the plain-text 413
/// from the body-limit layer and the empty 408 from the timeout layer.
pub async fn envelope_layer_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        return response;
    }

    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => PAYLOAD_TOO_LARGE_MESSAGE,
        StatusCode::REQUEST_TIMEOUT => REQUEST_TIMEOUT_MESSAGE,
        _ => status.canonical_reason().unwrap_or("Request failed"),
    };
    tracing::debug!(status = %status, "Enveloping layer error");

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let mut enveloped = respond(status, Failure::new(status, message));
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE {
            enveloped.headers_mut().append(name.clone(), value.clone());
        }
    }
    enveloped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(Success::contacts(vec![1, 2])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "success", "data": {"contacts": [1, 2]}})
        );

        let body = serde_json::to_value(Success::empty()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "success", "data": null}));
    }

    #[test]
    fn test_failure_status_follows_code() {
        assert_eq!(Failure::new(StatusCode::NOT_FOUND, "x").status, "fail");
        assert_eq!(
            Failure::new(StatusCode::INTERNAL_SERVER_ERROR, "x").status,
            "error"
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_layer_errors_get_the_envelope() {
        let plain = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = envelope_layer_errors(plain).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "fail", "message": "Request body too large"})
        );

        let empty = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = envelope_layer_errors(empty).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "fail", "message": "Request timed out"})
        );
    }

    #[tokio::test]
    async fn test_enveloped_and_successful_responses_pass_through() {
        let ok = respond(StatusCode::OK, Success::empty());
        let response = envelope_layer_errors(ok).await;
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "success", "data": null})
        );

        let failure = respond(
            StatusCode::NOT_FOUND,
            Failure::new(StatusCode::NOT_FOUND, "Contact not found"),
        );
        let response = envelope_layer_errors(failure).await;
        assert_eq!(body_json(response).await["message"], "Contact not found");
    }
}
