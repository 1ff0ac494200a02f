//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the contacts entry handler
//! - Wire up middleware (tracing, limits, timeouts, request ID, headers)
//! - Give 413/408 responses from the limit and timeout layers the error envelope
//! - Bind server to listener and shut down gracefully
//! - Run match → dispatch → store → envelope for every request
//! - Observability (metrics, request IDs)

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::contacts::ContactStore;
use crate::error::ApiError;
use crate::http::request::{
    propagate_request_id_layer, read_filter, read_payload, set_request_id_layer, RequestIdExt,
};
use crate::http::response::{envelope_layer_errors, respond, Success};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;
use crate::routing::{Invocation, Resolution, Router as ContactRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ContactRouter>,
    pub store: Arc<dyn ContactStore>,
}

/// HTTP server for the contacts API.
pub struct HttpServer {
    router: Router,
    config: ApiConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by the given store.
    pub fn new(config: ApiConfig, store: Arc<dyn ContactStore>) -> Self {
        let state = AppState {
            router: Arc::new(ContactRouter::contacts()),
            store,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", any(contacts_handler))
            .route("/{*path}", any(contacts_handler))
            .with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ));
        }

        router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(map_response(envelope_layer_errors))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %req.request_id()
                )
            }))
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives, then drain.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Entry handler for every path.
/// Classifies the request, dispatches it, and maps the outcome to a response.
async fn contacts_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let resolution = state.router.resolve(&path, &method);
    let operation = match &resolution {
        Resolution::Invoke(invocation) => invocation.operation().name(),
        _ => "none",
    };

    tracing::debug!(
        request_id = %request.request_id(),
        method = %method,
        path = %path,
        operation,
        "Dispatching request"
    );

    let response = match resolution {
        Resolution::Invoke(invocation) => match invoke(&state, invocation, request).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        },
        Resolution::MethodNotAllowed(not_allowed) => {
            tracing::warn!(method = %method, path = %path, "Method not allowed");
            ApiError::from(not_allowed).into_response()
        }
        Resolution::NotFound => {
            tracing::warn!(path = %path, "No route matched");
            ApiError::NotFound.into_response()
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        operation,
        start_time,
    );
    response
}

/// Run one operation against the store. The store is awaited exactly once.
async fn invoke(
    state: &AppState,
    invocation: Invocation,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let store = &state.store;
    let response = match invocation {
        Invocation::List => {
            let criteria = read_filter(&request)?;
            let contacts = store.list(&criteria).await?;
            respond(StatusCode::OK, Success::contacts(contacts))
        }
        Invocation::Create => {
            let payload = read_payload(request).await?;
            payload.validate_for_create()?;
            let contact = store.create(payload).await?;
            tracing::info!(id = contact.id, "Contact created");
            respond(StatusCode::CREATED, Success::contacts(vec![contact]))
        }
        Invocation::DeleteAll => {
            store.delete_all().await?;
            tracing::info!("All contacts deleted");
            respond(StatusCode::OK, Success::empty())
        }
        Invocation::Get(id) => {
            let contact = store.get(&id).await?;
            respond(StatusCode::OK, Success::contacts(contact))
        }
        Invocation::Update(id) => {
            let payload = read_payload(request).await?;
            payload.validate_for_update()?;
            let contact = store.update(&id, payload).await?;
            respond(StatusCode::OK, Success::contacts(contact))
        }
        Invocation::Delete(id) => {
            store.delete(&id).await?;
            tracing::info!(id = %id, "Contact deleted");
            respond(StatusCode::OK, Success::empty())
        }
    };
    Ok(response)
}
