//! Contacts REST API Library

pub mod config;
pub mod contacts;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ApiConfig;
pub use contacts::{ContactStore, InMemoryContactStore};
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
