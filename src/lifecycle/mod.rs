//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast to subscribers
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT or broadcast → stop accepting → drain in-flight requests
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, then persist the store

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
