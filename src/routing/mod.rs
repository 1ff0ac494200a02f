//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → matcher.rs (classify path: Collection | Item(id) | NoMatch)
//!     → router.rs (shape × verb table lookup)
//!     → Return: Invocation, MethodNotAllowed or NotFound
//!
//! Table Construction (at startup):
//!     CONTACT_ROUTES
//!     → Reject duplicate (shape, verb) pairs
//!     → Freeze as immutable DispatchTable
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (prefix strip only)
//! - Deterministic: same input always resolves the same way
//! - Unknown verb on a known path is a 405, never a 404

pub mod matcher;
pub mod router;

pub use matcher::{PathMatcher, PathShape, RouteMatch, CONTACTS_ROOT};
pub use router::{
    DispatchTable, Invocation, MethodNotAllowed, Operation, Resolution, Route, RouteConflict,
    Router,
};
