//! Contacts domain.
//!
//! # Data Flow
//! ```text
//! Dispatched Invocation
//!     → filter.rs (query → FilterCriteria) / types.rs (form → ContactPayload)
//!     → store.rs (ContactStore contract)
//!     → memory.rs (in-memory implementation, optional JSON snapshot)
//!     → Contact records back to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - The HTTP layer only sees the `ContactStore` trait
//! - Identifiers reach the store verbatim; the store decides what resolves
//! - Absent filter fields never constrain a listing

pub mod filter;
pub mod memory;
pub mod store;
pub mod types;

pub use filter::FilterCriteria;
pub use memory::InMemoryContactStore;
pub use store::ContactStore;
pub use types::{Contact, ContactPayload, StoreError, ValidationError};
