//! The contract the HTTP layer uses to reach contact storage.

use async_trait::async_trait;

use super::filter::FilterCriteria;
use super::types::{Contact, ContactPayload, StoreError};

/// Contact persistence.
///
/// Identifiers arrive exactly as they appeared in the request path. Resolving
/// them, including rejecting ones that cannot name a record, is up to the
/// implementation.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Contacts satisfying the criteria.
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Contact>, StoreError>;

    /// Store a new contact and return it with its assigned id.
    async fn create(&self, payload: ContactPayload) -> Result<Contact, StoreError>;

    /// Remove every contact. Either all are removed or none are.
    async fn delete_all(&self) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Contact, StoreError>;

    /// Apply the present payload fields to an existing contact.
    async fn update(&self, id: &str, payload: ContactPayload) -> Result<Contact, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
