//! Contact records, request payloads and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filter::parse_flag;

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Server-assigned identifier.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub favorite: bool,
}

impl Contact {
    /// Build a new record from a create payload.
    pub fn from_payload(id: u64, payload: ContactPayload) -> Self {
        Self {
            id,
            name: payload.name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            address: payload.address.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            favorite: payload.favorite.unwrap_or(false),
        }
    }

    /// Overwrite the fields present in the payload.
    pub fn apply(&mut self, payload: ContactPayload) {
        if let Some(name) = payload.name {
            self.name = name;
        }
        if let Some(email) = payload.email {
            self.email = email;
        }
        if let Some(address) = payload.address {
            self.address = address;
        }
        if let Some(phone) = payload.phone {
            self.phone = phone;
        }
        if let Some(favorite) = payload.favorite {
            self.favorite = favorite;
        }
    }
}

/// Fields submitted for a create or update. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactPayload {
    /// Build a payload from decoded form fields. Unknown fields are ignored;
    /// a repeated field keeps its last value.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut payload = Self::default();
        for (key, value) in fields {
            let value = value.into();
            match key.as_ref() {
                "name" => payload.name = Some(value.trim().to_string()),
                "email" => payload.email = Some(value.trim().to_string()),
                "address" => payload.address = Some(value.trim().to_string()),
                "phone" => payload.phone = Some(value.trim().to_string()),
                "favorite" => payload.favorite = Some(parse_flag("favorite", &value)?),
                other => tracing::trace!(field = %other, "Ignoring unknown form field"),
            }
        }
        Ok(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.favorite.is_none()
    }

    /// A create needs a non-empty name.
    pub fn validate_for_create(&self) -> Result<(), ValidationError> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(()),
            _ => Err(ValidationError::new("name", "can not be empty")),
        }
    }

    /// An update needs at least one field, and cannot blank out the name.
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::new("body", "data to update can not be empty"));
        }
        if matches!(self.name.as_deref(), Some("")) {
            return Err(ValidationError::new("name", "can not be empty"));
        }
        Ok(())
    }
}

/// Client input that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The offending query parameter or body field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors reported by a contact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier does not resolve to a record.
    #[error("contact {0} not found")]
    NotFound(String),

    /// The record conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Snapshot file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON.
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),

    /// The backing store is unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the store attributes the failure to the client.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_from_fields() {
        let payload = ContactPayload::from_fields([
            ("name", " Ada "),
            ("email", "ada@example.com"),
            ("favorite", "true"),
            ("avatar", "ignored"),
        ])
        .unwrap();

        assert_eq!(payload.name.as_deref(), Some("Ada"));
        assert_eq!(payload.email.as_deref(), Some("ada@example.com"));
        assert_eq!(payload.favorite, Some(true));
        assert_eq!(payload.phone, None);
    }

    #[test]
    fn test_payload_rejects_bad_favorite() {
        let err = ContactPayload::from_fields([("favorite", "yes please")]).unwrap_err();
        assert_eq!(err.field, "favorite");
    }

    #[test]
    fn test_create_requires_name() {
        assert!(ContactPayload::default().validate_for_create().is_err());

        let blank = ContactPayload::from_fields([("name", "   ")]).unwrap();
        assert_eq!(blank.validate_for_create().unwrap_err().field, "name");

        let ok = ContactPayload::from_fields([("name", "Ada")]).unwrap();
        assert!(ok.validate_for_create().is_ok());
    }

    #[test]
    fn test_update_requires_some_field() {
        let err = ContactPayload::default().validate_for_update().unwrap_err();
        assert_eq!(err.field, "body");

        let favorite_only = ContactPayload::from_fields([("favorite", "0")]).unwrap();
        assert!(favorite_only.validate_for_update().is_ok());
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut contact = Contact::from_payload(
            1,
            ContactPayload::from_fields([("name", "Ada"), ("phone", "555")]).unwrap(),
        );
        contact.apply(ContactPayload::from_fields([("favorite", "true")]).unwrap());

        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.phone, "555");
        assert!(contact.favorite);
    }

    #[test]
    fn test_store_error_classification() {
        assert!(StoreError::NotFound("1".into()).is_client_error());
        assert!(StoreError::Conflict("dup".into()).is_client_error());
        assert!(!StoreError::Unavailable("down".into()).is_client_error());
    }
}
