//! Filter criteria for listing contacts.

use super::types::{Contact, ValidationError};

/// Optional constraints on a listing. `None` means no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub favorite: Option<bool>,
    pub name: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from decoded query parameters.
    ///
    /// Unknown parameters are ignored. A `favorite` value that is not a
    /// boolean is rejected rather than treated as unspecified.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "favorite" => criteria.favorite = Some(parse_flag("favorite", value.as_ref())?),
                "name" => criteria.name = Some(value.as_ref().to_string()),
                _ => {}
            }
        }
        Ok(criteria)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.favorite.is_none() && self.name.is_none()
    }

    /// Whether a contact satisfies every present constraint.
    ///
    /// Name matching is a case-insensitive substring match.
    pub fn matches(&self, contact: &Contact) -> bool {
        if let Some(favorite) = self.favorite {
            if contact.favorite != favorite {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !contact.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Parse a boolean form or query value.
pub fn parse_flag(field: &str, raw: &str) -> Result<bool, ValidationError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(ValidationError::new(
            field,
            format!("expected a boolean, got {:?}", raw),
        ))
    }
}
