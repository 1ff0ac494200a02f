//! Path classification for the contacts resource.
//!
//! # Responsibilities
//! - Recognise the collection path (`/api/v1/contacts`)
//! - Recognise item paths (`/api/v1/contacts/{id}`) and extract the id
//! - Report everything else as an explicit no-match
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - The id segment is taken verbatim (no decoding, no coercion)
//! - Empty segments never match (`/api/v1/contacts/` is not the collection)
//! - No regex, a single prefix strip and one split check

/// Root of the contacts resource.
pub const CONTACTS_ROOT: &str = "/api/v1/contacts";

/// Shape of a matched request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// The resource root itself.
    Collection,
    /// The resource root followed by exactly one segment.
    Item(String),
    /// Any other path.
    NoMatch,
}

impl RouteMatch {
    /// The table key for this match, if any.
    pub fn shape(&self) -> Option<PathShape> {
        match self {
            RouteMatch::Collection => Some(PathShape::Collection),
            RouteMatch::Item(_) => Some(PathShape::Item),
            RouteMatch::NoMatch => None,
        }
    }
}

/// Path shape without the bound identifier, used as a dispatch table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathShape {
    Collection,
    Item,
}

impl PathShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathShape::Collection => "collection",
            PathShape::Item => "item",
        }
    }
}

/// Classifies request paths against a single resource root.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    root: String,
}

impl PathMatcher {
    /// Create a matcher for the given root. A trailing slash on the root is ignored.
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.len() > 1 && root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Classify a path (without query string).
    pub fn match_path(&self, path: &str) -> RouteMatch {
        let Some(rest) = path.strip_prefix(self.root.as_str()) else {
            return RouteMatch::NoMatch;
        };

        if rest.is_empty() {
            return RouteMatch::Collection;
        }

        match rest.strip_prefix('/') {
            Some(segment) if !segment.is_empty() && !segment.contains('/') => {
                RouteMatch::Item(segment.to_string())
            }
            _ => RouteMatch::NoMatch,
        }
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(CONTACTS_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_match() {
        let matcher = PathMatcher::default();
        assert_eq!(matcher.match_path("/api/v1/contacts"), RouteMatch::Collection);
    }

    #[test]
    fn test_item_match() {
        let matcher = PathMatcher::default();
        assert_eq!(
            matcher.match_path("/api/v1/contacts/42"),
            RouteMatch::Item("42".to_string())
        );

        // Ids are not coerced or decoded
        assert_eq!(
            matcher.match_path("/api/v1/contacts/not-a-number"),
            RouteMatch::Item("not-a-number".to_string())
        );
        assert_eq!(
            matcher.match_path("/api/v1/contacts/a%20b"),
            RouteMatch::Item("a%20b".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        let matcher = PathMatcher::default();
        assert_eq!(matcher.match_path("/api/v1/contacts/42/x"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/api/v1/contacts/"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/api/v1/contacts//"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/api/v1/contactsx"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/api/v1/Contacts"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/api/v2/contacts"), RouteMatch::NoMatch);
        assert_eq!(matcher.match_path("/"), RouteMatch::NoMatch);
    }

    #[test]
    fn test_root_trailing_slash_is_normalized() {
        let matcher = PathMatcher::new("/people/");
        assert_eq!(matcher.root(), "/people");
        assert_eq!(matcher.match_path("/people"), RouteMatch::Collection);
        assert_eq!(matcher.match_path("/people/7"), RouteMatch::Item("7".into()));
    }

    #[test]
    fn test_shape_projection() {
        assert_eq!(RouteMatch::Collection.shape(), Some(PathShape::Collection));
        assert_eq!(RouteMatch::Item("1".into()).shape(), Some(PathShape::Item));
        assert_eq!(RouteMatch::NoMatch.shape(), None);
    }
}
