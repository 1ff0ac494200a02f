//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Hold the `shape × verb → operation` table
//! - Resolve a request (path, method) to an operation bound to its id
//! - Distinguish "verb not allowed here" from "no such path"
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Registration order is preserved, so `Allow` headers are deterministic
//! - A verb missing from the table is never silently accepted

use std::fmt;

use axum::http::Method;
use thiserror::Error;

use super::matcher::{PathMatcher, PathShape, RouteMatch};

/// A named unit of work on the contacts resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    DeleteAll,
    Get,
    Update,
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::DeleteAll => "delete_all",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// The path shape this operation is served on.
    pub fn shape(&self) -> PathShape {
        match self {
            Operation::List | Operation::Create | Operation::DeleteAll => PathShape::Collection,
            Operation::Get | Operation::Update | Operation::Delete => PathShape::Item,
        }
    }

    /// Bind the operation to the identifier extracted from the path.
    ///
    /// Returns `None` when the operation and the match disagree on whether an
    /// id is present, which a well-formed table never produces.
    pub fn bind(self, route: RouteMatch) -> Option<Invocation> {
        match (self, route) {
            (Operation::List, RouteMatch::Collection) => Some(Invocation::List),
            (Operation::Create, RouteMatch::Collection) => Some(Invocation::Create),
            (Operation::DeleteAll, RouteMatch::Collection) => Some(Invocation::DeleteAll),
            (Operation::Get, RouteMatch::Item(id)) => Some(Invocation::Get(id)),
            (Operation::Update, RouteMatch::Item(id)) => Some(Invocation::Update(id)),
            (Operation::Delete, RouteMatch::Item(id)) => Some(Invocation::Delete(id)),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation ready to run against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    List,
    Create,
    DeleteAll,
    Get(String),
    Update(String),
    Delete(String),
}

impl Invocation {
    pub fn operation(&self) -> Operation {
        match self {
            Invocation::List => Operation::List,
            Invocation::Create => Operation::Create,
            Invocation::DeleteAll => Operation::DeleteAll,
            Invocation::Get(_) => Operation::Get,
            Invocation::Update(_) => Operation::Update,
            Invocation::Delete(_) => Operation::Delete,
        }
    }
}

/// A registered (shape, verb) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub shape: PathShape,
    pub method: Method,
    pub operation: Operation,
}

/// The routes served for the contacts resource.
pub const CONTACT_ROUTES: [(PathShape, Method, Operation); 6] = [
    (PathShape::Collection, Method::GET, Operation::List),
    (PathShape::Collection, Method::POST, Operation::Create),
    (PathShape::Collection, Method::DELETE, Operation::DeleteAll),
    (PathShape::Item, Method::GET, Operation::Get),
    (PathShape::Item, Method::PUT, Operation::Update),
    (PathShape::Item, Method::DELETE, Operation::Delete),
];

/// A route table that cannot be served as written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteConflict {
    #[error("{method} registered twice for the {} shape", .shape.as_str())]
    Duplicate { shape: PathShape, method: Method },

    #[error(
        "{operation} needs the {} shape, registered on {}",
        .operation.shape().as_str(),
        .shape.as_str()
    )]
    WrongShape {
        shape: PathShape,
        method: Method,
        operation: Operation,
    },
}

/// The verb is not registered for a path shape that does exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNotAllowed {
    pub method: Method,
    pub allowed: Vec<Method>,
}

/// Immutable `shape × verb → operation` mapping.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    routes: Vec<Route>,
}

impl DispatchTable {
    /// Build a table, rejecting duplicate (shape, verb) pairs and operations
    /// registered on a shape they cannot bind to.
    pub fn new<I>(routes: I) -> Result<Self, RouteConflict>
    where
        I: IntoIterator<Item = (PathShape, Method, Operation)>,
    {
        let mut table = Vec::new();
        for (shape, method, operation) in routes {
            if operation.shape() != shape {
                return Err(RouteConflict::WrongShape {
                    shape,
                    method,
                    operation,
                });
            }
            if table
                .iter()
                .any(|r: &Route| r.shape == shape && r.method == method)
            {
                return Err(RouteConflict::Duplicate { shape, method });
            }
            table.push(Route {
                shape,
                method,
                operation,
            });
        }
        Ok(Self { routes: table })
    }

    /// The table for the contacts resource.
    pub fn contacts() -> Self {
        Self::new(CONTACT_ROUTES).expect("contact routes are unique per shape and verb")
    }

    /// Select the operation for a verb on a matched shape.
    pub fn dispatch(&self, shape: PathShape, method: &Method) -> Result<Operation, MethodNotAllowed> {
        self.routes
            .iter()
            .find(|r| r.shape == shape && r.method == *method)
            .map(|r| r.operation)
            .ok_or_else(|| MethodNotAllowed {
                method: method.clone(),
                allowed: self.allowed_methods(shape),
            })
    }

    /// Verbs registered for a shape, in registration order.
    pub fn allowed_methods(&self, shape: PathShape) -> Vec<Method> {
        self.routes
            .iter()
            .filter(|r| r.shape == shape)
            .map(|r| r.method.clone())
            .collect()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Outcome of routing a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Invoke(Invocation),
    MethodNotAllowed(MethodNotAllowed),
    NotFound,
}

/// Path matcher and dispatch table combined.
#[derive(Debug, Clone)]
pub struct Router {
    matcher: PathMatcher,
    table: DispatchTable,
}

impl Router {
    pub fn new(matcher: PathMatcher, table: DispatchTable) -> Self {
        Self { matcher, table }
    }

    /// Router for `/api/v1/contacts` with the contact routes.
    pub fn contacts() -> Self {
        Self::new(PathMatcher::default(), DispatchTable::contacts())
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Resolve a request path and verb.
    pub fn resolve(&self, path: &str, method: &Method) -> Resolution {
        let route = self.matcher.match_path(path);
        let Some(shape) = route.shape() else {
            return Resolution::NotFound;
        };

        match self.table.dispatch(shape, method) {
            // The table only holds operations that bind to their shape.
            Ok(operation) => match operation.bind(route) {
                Some(invocation) => Resolution::Invoke(invocation),
                None => Resolution::NotFound,
            },
            Err(not_allowed) => Resolution::MethodNotAllowed(not_allowed),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::contacts()
    }
}
