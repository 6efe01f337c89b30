//! Route groups sharing a path prefix and a version declaration

use http::Method;

/// A route declared inside a [`RouteGroup`]
pub(crate) struct GroupRoute<H> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) versions: Vec<String>,
    pub(crate) handler: H,
}

/// Routes registered together under one prefix
///
/// The group's version declaration applies to every member. A member that
/// declares its own versions gets the union of both declarations; a member
/// without one inherits the group's.
///
/// # Example
///
/// ```rust,ignore
/// use apiver_router::{RouteGroup, VersionedRouter};
/// use http::Method;
///
/// let orders = RouteGroup::new("/orders")
///     .versions(["2023-01-01"])
///     .route(Method::GET, "/{id}", ["2024-01-01"], show_order_v2)
///     .route(Method::GET, "/{id}", Vec::<&str>::new(), show_order);
///
/// let router = VersionedRouter::new(registry).nest(orders);
/// ```
pub struct RouteGroup<H> {
    pub(crate) prefix: String,
    pub(crate) versions: Vec<String>,
    pub(crate) routes: Vec<GroupRoute<H>>,
}

impl<H> RouteGroup<H> {
    /// Create an empty group under `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            versions: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Declare the versions shared by every member route
    pub fn versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions.extend(versions.into_iter().map(Into::into));
        self
    }

    /// Add a member route with its own version declaration (possibly empty)
    pub fn route<I, S>(mut self, method: Method, path: &str, versions: I, handler: H) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            versions: versions.into_iter().map(Into::into).collect(),
            handler,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Normalize a prefix for nesting.
///
/// Ensures the prefix:
/// - Starts with exactly one leading slash
/// - Has no trailing slash (unless it's just "/")
/// - Has no double slashes
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut result = String::with_capacity(prefix.len() + 1);
    for segment in segments {
        result.push('/');
        result.push_str(segment);
    }
    result
}

/// Join a normalized prefix and a member path
pub(crate) fn join_path(prefix: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    match (prefix, path) {
        (prefix, "") => prefix.to_string(),
        ("/", path) => format!("/{}", path),
        (prefix, path) => format!("{}/{}", prefix, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix("//api//v1"), "/api/v1");
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("///"), "/");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/orders", "/{id}"), "/orders/{id}");
        assert_eq!(join_path("/orders", "/"), "/orders");
        assert_eq!(join_path("/orders", ""), "/orders");
        assert_eq!(join_path("/", "/health"), "/health");
        assert_eq!(join_path("/", "/"), "/");
    }

    #[test]
    fn test_group_collects_routes() {
        let group = RouteGroup::new("/orders")
            .versions(["2023-01-01"])
            .route(Method::GET, "/", Vec::<&str>::new(), 1)
            .route(Method::GET, "/{id}", ["2024-01-01"], 2);

        assert_eq!(group.len(), 2);
        assert_eq!(group.versions, vec!["2023-01-01".to_string()]);
        assert_eq!(group.routes[1].versions, vec!["2024-01-01".to_string()]);
    }
}
