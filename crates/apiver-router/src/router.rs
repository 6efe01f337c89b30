//! Version-aware router using radix tree (matchit)
//!
//! Several handlers may be registered for the same method and path, each with
//! its own [`VersionCondition`]. A request is served by the candidate whose
//! condition matches the request's effective version and ranks first, i.e.
//! the one declared for the most recent version not after the request.
//!
//! # Path Patterns
//!
//! Routes support dynamic path parameters using `{param}` syntax:
//!
//! - `/users` - Static path
//! - `/users/{id}` - Single parameter
//!
//! Every version of one endpoint must use the exact same pattern.
//!
//! # Example
//!
//! ```rust
//! use apiver_core::VersionRegistry;
//! use apiver_router::VersionedRouter;
//! use http::{HeaderMap, HeaderValue, Method};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     VersionRegistry::new()
//!         .with_version("2020-01-01".parse().unwrap(), false)
//!         .with_version("2023-01-01".parse().unwrap(), true),
//! );
//!
//! let router = VersionedRouter::new(registry)
//!     .route(Method::GET, "/users/{id}", ["2020-01-01"], "legacy")
//!     .route(Method::GET, "/users/{id}", ["2023-01-01"], "current");
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("Api-Version", HeaderValue::from_static("2021-06-01"));
//! let matched = router.select(&Method::GET, "/users/7", &headers).unwrap();
//! assert_eq!(*matched.handler, "legacy");
//! assert_eq!(matched.params["id"], "7");
//!
//! let matched = router.select(&Method::GET, "/users/7", &HeaderMap::new()).unwrap();
//! assert_eq!(*matched.handler, "current");
//! ```

use crate::error::{RouteConflictError, SelectError};
use crate::group::{join_path, normalize_prefix, RouteGroup};
use apiver_core::{version_token, Version, VersionCondition, VersionRegistry, API_VERSION_HEADER};
use http::{HeaderMap, HeaderValue, Method};
use matchit::Router as MatchitRouter;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered handler and the versions it serves
struct Candidate<H> {
    method: Method,
    condition: Option<VersionCondition>,
    handler: H,
}

impl<H> Candidate<H> {
    /// Unversioned candidates serve every request
    fn serves(&self, effective: Option<&Version>) -> bool {
        match (&self.condition, effective) {
            (None, _) => true,
            (Some(condition), Some(effective)) => condition.matches_version(effective),
            (Some(_), None) => false,
        }
    }

    /// Versioned before unversioned, then most recent declared version first
    fn rank(&self, other: &Candidate<H>) -> Ordering {
        match (&self.condition, &other.condition) {
            (Some(a), Some(b)) => a.rank(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// All candidates sharing one path pattern, in registration order
struct PathRoutes<H> {
    path: String,
    candidates: Vec<Candidate<H>>,
}

/// Information about a registered route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// The original path pattern (e.g., "/users/{id}")
    pub path: String,
    /// The HTTP method
    pub method: Method,
    /// Declared versions, `None` for unversioned routes
    pub condition: Option<VersionCondition>,
}

/// The route chosen for a request
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// Handler of the winning candidate
    pub handler: &'a H,
    /// Path parameters extracted from the request path
    pub params: HashMap<String, String>,
    /// Path pattern the request matched
    pub path: &'a str,
    /// Effective version the request is served under
    pub version: Option<Version>,
    /// Condition of the winning candidate, `None` if unversioned
    pub condition: Option<&'a VersionCondition>,
}

impl<H> RouteMatch<'_, H> {
    /// Response headers echoing the effective version
    pub fn response_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(version) = self.version {
            if let Ok(value) = HeaderValue::from_str(&version.canonical()) {
                headers.insert(API_VERSION_HEADER, value);
            }
        }
        headers
    }
}

/// Router selecting handlers by path, method and `Api-Version`
pub struct VersionedRouter<H> {
    registry: Arc<VersionRegistry>,
    inner: MatchitRouter<usize>,
    paths: Vec<PathRoutes<H>>,
    /// matchit path -> index into `paths`
    indices: HashMap<String, usize>,
}

impl<H> VersionedRouter<H> {
    /// Create an empty router resolving versions through `registry`
    ///
    /// Populate the registry before registering routes: declared version
    /// strings are resolved once, at registration time.
    pub fn new(registry: Arc<VersionRegistry>) -> Self {
        Self {
            registry,
            inner: MatchitRouter::new(),
            paths: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Register a handler valid from the declared versions onward
    ///
    /// # Panics
    ///
    /// Panics with a [`RouteConflictError`] message when `path` collides with
    /// a differently spelled pattern (e.g. `/users/{id}` vs `/users/{user_id}`).
    pub fn route<I, S>(self, method: Method, path: &str, versions: I, handler: H) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let condition = VersionCondition::from_version_strings(versions, &self.registry);
        self.route_condition(method, path, Some(condition), handler)
    }

    /// Register a handler that serves every version
    pub fn unversioned(self, method: Method, path: &str, handler: H) -> Self {
        self.route_condition(method, path, None, handler)
    }

    /// Register a handler with a prebuilt condition
    pub fn route_condition(
        mut self,
        method: Method,
        path: &str,
        condition: Option<VersionCondition>,
        handler: H,
    ) -> Self {
        if let Err(conflict) = self.insert(method, path, condition, handler) {
            panic!("{}", conflict);
        }
        self
    }

    /// Register every route of a group under its prefix
    ///
    /// Member conditions are the group condition combined with the member's
    /// own declaration.
    pub fn nest(mut self, group: RouteGroup<H>) -> Self {
        let prefix = normalize_prefix(&group.prefix);
        let group_condition = (!group.versions.is_empty())
            .then(|| VersionCondition::from_version_strings(&group.versions, &self.registry));

        for member in group.routes {
            let member_condition = (!member.versions.is_empty())
                .then(|| VersionCondition::from_version_strings(&member.versions, &self.registry));

            let condition = match (&group_condition, member_condition) {
                (Some(shared), Some(own)) => Some(shared.combine(&own)),
                (Some(shared), None) => Some(shared.clone()),
                (None, own) => own,
            };

            let path = join_path(&prefix, &member.path);
            if let Err(conflict) = self.insert(member.method, &path, condition, member.handler) {
                panic!("{}", conflict);
            }
        }
        self
    }

    fn insert(
        &mut self,
        method: Method,
        path: &str,
        condition: Option<VersionCondition>,
        handler: H,
    ) -> Result<(), RouteConflictError> {
        if let Some(condition) = &condition {
            if condition.is_empty() {
                tracing::warn!(
                    path = %path,
                    method = %method,
                    "route declares no resolvable version and will never match"
                );
            }
        }

        let matchit_path = convert_path_params(path);
        let index = match self.indices.get(&matchit_path) {
            Some(index) => *index,
            None => {
                let index = self.paths.len();
                self.inner
                    .insert(matchit_path.clone(), index)
                    .map_err(|e| RouteConflictError {
                        new_path: path.to_string(),
                        existing_path: self
                            .find_conflicting_route(&matchit_path)
                            .unwrap_or("<unknown>")
                            .to_string(),
                        details: e.to_string(),
                    })?;
                self.paths.push(PathRoutes {
                    path: path.to_string(),
                    candidates: Vec::new(),
                });
                self.indices.insert(matchit_path, index);
                index
            }
        };

        tracing::debug!(
            path = %path,
            method = %method,
            condition = %condition.as_ref().map(ToString::to_string).unwrap_or_else(|| "*".into()),
            "registered versioned route"
        );

        self.paths[index].candidates.push(Candidate {
            method,
            condition,
            handler,
        });
        Ok(())
    }

    /// Find a registered pattern with the same structure but other parameter names
    fn find_conflicting_route(&self, matchit_path: &str) -> Option<&str> {
        let normalized_new = normalize_path_for_comparison(matchit_path);
        self.indices
            .iter()
            .find(|(registered, _)| normalize_path_for_comparison(registered) == normalized_new)
            .map(|(_, index)| self.paths[*index].path.as_str())
    }

    /// Select the handler for a request
    ///
    /// The effective version comes from the `Api-Version` header, or the
    /// registry default when the header is absent.
    pub fn select(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<RouteMatch<'_, H>, SelectError> {
        self.select_with_token(method, path, version_token(headers))
    }

    /// Select the handler for a request carrying an optional version token
    pub fn select_with_token(
        &self,
        method: &Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<RouteMatch<'_, H>, SelectError> {
        let matched = self.inner.at(path).map_err(|_| SelectError::NotFound {
            path: path.to_string(),
        })?;
        let routes = &self.paths[*matched.value];

        let mut by_method = routes
            .candidates
            .iter()
            .filter(|candidate| candidate.method == *method)
            .peekable();
        if by_method.peek().is_none() {
            let mut allowed: Vec<Method> = Vec::new();
            for candidate in &routes.candidates {
                if !allowed.contains(&candidate.method) {
                    allowed.push(candidate.method.clone());
                }
            }
            return Err(SelectError::MethodNotAllowed {
                method: method.clone(),
                allowed,
            });
        }

        let effective = self.registry.effective_version(token);
        let winner = by_method
            .filter(|candidate| candidate.serves(effective.as_ref()))
            .min_by(|a, b| a.rank(b));

        let Some(winner) = winner else {
            tracing::debug!(
                path = %path,
                method = %method,
                token = ?token,
                "no route supports the requested api version"
            );
            return Err(SelectError::VersionNotSupported {
                requested: token.map(str::to_string),
            });
        };

        tracing::debug!(
            path = %path,
            method = %method,
            token = ?token,
            effective = ?effective.map(|v| v.to_string()),
            condition = ?winner.condition.as_ref().map(ToString::to_string),
            "selected versioned route"
        );

        Ok(RouteMatch {
            handler: &winner.handler,
            params: matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            path: &routes.path,
            version: effective,
            condition: winner.condition.as_ref(),
        })
    }

    /// All registered routes in registration order per path
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.paths
            .iter()
            .flat_map(|routes| {
                routes.candidates.iter().map(|candidate| RouteInfo {
                    path: routes.path.clone(),
                    method: candidate.method.clone(),
                    condition: candidate.condition.clone(),
                })
            })
            .collect()
    }

    /// The registry versions are resolved against
    pub fn registry(&self) -> &Arc<VersionRegistry> {
        &self.registry
    }
}

/// Convert {param} style to :param for matchit
fn convert_path_params(path: &str) -> String {
    let mut result = String::with_capacity(path.len());

    for ch in path.chars() {
        match ch {
            '{' => result.push(':'),
            '}' => {}
            _ => result.push(ch),
        }
    }

    result
}

/// Normalize a path for conflict comparison by replacing parameter names with a placeholder
fn normalize_path_for_comparison(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut in_param = false;

    for ch in path.chars() {
        match ch {
            ':' => {
                in_param = true;
                result.push_str(":_");
            }
            '/' => {
                in_param = false;
                result.push('/');
            }
            _ if in_param => {}
            _ => result.push(ch),
        }
    }

    result
}
