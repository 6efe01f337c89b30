//! Date-based API versioning
//!
//! This crate lets an HTTP service expose several behavioral versions of the
//! same route and pick one per request from a client-supplied version date.
//!
//! - [`Version`] - an API revision identified by its release day
//! - [`VersionRegistry`] - ordered known versions plus a default; resolves any
//!   requested date to the closest registered version at or before it
//! - [`VersionCondition`] - the versions a route declares; combined across
//!   declaration scopes, matched against a request and ranked against
//!   competing routes
//!
//! Requests name their version in the `Api-Version` header. A missing or
//! malformed header falls back to the registry default rather than failing
//! the request.
//!
//! # Example
//!
//! ```rust
//! use apiver_core::{Version, VersionCondition, VersionRegistry};
//!
//! let registry = VersionRegistry::new()
//!     .with_version(Version::new(2023, 1, 1).unwrap(), false)
//!     .with_version(Version::new(2024, 1, 1).unwrap(), true);
//!
//! assert_eq!(registry.resolve("2023-06-01"), Some(Version::new(2023, 1, 1).unwrap()));
//! assert_eq!(registry.resolve("not-a-date"), registry.default_version());
//!
//! let condition = VersionCondition::from_version_strings(["2023-01-01"], &registry);
//! assert!(condition.matches(None, &registry));
//! ```
//!
//! # Features
//!
//! - `config` (default) - load versions from the environment or JSON

mod condition;
mod error;
mod header;
mod registry;
mod version;

#[cfg(feature = "config")]
pub mod config;

#[cfg(test)]
mod tests;

pub use condition::VersionCondition;
pub use error::{Result, VersionError};
pub use header::{version_token, API_VERSION_HEADER};
pub use registry::VersionRegistry;
pub use version::Version;

#[cfg(feature = "config")]
pub use config::VersionConfig;
