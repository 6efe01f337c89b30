//! Per-route version conditions
//!
//! A [`VersionCondition`] is the set of versions a route declares. A route
//! declared for `2023-01-01` is valid from that day onward, so it matches any
//! request whose effective version is the same day or later. When several
//! routes match, [`VersionCondition::rank`] prefers the one with the most
//! recent declared version.
//!
//! # Example
//!
//! ```rust
//! use apiver_core::{Version, VersionCondition, VersionRegistry};
//! use std::cmp::Ordering;
//!
//! let registry = VersionRegistry::new()
//!     .with_version("2020-01-01".parse().unwrap(), false)
//!     .with_version("2023-01-01".parse().unwrap(), true);
//!
//! let legacy = VersionCondition::from_version_strings(["2020-01-01"], &registry);
//! let current = VersionCondition::from_version_strings(["2023-01-01"], &registry);
//!
//! assert!(legacy.matches(Some("2024-05-01"), &registry));
//! assert!(current.matches(Some("2024-05-01"), &registry));
//! assert_eq!(current.rank(&legacy), Ordering::Less);
//! ```

use crate::header::version_token;
use crate::registry::VersionRegistry;
use crate::version::Version;
use http::HeaderMap;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// Immutable set of versions attached to a route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionCondition {
    versions: BTreeSet<Version>,
}

impl VersionCondition {
    /// Build a condition from declared version strings
    ///
    /// Each string is resolved through the registry at construction time.
    /// Strings that resolve to nothing (an empty registry) are skipped.
    pub fn from_version_strings<I, S>(strings: I, registry: &VersionRegistry) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut versions = BTreeSet::new();
        for declared in strings {
            let declared = declared.as_ref();
            match registry.resolve(declared) {
                Some(version) => {
                    versions.insert(version);
                }
                None => {
                    tracing::warn!(
                        declared = %declared,
                        "declared api version did not resolve, registry is empty"
                    );
                }
            }
        }
        Self { versions }
    }

    /// Build a condition from already-resolved versions
    pub fn from_versions<I>(versions: I) -> Self
    where
        I: IntoIterator<Item = Version>,
    {
        Self {
            versions: versions.into_iter().collect(),
        }
    }

    /// Union of both version sets
    ///
    /// Members are never pruned, even when a later member subsumes an
    /// earlier one.
    pub fn combine(&self, other: &VersionCondition) -> VersionCondition {
        tracing::debug!(left = %self, right = %other, "combining version conditions");
        VersionCondition {
            versions: self.versions.union(&other.versions).copied().collect(),
        }
    }

    /// Whether a request carrying `token` satisfies this condition
    ///
    /// An absent token uses the registry default. When no effective version can
    /// be determined the condition does not match.
    pub fn matches(&self, token: Option<&str>, registry: &VersionRegistry) -> bool {
        tracing::debug!(token = ?token, "matching api version condition");
        match registry.effective_version(token) {
            Some(effective) => self.matches_version(&effective),
            None => {
                tracing::debug!("no effective api version, condition cannot match");
                false
            }
        }
    }

    /// Whether a request with these headers satisfies this condition
    pub fn matches_headers(&self, headers: &HeaderMap, registry: &VersionRegistry) -> bool {
        self.matches(version_token(headers), registry)
    }

    /// Whether any member is on or before the effective version
    pub fn matches_version(&self, effective: &Version) -> bool {
        let matched = self
            .versions
            .iter()
            .any(|declared| !effective.is_before(declared));
        if !matched {
            tracing::debug!(effective = %effective, condition = %self, "unable to find a matching version");
        }
        matched
    }

    /// The most recent member, `None` for an empty condition
    pub fn latest_version(&self) -> Option<Version> {
        self.versions.last().copied()
    }

    /// Order two conditions, most recent latest version first
    ///
    /// Returns `Ordering::Less` when `self` should be preferred over `other`.
    /// An empty condition sorts after every non-empty one.
    pub fn rank(&self, other: &VersionCondition) -> Ordering {
        other.latest_version().cmp(&self.latest_version())
    }

    /// Members in date order
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.versions.contains(version)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<Version> for VersionCondition {
    fn from_iter<T: IntoIterator<Item = Version>>(iter: T) -> Self {
        Self::from_versions(iter)
    }
}

impl fmt::Display for VersionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, version) in self.versions.iter().enumerate() {
            if i > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{}", version)?;
        }
        write!(f, "]")
    }
}
