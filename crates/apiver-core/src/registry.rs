//! Ordered registry of known API versions
//!
//! A [`VersionRegistry`] is owned by the service's startup routine, populated
//! once in chronological order and then shared (typically as
//! `Arc<VersionRegistry>`) with whatever resolves versions per request.
//!
//! Registration and clearing take an exclusive lock and queries a shared one,
//! but registration is a startup activity: finish populating the registry
//! before request-serving threads start resolving against it.

use crate::error::{Result, VersionError};
use crate::version::Version;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct RegistryState {
    versions: Vec<Version>,
    default: Option<Version>,
}

/// Registered versions in registration order, plus the designated default
#[derive(Debug, Default)]
pub struct VersionRegistry {
    state: RwLock<RegistryState>,
}

impl VersionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from `(version, make_default)` pairs
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Version, bool)>,
    {
        let registry = Self::new();
        for (version, make_default) in entries {
            registry.register(version, make_default);
        }
        registry
    }

    /// Register a version, builder style
    pub fn with_version(self, version: Version, make_default: bool) -> Self {
        self.register(version, make_default);
        self
    }

    /// Append a version
    ///
    /// The version becomes the default when `make_default` is set or when no
    /// default exists yet. Callers register in chronological order; the
    /// sequence is never re-sorted or de-duplicated.
    pub fn register(&self, version: Version, make_default: bool) {
        let mut state = self.write();
        state.versions.push(version);
        if make_default || state.default.is_none() {
            state.default = Some(version);
        }
        tracing::debug!(
            version = %version,
            default = ?state.default.map(|v| v.to_string()),
            "registered api version"
        );
    }

    /// Remove every version and unset the default
    pub fn clear(&self) {
        let mut state = self.write();
        state.versions.clear();
        state.default = None;
        tracing::debug!("cleared api version registry");
    }

    /// The earliest-registered version
    pub fn first_version(&self) -> Result<Version> {
        self.read()
            .versions
            .first()
            .copied()
            .ok_or(VersionError::NotRegistered)
    }

    /// Snapshot of all versions in registration order
    pub fn all_versions(&self) -> Vec<Version> {
        self.read().versions.clone()
    }

    /// The current default version, if any version has been registered
    pub fn default_version(&self) -> Option<Version> {
        self.read().default
    }

    pub fn len(&self) -> usize {
        self.read().versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().versions.is_empty()
    }

    /// Resolve an arbitrary string to the nearest registered version
    ///
    /// - unparsable input yields the default version
    /// - otherwise the last registered version not after the requested date
    /// - a date before every registered version yields the first version
    /// - an empty registry yields `None`
    pub fn resolve(&self, input: &str) -> Option<Version> {
        let state = self.read();

        let requested: Version = match input.parse() {
            Ok(version) => version,
            Err(_) => {
                tracing::debug!(
                    input = %input,
                    "unparsable api version, using default"
                );
                return state.default;
            }
        };

        let mut resolved = *state.versions.first()?;
        for current in &state.versions {
            if current.is_after(&requested) {
                break;
            }
            resolved = *current;
        }
        Some(resolved)
    }

    /// Like [`resolve`](Self::resolve), reporting the absent case as an error
    pub fn try_resolve(&self, input: &str) -> Result<Version> {
        self.resolve(input)
            .ok_or_else(|| VersionError::Unresolvable(input.to_string()))
    }

    /// The version a request is served under
    ///
    /// A present, non-blank token is resolved; otherwise the default applies.
    pub fn effective_version(&self, token: Option<&str>) -> Option<Version> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => self.resolve(token),
            None => self.default_version(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
