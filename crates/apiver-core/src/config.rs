//! Version registry configuration
//!
//! Registration is driven by static configuration read once at startup,
//! either from the environment (optionally seeded from a `.env` file) or
//! from a JSON document.
//!
//! # Example
//!
//! ```ignore
//! use apiver_core::config::{load_dotenv, VersionConfig};
//!
//! // APIVER_VERSIONS=2023-01-01,2024-01-01
//! // APIVER_DEFAULT=2024-01-01
//! load_dotenv();
//! let registry = VersionConfig::from_env()?.into_registry()?;
//! ```

use crate::error::{Result, VersionError};
use crate::registry::VersionRegistry;
use crate::version::Version;
use serde::Deserialize;

/// Prefix of the environment variables read by [`VersionConfig::from_env`]
pub const ENV_PREFIX: &str = "APIVER_";

/// Known versions, in chronological order, and the optional default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VersionConfig {
    /// Version dates (`YYYY-MM-DD`), oldest first
    pub versions: Vec<String>,
    /// Default version; the first listed version when unset
    #[serde(default)]
    pub default: Option<String>,
}

impl VersionConfig {
    /// Load from `APIVER_VERSIONS` (comma separated) and `APIVER_DEFAULT`
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from a JSON document such as
    /// `{"versions": ["2023-01-01", "2024-01-01"], "default": "2024-01-01"}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validated `(version, is_default)` pairs in configured order
    pub fn entries(&self) -> Result<Vec<(Version, bool)>> {
        let versions = self
            .versions
            .iter()
            .map(|raw| raw.parse::<Version>())
            .collect::<Result<Vec<_>>>()?;

        let default = match &self.default {
            Some(raw) => {
                let default: Version = raw.parse()?;
                if !versions.contains(&default) {
                    return Err(VersionError::UnknownDefault(raw.clone()));
                }
                Some(default)
            }
            None => None,
        };

        Ok(versions
            .into_iter()
            .map(|version| (version, Some(version) == default))
            .collect())
    }

    /// Clear `registry` and repopulate it from this configuration
    ///
    /// The registry is left untouched when the configuration is invalid.
    pub fn apply(&self, registry: &VersionRegistry) -> Result<()> {
        let entries = self.entries()?;
        registry.clear();
        for (version, make_default) in entries {
            registry.register(version, make_default);
        }
        tracing::info!(
            versions = registry.len(),
            default = ?registry.default_version().map(|v| v.to_string()),
            "api version registry configured"
        );
        Ok(())
    }

    /// Build a fresh registry from this configuration
    pub fn into_registry(self) -> Result<VersionRegistry> {
        let registry = VersionRegistry::new();
        self.apply(&registry)?;
        Ok(registry)
    }
}

/// Load environment variables from a `.env` file in the working directory
///
/// A missing file is not an error; existing variables are not overridden.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    fn clear_env() {
        std::env::remove_var("APIVER_VERSIONS");
        std::env::remove_var("APIVER_DEFAULT");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("APIVER_VERSIONS", "2023-01-01,2024-01-01");
        std::env::set_var("APIVER_DEFAULT", "2024-01-01");

        let config = VersionConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.versions, vec!["2023-01-01", "2024-01-01"]);
        assert_eq!(config.default.as_deref(), Some("2024-01-01"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_without_default() {
        std::env::set_var("APIVER_VERSIONS", "2022-05-10");
        std::env::remove_var("APIVER_DEFAULT");

        let config = VersionConfig::from_env();
        clear_env();

        let registry = config.unwrap().into_registry().unwrap();
        assert_eq!(registry.default_version(), Some(v("2022-05-10")));
    }

    #[test]
    #[serial]
    fn test_config_from_env_missing_var() {
        clear_env();

        let result = VersionConfig::from_env();
        assert!(matches!(result, Err(VersionError::Config(_))));
    }

    #[test]
    fn test_config_from_json() {
        let config = VersionConfig::from_json(
            r#"{"versions": ["2023-01-01", "2024-01-01"], "default": "2024-01-01"}"#,
        )
        .unwrap();

        let registry = config.into_registry().unwrap();
        assert_eq!(registry.all_versions(), vec![v("2023-01-01"), v("2024-01-01")]);
        assert_eq!(registry.default_version(), Some(v("2024-01-01")));
        assert_eq!(registry.resolve("2023-06-01"), Some(v("2023-01-01")));
    }

    #[test]
    fn test_config_invalid_json() {
        assert!(matches!(
            VersionConfig::from_json("{\"versions\": 3}"),
            Err(VersionError::ConfigJson(_))
        ));
    }

    #[test]
    fn test_entries_validation() {
        let config = VersionConfig {
            versions: vec!["2023-01-01".into(), "2023-13-01".into()],
            default: None,
        };
        assert!(matches!(config.entries(), Err(VersionError::InvalidDate(_))));

        let config = VersionConfig {
            versions: vec!["2023-01-01".into()],
            default: Some("2024-01-01".into()),
        };
        assert!(matches!(
            config.entries(),
            Err(VersionError::UnknownDefault(_))
        ));
    }

    #[test]
    fn test_apply_reinitializes_registry() {
        let registry = VersionRegistry::new().with_version(v("2020-01-01"), true);

        VersionConfig {
            versions: vec!["2023-01-01".into(), "2024-01-01".into()],
            default: Some("2023-01-01".into()),
        }
        .apply(&registry)
        .unwrap();

        assert_eq!(registry.all_versions(), vec![v("2023-01-01"), v("2024-01-01")]);
        assert_eq!(registry.default_version(), Some(v("2023-01-01")));
    }

    #[test]
    fn test_apply_invalid_config_keeps_registry() {
        let registry = VersionRegistry::new().with_version(v("2020-01-01"), true);

        let result = VersionConfig {
            versions: vec!["nope".into()],
            default: None,
        }
        .apply(&registry);

        assert!(result.is_err());
        assert_eq!(registry.all_versions(), vec![v("2020-01-01")]);
    }
}
