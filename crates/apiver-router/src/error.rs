//! Route selection and registration errors

use http::{Method, StatusCode};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why no route could serve a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// No route is registered for the path
    #[error("No route for path {path}")]
    NotFound { path: String },

    /// The path exists but not for this method
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: Method, allowed: Vec<Method> },

    /// Routes exist but none is valid for the requested version
    #[error("No route supports API version {}", .requested.as_deref().unwrap_or("<default>"))]
    VersionNotSupported { requested: Option<String> },
}

impl SelectError {
    /// HTTP status the routing layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::VersionNotSupported { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Machine-readable error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::VersionNotSupported { .. } => "version_not_supported",
        }
    }

    /// `Allow` header value for 405 responses
    pub fn allow_header(&self) -> Option<String> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(
                allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    /// JSON error body: `{"error": {"type": ..., "message": ...}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(ErrorResponse::from(self)).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested_version: Option<String>,
}

impl From<&SelectError> for ErrorResponse {
    fn from(err: &SelectError) -> Self {
        let requested_version = match err {
            SelectError::VersionNotSupported { requested } => requested.clone(),
            _ => None,
        };
        Self {
            error: ErrorBody {
                error_type: err.error_type(),
                message: err.to_string(),
                requested_version,
            },
        }
    }
}

/// Two path patterns that differ only in parameter names
#[derive(Debug, Clone)]
pub struct RouteConflictError {
    /// The path that was being registered
    pub new_path: String,
    /// The already registered path it collides with
    pub existing_path: String,
    /// Detailed error message from the underlying router
    pub details: String,
}

impl fmt::Display for RouteConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "route conflict detected")?;
        writeln!(f, "  Existing: {}", self.existing_path)?;
        writeln!(f, "  New:      {}", self.new_path)?;
        writeln!(f, "  Details:  {}", self.details)?;
        writeln!(f)?;
        writeln!(
            f,
            "  Versions of one endpoint must share the exact same path pattern,"
        )?;
        write!(f, "  including parameter names.")
    }
}

impl std::error::Error for RouteConflictError {}
