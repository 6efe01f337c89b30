//! Versioned route selection
//!
//! The routing-layer side of `apiver-core`: routes are registered explicitly
//! at startup with the versions they serve, and each request is dispatched to
//! the best candidate for its `Api-Version`.
//!
//! Handlers are an opaque type parameter, so the router plugs into any HTTP
//! stack: look up a handler with [`VersionedRouter::select`], then invoke it
//! however the surrounding server does. Selection failures carry the HTTP
//! status to answer with ([`SelectError::status_code`]).

mod error;
mod group;
mod router;

pub use error::{RouteConflictError, SelectError};
pub use group::RouteGroup;
pub use router::{RouteInfo, RouteMatch, VersionedRouter};

pub use apiver_core::{Version, VersionCondition, VersionRegistry, API_VERSION_HEADER};
