//! Versioned service walkthrough
//!
//! Loads the version list from `APIVER_VERSIONS` / `APIVER_DEFAULT` (or a
//! `.env` file), registers two generations of a `/users/{id}` endpoint and
//! dispatches a few requests carrying different `Api-Version` headers.
//!
//! ```text
//! APIVER_VERSIONS=2023-01-01,2024-01-01 APIVER_DEFAULT=2024-01-01 \
//!     RUST_LOG=debug cargo run -p versioned-service
//! ```

use apiver_core::config::{load_dotenv, VersionConfig};
use apiver_core::API_VERSION_HEADER;
use apiver_router::{RouteGroup, VersionedRouter};
use http::{HeaderMap, HeaderValue, Method};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Handler = fn(&HashMap<String, String>) -> Value;

fn get_user_v1(params: &HashMap<String, String>) -> Value {
    json!({ "id": params.get("id"), "name": "Ada Lovelace" })
}

fn get_user_v2(params: &HashMap<String, String>) -> Value {
    json!({
        "id": params.get("id"),
        "name": { "given": "Ada", "family": "Lovelace" },
    })
}

fn list_orders(_: &HashMap<String, String>) -> Value {
    json!({ "orders": [] })
}

fn health(_: &HashMap<String, String>) -> Value {
    json!({ "status": "ok" })
}

fn built_in_config() -> VersionConfig {
    VersionConfig {
        versions: vec!["2023-01-01".to_string(), "2024-01-01".to_string()],
        default: Some("2024-01-01".to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,apiver_core=debug,apiver_router=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    load_dotenv();
    let config = VersionConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "no version configuration in environment, using built-in list");
        built_in_config()
    });
    let registry = Arc::new(config.into_registry()?);

    let router: VersionedRouter<Handler> = VersionedRouter::new(registry)
        .route(Method::GET, "/users/{id}", ["2023-01-01"], get_user_v1 as Handler)
        .route(Method::GET, "/users/{id}", ["2024-01-01"], get_user_v2 as Handler)
        .nest(
            RouteGroup::new("/orders")
                .versions(["2024-01-01"])
                .route(Method::GET, "/", Vec::<&str>::new(), list_orders as Handler),
        )
        .unversioned(Method::GET, "/health", health as Handler);

    let requests = [
        (Method::GET, "/users/7", Some("2023-06-15")),
        (Method::GET, "/users/7", Some("2024-02-01")),
        (Method::GET, "/users/7", None),
        (Method::GET, "/orders", Some("2023-06-15")),
        (Method::DELETE, "/users/7", None),
        (Method::GET, "/health", Some("garbage")),
    ];

    for (method, path, token) in requests {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(API_VERSION_HEADER, HeaderValue::from_str(token)?);
        }

        match router.select(&method, path, &headers) {
            Ok(matched) => {
                let body = (matched.handler)(&matched.params);
                tracing::info!(
                    %method,
                    path,
                    requested = token.unwrap_or("-"),
                    served = %matched.version.map(|v| v.to_string()).unwrap_or_default(),
                    %body,
                    "200 OK"
                );
            }
            Err(err) => {
                tracing::info!(
                    %method,
                    path,
                    requested = token.unwrap_or("-"),
                    status = err.status_code().as_u16(),
                    body = %err.to_json(),
                    "request rejected"
                );
            }
        }
    }

    Ok(())
}
