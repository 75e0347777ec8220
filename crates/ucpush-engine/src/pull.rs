//! Pull delivery: ask the server to import a version from its own source.

use std::collections::BTreeMap;

use tracing::info;
use ucpush_client::ComponentApi;

use crate::error::EngineError;

/// Trigger a version import on `component`, passing `properties` as import parameters.
///
/// # Errors
/// Returns `EngineError::ImportTransport` if the server cannot be reached or
/// refuses, and `EngineError::ImportPayload` if the request or reply is malformed.
pub fn trigger_import(
    components: &dyn ComponentApi,
    component: &str,
    properties: &BTreeMap<String, String>,
) -> Result<(), EngineError> {
    info!(component, ?properties, "importing component versions");
    components
        .import_versions(component, properties)
        .map_err(|source| {
            if source.is_transport() {
                EngineError::ImportTransport {
                    component: component.to_owned(),
                    source,
                }
            } else {
                EngineError::ImportPayload { source }
            }
        })
}
