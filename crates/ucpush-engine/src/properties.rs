//! Reconcile desired version properties against the component's property sheet.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;
use ucpush_client::{ClientError, NewPropDef, PropDef};

use crate::error::EngineError;
use crate::remote::Remote;

/// Which names were set on existing definitions and which needed new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub updated: Vec<String>,
    pub created: Vec<String>,
}

/// Desired properties split by whether the sheet already defines them.
///
/// Borrowed views over the caller's map; the map itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    /// Names with an existing definition, in sheet order.
    pub update: Vec<(&'a str, &'a str)>,
    /// Names with no definition yet, in map order.
    pub create: Vec<(&'a str, &'a str)>,
}

/// Split `desired` into the update and create sets against `existing`.
pub fn partition<'a>(desired: &'a BTreeMap<String, String>, existing: &[PropDef]) -> Partition<'a> {
    let mut matched = BTreeSet::new();
    let mut update = Vec::new();
    for def in existing {
        if let Some((name, value)) = desired.get_key_value(def.name.as_str()) {
            if matched.insert(name.as_str()) {
                update.push((name.as_str(), value.as_str()));
            }
        }
    }

    let create = desired
        .iter()
        .filter(|(name, _)| !matched.contains(name.as_str()))
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    Partition { update, create }
}

/// Make every entry of `desired` a version-scoped property value on the server.
///
/// Existing definitions are updated first; then each remaining name gets a new
/// text definition followed by its value. Nothing is rolled back on failure.
///
/// # Errors
/// Returns the first remote failure, classified by which step it hit.
pub fn reconcile_properties(
    remote: Remote<'_>,
    component: &str,
    version: &str,
    desired: &BTreeMap<String, String>,
) -> Result<ReconcileSummary, EngineError> {
    if desired.is_empty() {
        return Ok(ReconcileSummary::default());
    }

    let sheet_error = |source: ClientError| {
        if source.is_transport() {
            EngineError::PropertySheetFetch { source }
        } else {
            EngineError::PropertySheetParse { source }
        }
    };
    let sheet = remote
        .components
        .version_prop_sheet_def(component)
        .map_err(sheet_error)?;
    let existing = remote.properties.prop_defs(&sheet.path).map_err(sheet_error)?;

    let plan = partition(desired, &existing);
    let mut summary = ReconcileSummary::default();

    for (name, value) in plan.update {
        info!(component, version, property = name, value, "updating version property");
        remote
            .versions
            .set_version_property(component, version, name, value)
            .map_err(|source| EngineError::PropertyUpdate {
                name: name.to_owned(),
                source,
            })?;
        summary.updated.push(name.to_owned());
    }

    for (name, value) in plan.create {
        let create_error = |source: ClientError| {
            if source.is_transport() {
                EngineError::PropertyCreate {
                    name: name.to_owned(),
                    source,
                }
            } else {
                EngineError::PropertyDefinition {
                    name: name.to_owned(),
                    source,
                }
            }
        };

        info!(component, property = name, "creating property definition");
        remote
            .properties
            .create_prop_def(&sheet, &NewPropDef::text(name))
            .map_err(create_error)?;
        info!(component, version, property = name, value, "setting version property");
        remote
            .versions
            .set_version_property(component, version, name, value)
            .map_err(create_error)?;
        summary.created.push(name.to_owned());
    }

    Ok(summary)
}
