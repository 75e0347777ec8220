//! Capability traits, one per remote resource.
//!
//! The engine is written against these traits; `HttpClient` implements all of
//! them, and tests substitute in-memory fakes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ucpush_util::fs::SelectedFile;
use ucpush_util::Charset;
use uuid::Uuid;

use crate::error::ClientError;

/// Component-level operations.
pub trait ComponentApi {
    /// Whether a component with this name exists.
    ///
    /// # Errors
    /// Returns an error if the lookup itself fails.
    fn component_exists(&self, component: &str) -> Result<bool, ClientError>;

    /// Create a component, returning its server-assigned id.
    ///
    /// # Errors
    /// Returns an error if the server rejects the component.
    fn create_component(&self, component: &NewComponent) -> Result<String, ClientError>;

    /// Apply a tag to a component.
    ///
    /// # Errors
    /// Returns an error if the tag cannot be applied.
    fn add_tag(&self, component: &str, tag: &str) -> Result<(), ClientError>;

    /// The property-sheet definition holding the component's version properties.
    ///
    /// # Errors
    /// Returns an error if the definition cannot be fetched or parsed.
    fn version_prop_sheet_def(&self, component: &str) -> Result<PropSheetDef, ClientError>;

    /// Attach a named link to a component version.
    ///
    /// # Errors
    /// Returns an error if the link cannot be added.
    fn add_version_link(
        &self,
        component: &str,
        version: &str,
        link_name: &str,
        link_url: &str,
    ) -> Result<(), ClientError>;

    /// Ask the server to import new versions from the component's source config.
    ///
    /// # Errors
    /// Returns an error if the import cannot be triggered.
    fn import_versions(
        &self,
        component: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), ClientError>;
}

/// Version-level operations.
pub trait VersionApi {
    /// Create a version and upload its files as a single operation.
    ///
    /// # Errors
    /// Returns an error if the version cannot be created or the upload fails.
    fn create_version_with_files(
        &self,
        component: &str,
        version: &str,
        description: &str,
        files: &VersionFiles<'_>,
    ) -> Result<Uuid, ClientError>;

    /// Add files to a version that already exists.
    ///
    /// # Errors
    /// Returns an error if the upload fails.
    fn add_version_files(
        &self,
        component: &str,
        version: &str,
        files: &VersionFiles<'_>,
    ) -> Result<(), ClientError>;

    /// Set one property value on a version.
    ///
    /// # Errors
    /// Returns an error if the value cannot be set.
    fn set_version_property(
        &self,
        component: &str,
        version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError>;
}

/// Property-sheet operations.
pub trait PropertyApi {
    /// The property definitions currently on a sheet.
    ///
    /// # Errors
    /// Returns an error if the list cannot be fetched or parsed.
    fn prop_defs(&self, sheet_path: &str) -> Result<Vec<PropDef>, ClientError>;

    /// Add a property definition to a sheet.
    ///
    /// # Errors
    /// Returns an error if the definition cannot be created.
    fn create_prop_def(&self, sheet: &PropSheetDef, def: &NewPropDef) -> Result<(), ClientError>;
}

/// Files selected for a version upload, with their text handling.
#[derive(Debug, Clone)]
pub struct VersionFiles<'a> {
    pub files: &'a [SelectedFile],
    pub charset: Charset,
    /// Extensions of files the server should decode with `charset`.
    pub text_extensions: &'a [String],
}

/// A component to create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_config_plugin: Option<String>,
    pub import_automatically: bool,
    pub default_version_type: String,
    pub properties: BTreeMap<String, String>,
}

/// Identifies a property sheet definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropSheetDef {
    pub id: String,
    pub path: String,
}

/// An existing property definition; only the name matters here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropDef {
    pub name: String,
}

/// A property definition to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPropDef {
    pub name: String,
    pub description: String,
    pub label: String,
    pub required: bool,
    pub prop_type: String,
    pub default_value: String,
}

impl NewPropDef {
    /// An optional text property with no description, label, or default.
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: String::new(),
            label: String::new(),
            required: false,
            prop_type: "TEXT".to_owned(),
            default_value: String::new(),
        }
    }
}
