//! Error and warning types for ucpush-engine.

use ucpush_client::ClientError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The component name was empty after expansion.
    #[error("component name is required")]
    MissingComponentName,

    /// The version name is empty or too long.
    #[error("cannot create version '{version}': version name length must be between 1 and 255 characters (current length: {length})")]
    InvalidVersionName { version: String, length: usize },

    /// The delivery type is neither Push nor Pull.
    #[error("invalid delivery type '{value}' — expected Push or Pull")]
    InvalidDeliveryType { value: String },

    /// Push delivery needs a link name and URL to record against the version.
    #[error("result link name and URL are required for push delivery — pass --link-name/--link-url or set [link]")]
    MissingLink,

    /// A local check failed (base directory, charset, glob, archive).
    #[error("{0}")]
    Util(#[from] ucpush_util::UtilError),

    /// Component creation failed.
    #[error("cannot create component '{component}': {source}")]
    ComponentCreate {
        component: String,
        source: ClientError,
    },

    /// Tagging the component failed.
    #[error("cannot tag component '{component}' with '{tag}': {source}")]
    ComponentTag {
        component: String,
        tag: String,
        source: ClientError,
    },

    /// Creating the version or uploading its files failed.
    #[error("failed to create component version and upload files: {source}")]
    Upload { source: ClientError },

    /// Adding files to an existing version failed.
    #[error("failed to upload files to version '{version}' of component '{component}': {source}")]
    AddFiles {
        component: String,
        version: String,
        source: ClientError,
    },

    /// The property sheet or its definitions could not be fetched.
    #[error("an error occurred acquiring property sheets: {source}")]
    PropertySheetFetch { source: ClientError },

    /// The property sheet or its definitions came back malformed.
    #[error("an error occurred processing the version property sheet: {source}")]
    PropertySheetParse { source: ClientError },

    /// Setting an existing property's value failed.
    #[error("an error occurred updating version property '{name}': {source}")]
    PropertyUpdate { name: String, source: ClientError },

    /// Creating a property definition or setting its first value failed.
    #[error("an error occurred setting version property '{name}': {source}")]
    PropertyCreate { name: String, source: ClientError },

    /// The server returned something unexpected while creating a property definition.
    #[error("an error occurred processing the property definition for '{name}': {source}")]
    PropertyDefinition { name: String, source: ClientError },

    /// Attaching the result link failed.
    #[error("failed to add a version link: {source}")]
    Link { source: ClientError },

    /// The import trigger could not reach the server or was refused.
    #[error("an error occurred while importing component versions on component '{component}': {source}")]
    ImportTransport {
        component: String,
        source: ClientError,
    },

    /// The import request or its response was malformed.
    #[error("an error occurred while creating JSON version import object: {source}")]
    ImportPayload { source: ClientError },
}

/// Problems that are reported but never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// The created version id could not be stored in the environment file.
    #[error("failed to set version id as environment variable {key}: {message}")]
    VersionIdNotRecorded { key: String, message: String },
}
