use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::server::ServerSection;

/// A ucpush request file: one version to publish, plus optional server and link settings.
///
/// String fields are stored as written; `$VAR` placeholders are expanded by the
/// engine at run time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub server: Option<ServerSection>,
    pub version: VersionBlock,
    #[serde(default)]
    pub link: Option<LinkBlock>,
}

/// The component version to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionBlock {
    pub component: String,
    #[serde(default)]
    pub tag: String,
    /// Present when the component should be created if it does not exist.
    #[serde(default)]
    pub create_component: Option<CreateComponentBlock>,
    pub delivery: DeliveryBlock,
}

/// How the version's content reaches the server.
///
/// `delivery_type` is kept as a raw string so an unrecognized value is reported
/// by the engine, naming the value, rather than rejected as a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryBlock {
    #[serde(rename = "type")]
    pub delivery_type: String,
    /// Version name (push only).
    #[serde(default)]
    pub version: String,
    /// Directory holding the files to upload (push only).
    #[serde(default)]
    pub base_dir: String,
    /// Newline-separated include globs (push only).
    #[serde(default)]
    pub include: String,
    /// Newline-separated exclude globs (push only).
    #[serde(default)]
    pub exclude: String,
    /// Newline-separated extensions of files the server should treat as text (push only).
    #[serde(default)]
    pub extensions: String,
    /// Charset of the text files (push only). Blank means UTF-8.
    #[serde(default)]
    pub charset: String,
    /// Version description (push only).
    #[serde(default)]
    pub description: String,
    /// `name=value` lines: version properties for push, import parameters for pull.
    #[serde(default)]
    pub properties: String,
}

/// Settings for creating a missing component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateComponentBlock {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub template_version: String,
    /// Source-config plugin the server uses to import pulled versions.
    #[serde(default)]
    pub source_config_plugin: String,
    /// `name=value` lines configuring the source-config plugin.
    #[serde(default)]
    pub source_properties: String,
    #[serde(default)]
    pub import_automatically: bool,
    #[serde(default)]
    pub default_version_type: VersionType,
}

/// Default type of versions created on a new component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VersionType {
    #[default]
    Full,
    Incremental,
}

impl VersionType {
    /// The server's name for this version type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Incremental => "INCREMENTAL",
        }
    }
}

/// Link recorded against a pushed version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkBlock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl PublishRequest {
    /// Read and parse a request file from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_path(path: &Path) -> Result<Self, RequestError> {
        let content = std::fs::read_to_string(path).map_err(|e| RequestError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let request: PublishRequest = toml::from_str(&content).map_err(|e| RequestError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(request)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid request file at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    fn write(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publish.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_push_request() {
        let (_dir, path) = write(
            r#"
[server]
url = "https://ucd.example.com:8443"
user = "ci"

[version]
component = "svc-a"
tag = "nightly"

[version.delivery]
type = "Push"
version = "1.0.${BUILD_NUMBER}"
base_dir = "build/dist"
include = """
**/*.jar
conf/**
"""
properties = "build=42"

[link]
name = "Jenkins Job"
url = "${BUILD_URL}"
"#,
        );

        let request = PublishRequest::from_path(&path).unwrap();
        assert_eq!(request.version.component, "svc-a");
        assert_eq!(request.version.tag, "nightly");
        assert!(request.version.create_component.is_none());
        assert_eq!(request.version.delivery.delivery_type, "Push");
        assert_eq!(request.version.delivery.version, "1.0.${BUILD_NUMBER}");
        assert!(request.version.delivery.include.contains("conf/**"));
        assert_eq!(request.version.delivery.exclude, "");
        let server = request.server.unwrap();
        assert_eq!(server.url.as_deref(), Some("https://ucd.example.com:8443"));
        assert_eq!(request.link.unwrap().name, "Jenkins Job");
    }

    #[test]
    fn parses_pull_request_with_create_component() {
        let (_dir, path) = write(
            r#"
[version]
component = "svc-b"

[version.create_component]
source_config_plugin = "Git"
source_properties = "repoUrl=https://git.example.com/svc-b.git"
import_automatically = true
default_version_type = "INCREMENTAL"

[version.delivery]
type = "Pull"
properties = "env=qa"
"#,
        );

        let request = PublishRequest::from_path(&path).unwrap();
        let create = request.version.create_component.unwrap();
        assert_eq!(create.source_config_plugin, "Git");
        assert!(create.import_automatically);
        assert_eq!(create.default_version_type, VersionType::Incremental);
        assert_eq!(request.version.tag, "");
        assert_eq!(request.version.delivery.properties, "env=qa");
    }

    #[test]
    fn unknown_delivery_type_still_parses() {
        let (_dir, path) = write(
            r#"
[version]
component = "svc-c"

[version.delivery]
type = "Carrier-Pigeon"
"#,
        );
        let request = PublishRequest::from_path(&path).unwrap();
        assert_eq!(request.version.delivery.delivery_type, "Carrier-Pigeon");
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = PublishRequest::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"), "error was: {err}");
    }

    #[test]
    fn missing_version_table_is_parse_error() {
        let (_dir, path) = write("[link]\nname = \"x\"\n");
        let err = PublishRequest::from_path(&path).unwrap_err();
        assert!(matches!(err, RequestError::Parse { .. }));
    }

    #[test]
    fn version_type_names() {
        assert_eq!(VersionType::Full.as_str(), "FULL");
        assert_eq!(VersionType::Incremental.as_str(), "INCREMENTAL");
    }
}
