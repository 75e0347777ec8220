//! Push delivery: validate a local artifact directory and upload it as a new version.

use std::path::{Path, PathBuf};

use tracing::info;
use ucpush_client::{VersionApi, VersionFiles};
use ucpush_util::fs::{check_base_dir, select_files, SelectedFile};
use ucpush_util::Charset;
use uuid::Uuid;

use crate::error::EngineError;

/// Longest version name the server accepts.
pub const MAX_VERSION_NAME_LEN: usize = 255;

/// A push request with every string already expanded.
#[derive(Debug, Clone, Default)]
pub struct PushRequest {
    pub component: String,
    pub version: String,
    pub description: String,
    pub base_dir: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub extensions: Vec<String>,
    /// Blank means the platform default.
    pub charset: String,
}

/// A validated push, ready to upload.
#[derive(Debug, Clone)]
pub struct PushPlan {
    pub component: String,
    pub version: String,
    pub description: String,
    pub files: Vec<SelectedFile>,
    pub charset: Charset,
    pub extensions: Vec<String>,
}

impl PushPlan {
    fn version_files(&self) -> VersionFiles<'_> {
        VersionFiles {
            files: &self.files,
            charset: self.charset,
            text_extensions: &self.extensions,
        }
    }
}

/// Check that a version name is between 1 and 255 characters.
///
/// # Errors
/// Returns `EngineError::InvalidVersionName` with the current length otherwise.
pub fn validate_version_name(version: &str) -> Result<(), EngineError> {
    let length = version.chars().count();
    if length == 0 || length > MAX_VERSION_NAME_LEN {
        return Err(EngineError::InvalidVersionName {
            version: version.to_owned(),
            length,
        });
    }
    Ok(())
}

/// Run every local check for a push without touching the network.
///
/// # Errors
/// Returns an error if the version name is invalid, the base directory is
/// missing or empty, the charset is unknown, or a pattern is not a valid glob.
pub fn plan_push(request: &PushRequest) -> Result<PushPlan, EngineError> {
    validate_version_name(&request.version)?;
    check_base_dir(&request.base_dir)?;

    let charset = Charset::resolve(Some(&request.charset))?;
    if !request.charset.trim().is_empty() {
        info!(requested = %request.charset, resolved = %charset, "using charset");
    }

    let files = select_files(&request.base_dir, &request.includes, &request.excludes)?;

    Ok(PushPlan {
        component: request.component.clone(),
        version: request.version.clone(),
        description: request.description.clone(),
        files,
        charset,
        extensions: request.extensions.clone(),
    })
}

/// Create the planned version and upload its files in one remote operation.
///
/// # Errors
/// Returns `EngineError::Upload` if the server call fails.
pub fn publish_version(versions: &dyn VersionApi, plan: &PushPlan) -> Result<Uuid, EngineError> {
    info!(
        component = %plan.component,
        version = %plan.version,
        files = plan.files.len(),
        "creating component version and uploading files"
    );
    let id = versions
        .create_version_with_files(
            &plan.component,
            &plan.version,
            &plan.description,
            &plan.version_files(),
        )
        .map_err(|source| EngineError::Upload { source })?;
    info!(component = %plan.component, version = %plan.version, %id, "created component version");
    Ok(id)
}

/// Add files under `base_dir` to a version that already exists.
///
/// Returns the number of files uploaded.
///
/// # Errors
/// Returns an error if the base directory is missing or empty, a pattern is
/// invalid, or the upload fails.
pub fn upload_version_files(
    versions: &dyn VersionApi,
    component: &str,
    version: &str,
    base_dir: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<usize, EngineError> {
    check_base_dir(base_dir)?;
    let files = select_files(base_dir, includes, excludes)?;

    info!(component, version, files = files.len(), "uploading files to existing version");
    versions
        .add_version_files(
            component,
            version,
            &VersionFiles {
                files: &files,
                charset: Charset::default(),
                text_extensions: &[],
            },
        )
        .map_err(|source| EngineError::AddFiles {
            component: component.to_owned(),
            version: version.to_owned(),
            source,
        })?;
    Ok(files.len())
}
