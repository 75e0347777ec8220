//! Best-effort side-channel for exporting values to later build steps.

use std::path::{Path, PathBuf};

use ucpush_util::UtilError;

/// A store of environment-style key/value pairs shared with the build runtime.
pub trait EnvStore {
    /// Record `key=value`, replacing any earlier value.
    ///
    /// # Errors
    /// Returns an error if the store cannot be updated.
    fn put(&mut self, key: &str, value: &str) -> Result<(), UtilError>;
}

/// `KEY=VALUE` lines in a file, rewritten atomically on every `put`.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EnvStore for EnvFile {
    fn put(&mut self, key: &str, value: &str) -> Result<(), UtilError> {
        let key = key.replace(' ', "_");
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(UtilError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let mut lines: Vec<String> = existing
            .lines()
            .filter(|line| line.split_once('=').map(|(k, _)| k.trim()) != Some(key.as_str()))
            .map(str::to_owned)
            .collect();
        lines.push(format!("{key}={value}"));

        let mut content = lines.join("\n");
        content.push('\n');
        ucpush_util::fs::write_atomic(&self.path, content.as_bytes())
    }
}
