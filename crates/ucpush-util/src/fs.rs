//! Filesystem checks and artifact file selection.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::UtilError;

/// Include pattern applied when the caller gives none.
pub const DEFAULT_INCLUDE: &str = "**/*";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectedFile {
    /// Path relative to the base directory, always `/`-separated.
    pub relative: String,
    /// Absolute (or base-joined) path on disk.
    pub path: PathBuf,
}

/// Verify that `base` exists and has at least one top-level entry.
///
/// The check is not recursive: a directory holding only an empty
/// subdirectory passes.
///
/// # Errors
/// Returns `BaseDirMissing`, `BaseDirNotDirectory`, or `BaseDirEmpty` naming the
/// absolute path, or `Io` if the directory cannot be listed.
pub fn check_base_dir(base: &Path) -> Result<(), UtilError> {
    let shown = absolute_display(base);
    if !base.exists() {
        return Err(UtilError::BaseDirMissing { path: shown });
    }
    if !base.is_dir() {
        return Err(UtilError::BaseDirNotDirectory { path: shown });
    }

    let mut entries = std::fs::read_dir(base).map_err(|source| UtilError::Io {
        path: shown.clone(),
        source,
    })?;
    if entries.next().is_none() {
        return Err(UtilError::BaseDirEmpty { path: shown });
    }
    Ok(())
}

/// Select files under `base` matching any of `includes` and none of `excludes`.
///
/// Patterns are matched against the `/`-separated path relative to `base`.
/// An empty include list means [`DEFAULT_INCLUDE`]. Results are sorted by relative path.
///
/// # Errors
/// Returns an error if a pattern is not a valid glob or a directory cannot be read.
pub fn select_files(
    base: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<Vec<SelectedFile>, UtilError> {
    let includes = if includes.is_empty() {
        vec![compile(DEFAULT_INCLUDE)?]
    } else {
        includes
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?
    };
    let excludes = excludes
        .iter()
        .map(|p| compile(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut all = Vec::new();
    walk(base, base, &mut all)?;

    let mut selected: Vec<SelectedFile> = all
        .into_iter()
        .filter(|f| {
            includes
                .iter()
                .any(|p| p.matches_with(&f.relative, MATCH_OPTIONS))
                && !excludes
                    .iter()
                    .any(|p| p.matches_with(&f.relative, MATCH_OPTIONS))
        })
        .collect();
    selected.sort();
    Ok(selected)
}

/// Write `contents` to `dest` through a sibling temp file and a rename.
///
/// # Errors
/// Returns an error if the temp file cannot be written or renamed into place.
pub fn write_atomic(dest: &Path, contents: &[u8]) -> Result<(), UtilError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| UtilError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ucpush");
    let tmp_name = format!(".tmp-{file_name}-{}", std::process::id());
    let tmp_path = dest.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents).map_err(|source| UtilError::Io {
        path: tmp_path.display().to_string(),
        source,
    })?;
    if let Err(source) = std::fs::rename(&tmp_path, dest) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(UtilError::Io {
            path: dest.display().to_string(),
            source,
        });
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Pattern, UtilError> {
    Pattern::new(pattern).map_err(|e| UtilError::GlobPattern {
        pattern: pattern.to_owned(),
        message: e.to_string(),
    })
}

fn walk(base: &Path, dir: &Path, out: &mut Vec<SelectedFile>) -> Result<(), UtilError> {
    let entries = std::fs::read_dir(dir).map_err(|source| UtilError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| UtilError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk(base, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            let relative = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push(SelectedFile { relative, path });
        }
    }

    Ok(())
}

fn absolute_display(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
