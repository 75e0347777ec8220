//! In-memory gzip-compressed tar archives for version uploads.

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::UtilError;
use crate::fs::SelectedFile;

/// Pack `files` into a `.tar.gz` held in memory, keyed by their relative paths.
///
/// # Errors
/// Returns an error if a file cannot be read or the archive cannot be finalized.
pub fn pack_tar_gz(files: &[SelectedFile]) -> Result<Vec<u8>, UtilError> {
    let gz = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(gz);

    for file in files {
        builder
            .append_path_with_name(&file.path, &file.relative)
            .map_err(|source| UtilError::Archive {
                path: file.path.display().to_string(),
                source,
            })?;
    }

    let gz = builder.into_inner().map_err(|source| UtilError::Archive {
        path: "<archive>".to_owned(),
        source,
    })?;
    gz.finish().map_err(|source| UtilError::Archive {
        path: "<archive>".to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::io::Read;

    use super::*;
    use crate::fs::select_files;

    #[test]
    fn archive_keeps_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("app.jar"), b"app").unwrap();
        fs::write(tmp.path().join("lib").join("dep.jar"), b"dep").unwrap();
        let files = select_files(tmp.path(), &[], &[]).unwrap();

        let bytes = pack_tar_gz(&files).unwrap();

        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(bytes.as_slice()));
        let mut seen = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().display().to_string();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            seen.push((name, body));
        }
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("app.jar".to_owned(), "app".to_owned()),
                ("lib/dep.jar".to_owned(), "dep".to_owned()),
            ]
        );
    }

    #[test]
    fn archive_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let files = vec![SelectedFile {
            relative: "gone.txt".to_owned(),
            path: tmp.path().join("gone.txt"),
        }];
        let err = pack_tar_gz(&files).unwrap_err();
        assert!(matches!(err, UtilError::Archive { .. }));
    }
}
