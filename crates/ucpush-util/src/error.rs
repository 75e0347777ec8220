//! Error types for ucpush-util.

/// Errors produced by utility functions.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// An I/O operation failed.
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The artifact base directory is missing.
    #[error("base artifact directory {path} does not exist")]
    BaseDirMissing { path: String },

    /// The artifact base directory has no entries.
    #[error("base artifact directory {path} does not contain any files to upload — place files there before publishing")]
    BaseDirEmpty { path: String },

    /// The artifact base path is a file, not a directory.
    #[error("base artifact path {path} is not a directory")]
    BaseDirNotDirectory { path: String },

    /// A glob pattern was invalid.
    #[error("invalid glob pattern `{pattern}`: {message}")]
    GlobPattern { pattern: String, message: String },

    /// The requested charset label is not a known encoding.
    #[error("unsupported charset `{label}`")]
    UnsupportedCharset { label: String },

    /// Building the upload archive failed.
    #[error("cannot archive {path}: {source}")]
    Archive {
        path: String,
        source: std::io::Error,
    },
}
