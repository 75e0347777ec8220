#![forbid(unsafe_code)]
//! Filesystem checks, file selection, pattern lists, charsets, and upload archives for ucpush.

pub mod archive;
pub mod charset;
pub mod error;
pub mod fs;
pub mod patterns;

pub use charset::Charset;
pub use error::UtilError;
pub use patterns::split_patterns;
