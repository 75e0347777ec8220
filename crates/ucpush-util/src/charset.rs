//! Charset resolution for text artifacts.

use std::fmt;

use encoding_rs::Encoding;

use crate::error::UtilError;

/// A resolved text charset, sent to the server alongside uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    /// Resolve an optional charset label.
    ///
    /// A missing or blank label yields the platform default (UTF-8). Labels
    /// follow the WHATWG encoding registry, so `latin1`, `ISO-8859-1`, and
    /// `windows-1252` all name the same charset.
    ///
    /// # Errors
    /// Returns `UtilError::UnsupportedCharset` if the label is not recognized.
    pub fn resolve(label: Option<&str>) -> Result<Self, UtilError> {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            None => Ok(Self::default()),
            Some(l) => Encoding::for_label(l.as_bytes())
                .map(Self)
                .ok_or_else(|| UtilError::UnsupportedCharset {
                    label: l.to_owned(),
                }),
        }
    }

    /// Canonical charset name, e.g. `"UTF-8"`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
