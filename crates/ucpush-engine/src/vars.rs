//! `$VAR` expansion for request strings.

use std::collections::BTreeMap;

/// Named values substituted into request strings.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// An empty set: expansion leaves every placeholder untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the process environment. Pairs that are not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        let values = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { values }
    }

    /// Add or replace a value.
    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_owned(), value.to_owned());
    }

    /// Builder form of [`Variables::set`].
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Substitute `$NAME` and `${NAME}`. Unknown names are left as written.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name| self.values.get(name)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn from_env_skips_non_utf8_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("UCPUSH_VARS_NON_UTF8", OsStr::from_bytes(b"\xff\xfe"));
        std::env::set_var("UCPUSH_VARS_PLAIN", "ok");
        let vars = Variables::from_env();
        std::env::remove_var("UCPUSH_VARS_NON_UTF8");
        std::env::remove_var("UCPUSH_VARS_PLAIN");

        assert_eq!(vars.get("UCPUSH_VARS_NON_UTF8"), None);
        assert_eq!(vars.get("UCPUSH_VARS_PLAIN"), Some("ok"));
    }

    #[test]
    fn expands_both_forms() {
        let vars = Variables::new()
            .with("BUILD_NUMBER", "42")
            .with("JOB", "svc-a");
        assert_eq!(vars.expand("1.0.$BUILD_NUMBER"), "1.0.42");
        assert_eq!(vars.expand("${JOB}-${BUILD_NUMBER}"), "svc-a-42");
    }

    #[test]
    fn unknown_left_intact() {
        let vars = Variables::new();
        assert_eq!(vars.expand("dist/${MISSING}/x"), "dist/${MISSING}/x");
        assert_eq!(vars.expand("$MISSING"), "$MISSING");
    }

    #[test]
    fn plain_text_unchanged() {
        let vars = Variables::new().with("A", "1");
        assert_eq!(vars.expand("no placeholders"), "no placeholders");
    }

    #[test]
    fn later_set_wins() {
        let mut vars = Variables::new().with("ENV", "dev");
        vars.set("ENV", "qa");
        assert_eq!(vars.get("ENV"), Some("qa"));
    }
}
