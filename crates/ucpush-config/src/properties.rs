//! `name=value` property lists.

use std::collections::BTreeMap;

/// Parse newline-separated `name=value` lines into a map.
///
/// Keys and values are trimmed and blank lines skipped. The split happens at the
/// first `=`, so values may themselves contain `=`. A line without `=` maps its
/// key to an empty value; a line with an empty key is ignored. Later lines win
/// over earlier ones with the same key.
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (key, value) = line.split_once('=').unwrap_or((line, ""));
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_owned(), value.trim().to_owned()))
        })
        .collect()
}
