//! Newline-separated pattern lists.

/// Split a newline-separated list into trimmed, non-blank entries.
///
/// Order is preserved and duplicates are kept. Used for include and exclude
/// globs as well as text-file extension lists.
pub fn split_patterns(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}
