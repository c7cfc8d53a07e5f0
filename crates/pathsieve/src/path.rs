//! Path syntax shared by traversal and rules.
//!
//! A path is a sequence of segments, each introduced by [`SEPARATOR`]. A
//! segment naming an array container carries the [`ARRAY_MARKER`] suffix, so
//! `.friends[].name` is the `name` field of every object held by the
//! `friends` array. The root of the document is [`ROOT`].

use crate::error::{Error, Result};

/// Separator introducing every path segment.
pub const SEPARATOR: char = '.';

/// Separator accepted as an alias of [`SEPARATOR`] in rule strings.
pub const ALT_SEPARATOR: char = '/';

/// Suffix marking a segment as an array container.
pub const ARRAY_MARKER: &str = "[]";

/// Path of the document root.
pub const ROOT: &str = ".";

/// Normalize a caller-supplied rule string into the traversal path form.
///
/// `/` is accepted in place of `.`, the leading separator is optional,
/// trailing separators are dropped, and an empty rule becomes [`ROOT`].
///
/// # Errors
///
/// Returns [`Error::InvalidRule`] if a segment is empty or carries brackets
/// anywhere other than a single trailing `[]`.
pub fn normalize_rule(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let unified: String = trimmed
        .chars()
        .map(|c| if c == ALT_SEPARATOR { SEPARATOR } else { c })
        .collect();

    let body = unified.strip_prefix(SEPARATOR).unwrap_or(&unified);
    let body = body.trim_end_matches(SEPARATOR);
    if body.is_empty() {
        return Ok(ROOT.to_string());
    }

    let mut normalized = String::with_capacity(body.len() + 1);
    for segment in body.split(SEPARATOR) {
        validate_segment(raw, segment)?;
        normalized.push(SEPARATOR);
        normalized.push_str(segment);
    }
    Ok(normalized)
}

fn validate_segment(raw: &str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::invalid_rule(raw, "empty path segment"));
    }
    let name = segment.strip_suffix(ARRAY_MARKER).unwrap_or(segment);
    if name.contains(['[', ']']) {
        return Err(Error::invalid_rule(
            raw,
            format!("unexpected bracket in segment '{segment}'"),
        ));
    }
    Ok(())
}

/// Check whether `path` is the document root.
#[must_use]
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dotted() {
        assert_eq!(normalize_rule("a.b.c").unwrap(), ".a.b.c");
        assert_eq!(normalize_rule(".a.b").unwrap(), ".a.b");
    }

    #[test]
    fn test_normalize_slashes() {
        assert_eq!(normalize_rule("/a/b").unwrap(), ".a.b");
        assert_eq!(normalize_rule("a/b.c").unwrap(), ".a.b.c");
    }

    #[test]
    fn test_normalize_array_marker() {
        assert_eq!(normalize_rule("items[].id").unwrap(), ".items[].id");
        assert_eq!(normalize_rule("[].id").unwrap(), ".[].id");
        assert_eq!(normalize_rule("matrix[].[]").unwrap(), ".matrix[].[]");
    }

    #[test]
    fn test_normalize_empty_is_root() {
        assert_eq!(normalize_rule("").unwrap(), ROOT);
        assert_eq!(normalize_rule("  ").unwrap(), ROOT);
        assert_eq!(normalize_rule(".").unwrap(), ROOT);
        assert_eq!(normalize_rule("/").unwrap(), ROOT);
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_rule(" a.b. ").unwrap(), ".a.b");
        assert_eq!(normalize_rule("a/b/").unwrap(), ".a.b");
    }

    #[test]
    fn test_empty_segment_rejected() {
        let err = normalize_rule("a..b").unwrap_err();
        assert!(err.to_string().contains("empty path segment"));
    }

    #[test]
    fn test_misplaced_brackets_rejected() {
        assert!(normalize_rule("a[0].b").is_err());
        assert!(normalize_rule("a[][]").is_err());
        assert!(normalize_rule("a]").is_err());
    }

    #[test]
    fn test_is_root() {
        assert!(is_root("."));
        assert!(!is_root(".a"));
        assert!(!is_root(""));
    }
}
