#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Shared utilities for the ported-object model compiler

pub mod error;
pub mod stack;

/// Separator between path segments in qualified names, such as `model.child.port`.
pub const HIERARCHY_SEPARATOR: char = '.';

/// Joins path segments into a qualified path using [`HIERARCHY_SEPARATOR`].
///
/// Empty segments are skipped, so a root scope with no name does not
/// produce a leading separator.
///
/// # Example
///
/// ```rust
/// use ported_shared::qualified_path;
///
/// assert_eq!(qualified_path(["model", "f", "a"]), "model.f.a");
/// assert_eq!(qualified_path(["", "f", "a"]), "f.a");
/// ```
#[must_use]
pub fn qualified_path<S: AsRef<str>>(segments: impl IntoIterator<Item = S>) -> String {
    let mut path = String::new();

    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }

        if !path.is_empty() {
            path.push(HIERARCHY_SEPARATOR);
        }
        path.push_str(segment);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_path_joins_segments() {
        assert_eq!(qualified_path(["a", "b", "c"]), "a.b.c");
    }

    #[test]
    fn qualified_path_skips_empty_segments() {
        assert_eq!(qualified_path(["", "b", "", "c"]), "b.c");
        assert_eq!(qualified_path::<&str>([]), "");
    }
}
