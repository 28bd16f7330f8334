//! String-level helpers shared by [`Path`](crate::Path) and the file wrappers.
//!
//! All functions work on `/`-separated pathnames as plain strings and never
//! touch the host filesystem.

use std::sync::LazyLock;

use regex::Regex;

pub const SEPARATOR: char = '/';

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+://").expect("valid scheme pattern"));

static DRIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:\\").expect("valid drive pattern"));

/// Splits `pathname` into its segments. Empty pieces produced by a leading,
/// trailing or doubled separator are dropped.
pub fn split(pathname: &str) -> Vec<String> {
    pathname
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the parent portion of `pathname`.
///
/// Trailing separators are ignored. A name without any separator yields `"."`,
/// a name directly below the root yields `"/"`, and an empty string stays empty.
pub fn dirname(pathname: &str) -> String {
    if pathname.is_empty() {
        return String::new();
    }
    let trimmed = pathname.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind(SEPARATOR) {
        None => ".".to_string(),
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches(SEPARATOR);
            if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            }
        }
    }
}

/// Returns the final component of `pathname`, ignoring trailing separators.
pub fn basename(pathname: &str) -> String {
    let trimmed = pathname.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        None => trimmed.to_string(),
        Some(idx) => trimmed[idx + 1..].to_string(),
    }
}

/// Returns everything after the last `.` of the basename, or an empty string.
pub fn extension(pathname: &str) -> String {
    let name = basename(pathname);
    match name.rfind('.') {
        None => String::new(),
        Some(idx) => name[idx + 1..].to_string(),
    }
}

/// Returns the basename with its extension (and the dot before it) removed.
pub fn file_stem(pathname: &str) -> String {
    let mut name = basename(pathname);
    if let Some(idx) = name.rfind('.') {
        name.truncate(idx);
    }
    name
}

/// Length of a leading `scheme://` prefix, or zero.
pub fn scheme_len(pathname: &str) -> usize {
    SCHEME.find(pathname).map(|m| m.end()).unwrap_or(0)
}

/// Whether `pathname` starts with a drive designator such as `c:\`.
pub fn is_drive_absolute(pathname: &str) -> bool {
    DRIVE.is_match(pathname)
}
