//! The [`Path`] value type and its segment algebra.
//!
//! A `Path` is an immutable wrapper around a pathname string. The pathname may
//! carry a stream scheme such as `vfs://`, in which case the scheme is kept
//! apart from the raw pathname that the segment operations work on.
//!
//! ### Segments
//! Segments are the non-empty `/`-delimited pieces of the raw pathname, so
//! `/etc/hosts`, `etc//hosts` and `etc/hosts/` all have the two segments
//! `etc` and `hosts`. Operations that rebuild a path from its leading segments
//! (`up_to_segment`, `remove_last_segments`) keep the scheme and a leading `/`.
//!
//! ### Equality
//! `==` compares pathnames as strings. [`Path::equals`] answers whether two
//! paths point to the same location, which needs the host filesystem.

use std::fmt;
use std::str::FromStr;

use crate::FileDescriptor;
use crate::core::utils::{self, SEPARATOR};
use crate::core::{HostResolver, Resolver};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pathname: String, // scheme + raw pathname
    scheme_len: usize,
    segments: Vec<String>,
    extension: String,
    filename: String,
    dirname: String, // dirname of the raw pathname, without scheme
}

impl Path {
    /// Creates a path from any string-like value, another `Path` included.
    pub fn new(pathname: impl AsRef<str>) -> Self {
        let pathname = pathname.as_ref().to_string();
        let scheme_len = utils::scheme_len(&pathname);
        let raw = &pathname[scheme_len..];

        Self {
            segments: utils::split(raw),
            extension: utils::extension(raw),
            filename: utils::basename(raw),
            dirname: utils::dirname(raw),
            scheme_len,
            pathname,
        }
    }

    fn scheme(&self) -> &str {
        &self.pathname[..self.scheme_len]
    }

    fn raw(&self) -> &str {
        &self.pathname[self.scheme_len..]
    }

    /// Scheme plus a leading separator, if the raw pathname has one.
    fn anchor(&self) -> String {
        let mut anchor = self.scheme().to_string();
        if self.raw().starts_with(SEPARATOR) {
            anchor.push(SEPARATOR);
        }
        anchor
    }

    fn with_raw(&self, raw: &str) -> Path {
        Path::new(format!("{}{}", self.scheme(), raw))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The path without its last component, scheme included.
    pub fn dirname(&self) -> String {
        format!("{}{}", self.scheme(), self.dirname)
    }

    /// The full pathname, scheme included.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn is_stream(&self) -> bool {
        self.scheme_len > 0
    }

    /// Returns a copy with the extension replaced by `extension`.
    ///
    /// ```
    /// use path_kit::Path;
    ///
    /// let p = Path::new("my/file.ext").with_extension("bla");
    /// assert_eq!(p.pathname(), "my/file.bla");
    /// ```
    pub fn with_extension(&self, extension: &str) -> Path {
        let raw = self.raw();
        let stem = utils::file_stem(raw);
        let mut rebuilt = String::new();
        if raw.contains(SEPARATOR) {
            rebuilt.push_str(&self.dirname);
            if !rebuilt.ends_with(SEPARATOR) {
                rebuilt.push(SEPARATOR);
            }
        }
        rebuilt.push_str(&stem);
        rebuilt.push('.');
        rebuilt.push_str(extension);
        self.with_raw(&rebuilt)
    }

    pub fn with_trailing_separator(&self) -> Path {
        if self.has_trailing_separator() {
            return self.clone();
        }
        Path::new(format!("{}{}", self.pathname, SEPARATOR))
    }

    /// Strips one trailing separator, if present.
    pub fn without_trailing_separator(&self) -> Path {
        match self.raw().strip_suffix(SEPARATOR) {
            Some(raw) => self.with_raw(raw),
            None => self.clone(),
        }
    }

    pub fn has_trailing_separator(&self) -> bool {
        self.raw().ends_with(SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }

    /// Concatenates `other` onto this path, inserting a separator if needed.
    ///
    /// ```
    /// use path_kit::Path;
    ///
    /// let p = Path::new("another/path").append("to").append(Path::new("my/stuff"));
    /// assert_eq!(p.pathname(), "another/path/to/my/stuff");
    /// ```
    pub fn append(&self, other: impl AsRef<str>) -> Path {
        let base = self.with_trailing_separator();
        Path::new(format!("{}{}", base.pathname, other.as_ref()))
    }

    /// Whether this path is absolute, resolving it against the host filesystem.
    pub fn is_absolute(&self) -> bool {
        self.is_absolute_with(&HostResolver)
    }

    /// Same as [`is_absolute`](Self::is_absolute) with a custom resolver.
    ///
    /// Streams are always absolute. A path whose real form equals itself is
    /// absolute. Otherwise the decision is purely textual: empty and
    /// dot-prefixed paths are relative, drive paths (`c:\`) and paths starting
    /// with `/` or `\` are absolute.
    pub fn is_absolute_with(&self, resolver: &impl Resolver) -> bool {
        if self.is_stream() {
            return true;
        }
        let raw = self.raw();
        if resolver.real_path(raw).is_some_and(|real| real == raw) {
            return true;
        }
        if raw.is_empty() || raw.starts_with('.') {
            return false;
        }
        if utils::is_drive_absolute(raw) {
            return true;
        }
        raw.starts_with('/') || raw.starts_with('\\')
    }

    /// Textual prefix check on the raw pathnames; nothing is canonicalized.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.raw().starts_with(self.raw())
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Strips `base` (without its trailing separator) from the front of this
    /// pathname. This is plain prefix removal: the separator following the base
    /// is kept, and a path that does not start with `base` comes back unchanged.
    pub fn make_relative_to(&self, base: &Path) -> Path {
        let base = base.without_trailing_separator();
        match self.pathname.strip_prefix(base.pathname()) {
            Some(rest) => Path::new(rest),
            None => self.clone(),
        }
    }

    /// Counts the leading segments shared with `other`.
    pub fn matching_first_segments(&self, other: &Path) -> usize {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Removes the first occurrence of `.<extension>` from the raw pathname.
    ///
    /// The match is not anchored to the filename: for `dir.ext/file.ext` the
    /// directory part loses its suffix instead.
    pub fn remove_extension(&self) -> Path {
        if self.extension.is_empty() {
            return self.clone();
        }
        let suffix = format!(".{}", self.extension);
        self.with_raw(&self.raw().replacen(&suffix, "", 1))
    }

    /// Drops the first `count` segments. The result is always relative.
    pub fn remove_first_segments(&self, count: usize) -> Path {
        let start = count.min(self.segments.len());
        Path::new(utils::join(&self.segments[start..]))
    }

    /// Drops the last `count` segments, keeping the scheme and a leading `/`.
    pub fn remove_last_segments(&self, count: usize) -> Path {
        let end = self.segments.len().saturating_sub(count);
        self.up_to_segment(end)
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn to_file_descriptor(&self) -> FileDescriptor {
        FileDescriptor::new(self)
    }

    /// Keeps the first `count` segments along with the scheme and a leading `/`.
    pub fn up_to_segment(&self, count: usize) -> Path {
        let end = count.min(self.segments.len());
        Path::new(format!("{}{}", self.anchor(), utils::join(&self.segments[..end])))
    }

    /// Whether both paths point to the same location on the host filesystem.
    ///
    /// Streams are compared textually and never equal a non-stream path.
    /// Paths that cannot be resolved are never equal.
    pub fn equals(&self, other: impl AsRef<str>) -> bool {
        self.equals_with(other, &HostResolver)
    }

    pub fn equals_with(&self, other: impl AsRef<str>, resolver: &impl Resolver) -> bool {
        let other = Path::new(other);
        match (self.is_stream(), other.is_stream()) {
            (true, true) => self.pathname == other.pathname,
            (false, false) => match (resolver.real_path(self.raw()), resolver.real_path(other.raw())) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.pathname
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname)
    }
}

impl From<&str> for Path {
    fn from(pathname: &str) -> Self {
        Path::new(pathname)
    }
}

impl From<String> for Path {
    fn from(pathname: String) -> Self {
        Path::new(pathname)
    }
}

impl From<&std::path::Path> for Path {
    fn from(path: &std::path::Path) -> Self {
        Path::new(path.to_string_lossy())
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const SAMPLE: &str = "this/is/the/path/to/my/file.ext";

    /// Resolver backed by a fixed table instead of the host filesystem.
    struct MapResolver(BTreeMap<&'static str, &'static str>);

    impl MapResolver {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self(pairs.iter().copied().collect())
        }
    }

    impl Resolver for MapResolver {
        fn real_path(&self, pathname: &str) -> Option<String> {
            self.0.get(pathname).map(|s| s.to_string())
        }
    }

    mod naming {
        use super::*;

        #[test]
        fn test_basic_naming() {
            let p = Path::new(SAMPLE);
            assert_eq!(p.dirname(), "this/is/the/path/to/my");
            assert_eq!(p.filename(), "file.ext");
            assert_eq!(p.extension(), "ext");
            assert_eq!(p.pathname(), SAMPLE);
        }

        #[test]
        fn test_to_string_round_trip() {
            for s in [SAMPLE, "/etc/hosts", "vfs://root/dir/", "", "a//b", "c:\\windows"] {
                assert_eq!(Path::new(s).to_string(), s);
            }
        }

        #[test]
        fn test_dirname_without_separator() {
            assert_eq!(Path::new("file.ext").dirname(), ".");
            assert_eq!(Path::new("/file.ext").dirname(), "/");
        }

        #[test]
        fn test_from_conversions() {
            let from_str: Path = "a/b".into();
            let from_string: Path = String::from("a/b").into();
            let from_std = Path::from(std::path::Path::new("a/b"));
            let parsed: Path = "a/b".parse().unwrap();
            assert_eq!(from_str, from_string);
            assert_eq!(from_str, from_std);
            assert_eq!(from_str, parsed);
            assert_eq!(Path::new(&from_str), from_str);
        }
    }

    mod streams {
        use super::*;

        #[test]
        fn test_stream_detection() {
            let p = Path::new("vfs://root/dir/file.ext");
            assert!(p.is_stream());
            assert_eq!(p.pathname(), "vfs://root/dir/file.ext");
            assert_eq!(p.dirname(), "vfs://root/dir");
            assert_eq!(p.filename(), "file.ext");
            assert_eq!(p.segments(), ["root", "dir", "file.ext"]);
            assert!(!Path::new("/root/dir").is_stream());
        }

        #[test]
        fn test_stream_is_absolute() {
            assert!(Path::new("vfs://relative/looking").is_absolute());
        }

        #[test]
        fn test_stream_equality() {
            let resolver = MapResolver::new(&[]);
            let dir_file = Path::new("vfs://root/dir/file.ext");
            let file = Path::new("vfs://root/file.ext");
            assert!(!dir_file.equals_with(&file, &resolver));
            assert!(!file.equals_with(&dir_file, &resolver));
            assert!(dir_file.equals_with("vfs://root/dir/file.ext", &resolver));
        }

        #[test]
        fn test_stream_never_equals_plain_path() {
            let resolver = MapResolver::new(&[
                ("root/file.ext", "/root/file.ext"),
                ("/root/file.ext", "/root/file.ext"),
            ]);
            let stream = Path::new("vfs://root/file.ext");
            assert!(!stream.equals_with("root/file.ext", &resolver));
            assert!(!Path::new("/root/file.ext").equals_with(&stream, &resolver));
        }

        #[test]
        fn test_stream_kept_by_transformers() {
            let p = Path::new("vfs://root/dir/file.ext");
            assert_eq!(p.with_extension("txt").pathname(), "vfs://root/dir/file.txt");
            assert_eq!(p.remove_extension().pathname(), "vfs://root/dir/file");
            assert_eq!(p.remove_last_segments(1).pathname(), "vfs://root/dir");
            assert_eq!(p.up_to_segment(1).pathname(), "vfs://root");
            assert_eq!(p.remove_first_segments(1).pathname(), "dir/file.ext");
        }
    }

    mod extension {
        use super::*;

        #[test]
        fn test_set_extension() {
            let p = Path::new("my/file.ext").with_extension("bla");
            assert_eq!(p.extension(), "bla");
            assert_eq!(p.pathname(), "my/file.bla");
        }

        #[test]
        fn test_set_extension_without_dirname() {
            assert_eq!(Path::new("file.ext").with_extension("bla").pathname(), "file.bla");
            assert_eq!(Path::new("README").with_extension("md").pathname(), "README.md");
            assert_eq!(Path::new("/file.ext").with_extension("bla").pathname(), "/file.bla");
        }

        #[test]
        fn test_set_extension_leaves_original() {
            let original = Path::new("my/file.ext");
            let _ = original.with_extension("bla");
            assert_eq!(original.extension(), "ext");
        }

        #[test]
        fn test_remove_extension() {
            let p = Path::new("my/file.ext").with_extension("bla").remove_extension();
            assert_eq!(p.extension(), "");
            assert_eq!(p.pathname(), "my/file");
        }

        #[test]
        fn test_remove_missing_extension_is_noop() {
            let p = Path::new("dir.d/README");
            assert_eq!(p.remove_extension(), p);
        }

        #[test]
        fn test_remove_extension_keeps_trailing_dot() {
            // An empty extension removes nothing, so the bare dot stays.
            let p = Path::new("dir/file.");
            assert_eq!(p.extension(), "");
            assert_eq!(p.remove_extension().pathname(), "dir/file.");
        }

        #[test]
        fn test_remove_extension_matches_directory_first() {
            // Literal substring removal: the first `.ext` wins even in a directory name.
            let p = Path::new("dir.ext/file.ext").remove_extension();
            assert_eq!(p.pathname(), "dir/file.ext");
            assert_eq!(p.extension(), "ext");
        }
    }

    mod separators {
        use super::*;

        #[test]
        fn test_add_trailing_separator_idempotent() {
            let once = Path::new("a/b").with_trailing_separator();
            let twice = once.with_trailing_separator();
            assert_eq!(once.pathname(), "a/b/");
            assert_eq!(once, twice);
            assert!(once.has_trailing_separator());
        }

        #[test]
        fn test_remove_trailing_separator() {
            let p = Path::new("a/b/");
            assert_eq!(p.without_trailing_separator().pathname(), "a/b");
            let bare = Path::new("a/b");
            assert_eq!(bare.without_trailing_separator(), bare);
            assert!(!bare.has_trailing_separator());
        }

        #[test]
        fn test_remove_only_one_trailing_separator() {
            assert_eq!(Path::new("a//").without_trailing_separator().pathname(), "a/");
        }

        #[test]
        fn test_stream_root_trailing_separator() {
            let p = Path::new("vfs://");
            assert!(p.is_empty());
            assert!(!p.has_trailing_separator());
            assert_eq!(p.with_trailing_separator().pathname(), "vfs:///");
        }

        #[test]
        fn test_is_empty() {
            assert!(Path::new("").is_empty());
            assert!(!Path::new("/").is_empty());
        }
    }

    mod append {
        use super::*;

        #[test]
        fn test_append() {
            let p = Path::new("another/path").append("to");
            assert_eq!(p.pathname(), "another/path/to");
            let p = p.append(Path::new("my/stuff"));
            assert_eq!(p.pathname(), "another/path/to/my/stuff");
        }

        #[test]
        fn test_append_to_trailing_separator() {
            assert_eq!(Path::new("dir/").append("file").pathname(), "dir/file");
        }

        #[test]
        fn test_append_does_not_change_receiver() {
            let base = Path::new("base");
            let _ = base.append("child");
            assert_eq!(base.pathname(), "base");
        }

        #[test]
        fn test_append_stream() {
            let p = Path::new("vfs://root").append("dir/file.ext");
            assert!(p.is_stream());
            assert_eq!(p.segments(), ["root", "dir", "file.ext"]);
        }
    }

    mod absolute {
        use super::*;

        #[test]
        fn test_is_absolute() {
            let resolver = MapResolver::new(&[]);
            assert!(Path::new("c:\\windows").is_absolute_with(&resolver));
            assert!(Path::new("/etc").is_absolute_with(&resolver));
            assert!(Path::new("\\share").is_absolute_with(&resolver));
            assert!(!Path::new("").is_absolute_with(&resolver));
            assert!(!Path::new("./some/dir").is_absolute_with(&resolver));
            assert!(!Path::new("some/dir").is_absolute_with(&resolver));
        }

        #[test]
        fn test_is_absolute_on_host() {
            assert!(Path::new("/etc").is_absolute());
            assert!(!Path::new("").is_absolute());
            assert!(!Path::new("./some/dir").is_absolute());
        }

        #[test]
        fn test_resolved_path_is_absolute() {
            let resolver = MapResolver::new(&[("weird", "weird")]);
            assert!(Path::new("weird").is_absolute_with(&resolver));
        }
    }

    mod segments {
        use super::*;

        #[test]
        fn test_segments() {
            let p = Path::new(SAMPLE);
            assert_eq!(
                p.segments(),
                ["this", "is", "the", "path", "to", "my", "file.ext"]
            );
            assert_eq!(p.segment_count(), 7);
            assert_eq!(p.segment(1), Some("is"));
            assert_eq!(p.segment(7), None);
            assert_eq!(p.last_segment(), Some("file.ext"));
        }

        #[test]
        fn test_no_empty_segments() {
            assert_eq!(Path::new("/etc/hosts").segments(), ["etc", "hosts"]);
            assert_eq!(Path::new("a//b/").segment_count(), 2);
            assert_eq!(Path::new("").segment_count(), 0);
            assert_eq!(Path::new("/").segment_count(), 0);
        }

        #[test]
        fn test_last_segment_of_empty_path() {
            assert_eq!(Path::new("").last_segment(), None);
            assert_eq!(Path::new("/").last_segment(), None);
        }

        #[test]
        fn test_up_to_segment() {
            let p = Path::new(SAMPLE);
            assert_eq!(p.up_to_segment(3).to_string(), "this/is/the");
            assert_eq!(p.up_to_segment(0).to_string(), "");
            assert_eq!(p.up_to_segment(100).to_string(), SAMPLE);
            assert_eq!(Path::new("/usr/local/bin").up_to_segment(2).to_string(), "/usr/local");
        }

        #[test]
        fn test_remove_first_segments() {
            let p = Path::new(SAMPLE);
            assert_eq!(p.remove_first_segments(2).to_string(), "the/path/to/my/file.ext");
            assert_eq!(p.remove_first_segments(7).to_string(), "");
            assert_eq!(p.remove_first_segments(9).to_string(), "");
            assert_eq!(Path::new("/usr/local/bin").remove_first_segments(1).to_string(), "local/bin");
        }

        #[test]
        fn test_remove_last_segments() {
            let p = Path::new(SAMPLE);
            assert_eq!(p.remove_last_segments(2).to_string(), "this/is/the/path/to");
            assert_eq!(p.remove_last_segments(9).to_string(), "");
            assert_eq!(Path::new("/usr/local/bin").remove_last_segments(1).to_string(), "/usr/local");
            assert_eq!(Path::new("/usr").remove_last_segments(1).to_string(), "/");
        }
    }

    mod matching {
        use super::*;

        #[test]
        fn test_is_prefix_of() {
            let prefix = Path::new("this/is/the");
            let p = Path::new(SAMPLE);
            assert!(prefix.is_prefix_of(&p));
            assert!(!p.is_prefix_of(&prefix));
            assert!(Path::new("").is_prefix_of(&p));
        }

        #[test]
        fn test_is_prefix_of_ignores_scheme() {
            assert!(Path::new("vfs://root").is_prefix_of(&Path::new("root/dir")));
        }

        #[test]
        fn test_matching_first_segments() {
            let p = Path::new(SAMPLE);
            assert_eq!(p.matching_first_segments(&Path::new("this/is/the")), 3);
            assert_eq!(p.matching_first_segments(&Path::new("this/is/another/path")), 2);
            assert_eq!(p.matching_first_segments(&Path::new("other")), 0);
        }

        #[test]
        fn test_matching_first_segments_shorter_other() {
            let short = Path::new("this/is");
            let p = Path::new(SAMPLE);
            assert_eq!(p.matching_first_segments(&short), 2);
            assert_eq!(short.matching_first_segments(&p), 2);
            assert_eq!(p.matching_first_segments(&Path::new("")), 0);
        }

        #[test]
        fn test_make_relative_to() {
            let p = Path::new("/var/www/site/index.html");
            let rel = p.make_relative_to(&Path::new("/var/www/"));
            assert_eq!(rel.pathname(), "/site/index.html");
            let rel = p.make_relative_to(&Path::new("/var/www"));
            assert_eq!(rel.pathname(), "/site/index.html");
        }

        #[test]
        fn test_make_relative_to_unrelated_base() {
            let p = Path::new("a/b/c");
            assert_eq!(p.make_relative_to(&Path::new("x/y")), p);
            // Only a leading match counts.
            assert_eq!(p.make_relative_to(&Path::new("b")), p);
        }

        #[test]
        fn test_make_relative_to_stream() {
            let p = Path::new("vfs://root/dir/file.ext");
            let rel = p.make_relative_to(&Path::new("vfs://root"));
            assert!(!rel.is_stream());
            assert_eq!(rel.pathname(), "/dir/file.ext");
        }
    }

    mod equality {
        use super::*;

        #[test]
        fn test_equals_through_resolver() {
            let resolver = MapResolver::new(&[
                ("a/../b", "/work/b"),
                ("./b", "/work/b"),
                ("c", "/work/c"),
            ]);
            assert!(Path::new("a/../b").equals_with("./b", &resolver));
            assert!(!Path::new("a/../b").equals_with("c", &resolver));
        }

        #[test]
        fn test_unresolvable_paths_are_not_equal() {
            let resolver = MapResolver::new(&[]);
            assert!(!Path::new("missing").equals_with("missing", &resolver));
        }

        #[test]
        fn test_equals_on_host() {
            let dir = tempdir::TempDir::new("path_equals").unwrap();
            let root = dir.path().to_str().unwrap().to_string();
            let p = Path::new(&root);
            assert!(p.equals(format!("{root}/.")));
            assert!(p.equals(p.with_trailing_separator()));
            assert!(!p.equals(format!("{root}/missing")));
        }
    }

    mod descriptor {
        use super::*;
        use crate::FileOperation;

        #[test]
        fn test_to_file_descriptor() {
            let fd = Path::new(SAMPLE).to_file_descriptor();
            assert_eq!(fd.pathname(), SAMPLE);
            assert_eq!(fd.filename(), "file.ext");
        }
    }
}
