use std::path::Path as StdPath;

use anyhow::{Context, anyhow};

use crate::core::{FileOperation, Result, ensure_local};
use crate::fs::FileDescriptor;

const DEFAULT_MODE: u32 = 0o777;

/// A directory on the host filesystem.
///
/// ### Example:
/// ```no_run
/// use path_kit::{Directory, FileOperation};
///
/// let dir = Directory::new("/tmp/project/src");
/// dir.make().unwrap();
/// for entry in dir.entries().unwrap() {
///     println!("{}", entry);
/// }
/// dir.delete().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    pathname: String,
    mode: u32, // applied to directories created by `make`
}

impl Directory {
    pub fn new(pathname: impl AsRef<str>) -> Self {
        Self {
            pathname: pathname.as_ref().to_string(),
            mode: DEFAULT_MODE,
        }
    }

    /// Changes the mode used for directories created by [`make`](Self::make).
    /// Only honored on unix.
    pub fn set_create_mode(&mut self, mode: u32) {
        self.mode = mode;
    }

    pub fn create_mode(&self) -> u32 {
        self.mode
    }

    /// Creates the directory and all its missing parents.
    /// Does nothing if the directory already exists.
    pub fn make(&self) -> Result<()> {
        ensure_local(&self.pathname)?;
        if self.pathname.is_empty() || self.exists() {
            return Ok(());
        }

        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.mode);
        }
        builder
            .create(&self.pathname)
            .with_context(|| format!("failed to create directory {:?}", self.pathname))?;

        tracing::debug!(path = %self.pathname, mode = %format!("{:o}", self.mode), "directory created");
        Ok(())
    }

    /// Returns the immediate children of this directory.
    ///
    /// Entries that cannot be read are skipped with a warning.
    pub fn entries(&self) -> Result<impl Iterator<Item = FileDescriptor> + use<>> {
        let reader = std::fs::read_dir(&self.pathname)
            .with_context(|| format!("cannot read directory {:?}", self.pathname))?;
        let base = self.pathname.clone();

        Ok(reader.filter_map(move |entry| match entry {
            Ok(entry) => Some(FileDescriptor::from(entry.path().as_path())),
            Err(e) => {
                tracing::warn!(path = %base, error = %e, "skipping unreadable entry");
                None
            }
        }))
    }
}

impl FileOperation for Directory {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn set_pathname(&mut self, pathname: String) {
        self.pathname = pathname;
    }

    /// Recursively deletes the directory. Links inside it are removed, never followed.
    fn delete(&self) -> Result<()> {
        if self.is_link() || !StdPath::new(&self.pathname).is_dir() {
            return Err(anyhow!("{:?} is not a directory", self.pathname));
        }
        for entry in self.entries()? {
            entry.delete()?;
        }
        std::fs::remove_dir(&self.pathname)
            .with_context(|| format!("failed to delete directory {:?}", self.pathname))?;

        tracing::debug!(path = %self.pathname, "directory deleted");
        Ok(())
    }
}

impl std::fmt::Display for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pathname)
    }
}
