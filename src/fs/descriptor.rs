use std::path::Path as StdPath;

use crate::core::{FileOperation, Result};
use crate::fs::{Directory, File};

/// A pathname whose kind (file, directory or link) is decided by asking the
/// host filesystem. Yielded by [`Directory::entries`].
#[derive(Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pathname: String,
}

impl FileDescriptor {
    pub fn new(pathname: impl AsRef<str>) -> Self {
        Self {
            pathname: pathname.as_ref().to_string(),
        }
    }

    /// Returns true if the pathname exists and is a regular file.
    pub fn is_file(&self) -> bool {
        StdPath::new(&self.pathname).is_file()
    }

    /// Returns true if the pathname exists and is a directory.
    pub fn is_dir(&self) -> bool {
        StdPath::new(&self.pathname).is_dir()
    }

    /// Whether the filename is `.` or `..`.
    pub fn is_dot(&self) -> bool {
        let name = self.filename();
        name == "." || name == ".."
    }

    pub fn to_file(&self) -> File {
        File::new(&self.pathname)
    }

    pub fn to_directory(&self) -> Directory {
        Directory::new(&self.pathname)
    }
}

impl FileOperation for FileDescriptor {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn set_pathname(&mut self, pathname: String) {
        self.pathname = pathname;
    }

    /// Deletes a file, a link (never its target) or a whole directory tree.
    fn delete(&self) -> Result<()> {
        if self.is_dir() && !self.is_link() {
            self.to_directory().delete()
        } else {
            self.to_file().delete()
        }
    }
}

impl From<&StdPath> for FileDescriptor {
    fn from(path: &StdPath) -> Self {
        Self::new(path.to_string_lossy())
    }
}

impl std::fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pathname)
    }
}
