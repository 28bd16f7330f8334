use std::io::Write;
use std::time::SystemTime;

use anyhow::{Context, anyhow};

use crate::core::{FileOperation, Result, ensure_local};
use crate::fs::Directory;

/// A regular file on the host filesystem.
///
/// ### Example:
/// ```no_run
/// use path_kit::{File, FileOperation};
///
/// let file = File::new("/tmp/project/composer.json");
/// file.write(r#"{"hello":"world!"}"#).unwrap(); // creates /tmp/project if needed
/// file.append("\n").unwrap();
/// assert_eq!(file.read().unwrap(), "{\"hello\":\"world!\"}\n");
/// file.copy("/tmp/backup/composer.json").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pathname: String,
}

impl File {
    pub fn new(pathname: impl AsRef<str>) -> Self {
        Self {
            pathname: pathname.as_ref().to_string(),
        }
    }

    /// Reads the whole file as UTF-8 text.
    pub fn read(&self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", self.pathname))
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        if !self.exists() {
            return Err(anyhow!("file does not exist: {}", self.pathname));
        }
        if !self.is_readable() {
            return Err(anyhow!("access denied: {}", self.pathname));
        }
        std::fs::read(&self.pathname).with_context(|| format!("cannot read {}", self.pathname))
    }

    /// Replaces the file contents, creating the file and its parent
    /// directories if needed.
    pub fn write(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        ensure_local(&self.pathname)?;
        Directory::new(self.dirname()).make()?;

        if self.exists() && !self.is_writable() {
            return Err(anyhow!(
                "cannot write {}: do you have enough permissions?",
                self.pathname
            ));
        }

        let contents = contents.as_ref();
        std::fs::write(&self.pathname, contents)
            .with_context(|| format!("cannot write {}", self.pathname))?;

        tracing::debug!(path = %self.pathname, bytes = contents.len(), "file written");
        Ok(())
    }

    /// Appends to the end of an existing file.
    pub fn append(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        ensure_local(&self.pathname)?;
        if !self.exists() || !self.is_writable() {
            return Err(anyhow!(
                "cannot write {}: do you have enough permissions?",
                self.pathname
            ));
        }

        let contents = contents.as_ref();
        let mut fd = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.pathname)
            .with_context(|| format!("cannot open {}", self.pathname))?;
        fd.write_all(contents)
            .with_context(|| format!("cannot append to {}", self.pathname))?;

        tracing::debug!(path = %self.pathname, bytes = contents.len(), "file appended");
        Ok(())
    }

    /// Creates the file if missing and sets its modification and access
    /// times. `None` stands for the current time.
    pub fn touch(&self, modified: Option<SystemTime>, accessed: Option<SystemTime>) -> Result<()> {
        ensure_local(&self.pathname)?;
        let now = SystemTime::now();
        let times = std::fs::FileTimes::new()
            .set_modified(modified.unwrap_or(now))
            .set_accessed(accessed.unwrap_or(now));

        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.pathname)
            .and_then(|fd| fd.set_times(times))
            .with_context(|| format!("failed to touch file at {}", self.pathname))?;

        tracing::debug!(path = %self.pathname, "file touched");
        Ok(())
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.pathname)
            .with_context(|| format!("cannot get the size of {}", self.pathname))?
            .len())
    }
}

impl FileOperation for File {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn set_pathname(&mut self, pathname: String) {
        self.pathname = pathname;
    }

    fn delete(&self) -> Result<()> {
        std::fs::remove_file(&self.pathname)
            .with_context(|| format!("failed to delete file at {}", self.pathname))?;

        tracing::debug!(path = %self.pathname, "file deleted");
        Ok(())
    }
}

impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pathname)
    }
}
