use std::path::Path as StdPath;
use std::time::SystemTime;

use anyhow::{Context, anyhow};

use crate::{Directory, FileDescriptor, Path};

pub mod utils;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Resolves a pathname to its real (canonical, symlink-free, absolute) form.
///
/// `None` means the path could not be resolved, usually because it does not exist.
pub trait Resolver {
    fn real_path(&self, pathname: &str) -> Option<String>;
}

/// Resolves paths against the host filesystem with `std::fs::canonicalize`.
#[derive(Debug, Default, Copy, Clone)]
pub struct HostResolver;

impl Resolver for HostResolver {
    fn real_path(&self, pathname: &str) -> Option<String> {
        if pathname.is_empty() {
            return None;
        }
        std::fs::canonicalize(pathname)
            .ok()
            .and_then(|p| p.to_str().map(String::from))
    }
}

/// Operations common to [`File`](crate::File), [`Directory`] and [`FileDescriptor`].
///
/// Implementors only provide access to their pathname and a way to delete
/// themselves; everything else is a pass-through to `std::fs`.
pub trait FileOperation {
    fn pathname(&self) -> &str;

    /// Replaces the stored pathname, e.g. after a successful move.
    fn set_pathname(&mut self, pathname: String);

    fn delete(&self) -> Result<()>;

    fn extension(&self) -> String {
        utils::extension(self.pathname())
    }

    fn filename(&self) -> String {
        utils::basename(self.pathname())
    }

    fn dirname(&self) -> String {
        utils::dirname(self.pathname())
    }

    fn to_path(&self) -> Path {
        Path::new(self.pathname())
    }

    /// Returns false for symlinks pointing to missing targets.
    fn exists(&self) -> bool {
        StdPath::new(self.pathname()).exists()
    }

    fn is_link(&self) -> bool {
        std::fs::symlink_metadata(self.pathname())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn is_readable(&self) -> bool {
        let path = StdPath::new(self.pathname());
        if path.is_dir() {
            std::fs::read_dir(path).is_ok()
        } else {
            std::fs::File::open(path).is_ok()
        }
    }

    fn is_writable(&self) -> bool {
        let path = StdPath::new(self.pathname());
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => !meta.permissions().readonly(),
            Ok(_) => std::fs::OpenOptions::new().write(true).open(path).is_ok(),
            Err(_) => false,
        }
    }

    fn is_executable(&self) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(self.pathname())
                .map(|m| m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    fn accessed_at(&self) -> Result<SystemTime> {
        self.metadata()?
            .accessed()
            .with_context(|| format!("cannot read access time of {}", self.pathname()))
    }

    fn modified_at(&self) -> Result<SystemTime> {
        self.metadata()?
            .modified()
            .with_context(|| format!("cannot read modification time of {}", self.pathname()))
    }

    /// Birth time where the platform records one, the modification time otherwise.
    fn created_at(&self) -> Result<SystemTime> {
        let meta = self.metadata()?;
        match meta.created() {
            Ok(time) => Ok(time),
            Err(_) => meta
                .modified()
                .with_context(|| format!("cannot read creation time of {}", self.pathname())),
        }
    }

    fn metadata(&self) -> Result<std::fs::Metadata> {
        std::fs::metadata(self.pathname())
            .with_context(|| format!("cannot stat {}", self.pathname()))
    }

    fn inode(&self) -> Option<u64> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            std::fs::metadata(self.pathname()).ok().map(|m| m.ino())
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    fn owner(&self) -> Option<u32> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            std::fs::metadata(self.pathname()).ok().map(|m| m.uid())
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    fn group(&self) -> Option<u32> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            std::fs::metadata(self.pathname()).ok().map(|m| m.gid())
        }
        #[cfg(not(unix))]
        {
            None
        }
    }

    /// Returns the raw mode, file type bits included.
    fn permissions(&self) -> Result<u32> {
        let meta = self.metadata()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Ok(meta.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            Ok(if meta.permissions().readonly() { 0o444 } else { 0o666 })
        }
    }

    fn set_mode(&self, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(self.pathname(), std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("failed to change mode of {}", self.pathname()))?;
            tracing::debug!(path = self.pathname(), mode = %format!("{mode:o}"), "mode changed");
            Ok(())
        }
        #[cfg(not(unix))]
        {
            let mut perms = self.metadata()?.permissions();
            perms.set_readonly(mode & 0o222 == 0);
            std::fs::set_permissions(self.pathname(), perms)
                .with_context(|| format!("failed to change mode of {}", self.pathname()))
        }
    }

    /// Returns the target if this is a symbolic link.
    fn link_target(&self) -> Option<Path> {
        if !self.is_link() {
            return None;
        }
        std::fs::read_link(self.pathname())
            .ok()
            .map(|target| Path::from(target.as_path()))
    }

    /// Copies to `destination`, overwriting it. The destination's parent
    /// directory is created if needed.
    fn copy(&self, destination: impl AsRef<str>) -> Result<()>
    where
        Self: Sized,
    {
        let destination = prepare_destination(destination)?;
        std::fs::copy(self.pathname(), destination.pathname()).with_context(|| {
            format!("failed to copy {} to {}", self.pathname(), destination)
        })?;
        tracing::debug!(from = self.pathname(), to = destination.pathname(), "copied");
        Ok(())
    }

    /// Renames to `destination` and follows the move.
    fn move_to(&mut self, destination: impl AsRef<str>) -> Result<()>
    where
        Self: Sized,
    {
        let destination = prepare_destination(destination)?;
        std::fs::rename(self.pathname(), destination.pathname()).with_context(|| {
            format!("failed to move {} to {}", self.pathname(), destination)
        })?;
        tracing::debug!(from = self.pathname(), to = destination.pathname(), "moved");
        self.set_pathname(destination.to_string());
        Ok(())
    }

    /// Creates a symbolic link at `destination` pointing to this path.
    ///
    /// An existing link at `destination` is kept when it already points here
    /// and replaced otherwise.
    fn link_to(&self, destination: impl AsRef<str>) -> Result<()>
    where
        Self: Sized,
    {
        let target = FileDescriptor::new(prepare_destination(destination)?);

        if target.is_link() {
            let already_linked = target
                .link_target()
                .is_some_and(|current| current.equals(self.pathname()));
            if already_linked {
                return Ok(());
            }
            target.delete()?;
        }

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(self.pathname(), target.pathname()).with_context(|| {
                format!(
                    "failed to create symbolic link from {} to {}",
                    self.pathname(),
                    target.pathname()
                )
            })?;
            tracing::debug!(from = self.pathname(), to = target.pathname(), "linked");
            Ok(())
        }
        #[cfg(not(unix))]
        {
            Err(anyhow!(
                "symbolic links are not supported on this platform: {}",
                target.pathname()
            ))
        }
    }
}

/// Fails for stream pathnames, which `std::fs` cannot reach.
pub(crate) fn ensure_local(pathname: &str) -> Result<()> {
    if Path::new(pathname).is_stream() {
        return Err(anyhow!("stream paths are not supported: {}", pathname));
    }
    Ok(())
}

/// Turns `destination` into a [`Path`] and makes sure its parent directory exists.
fn prepare_destination(destination: impl AsRef<str>) -> Result<Path> {
    let destination = Path::new(destination);
    ensure_local(destination.pathname())?;
    if destination.is_empty() {
        return Err(anyhow!("invalid destination: empty"));
    }
    Directory::new(destination.dirname()).make()?;
    Ok(destination)
}
