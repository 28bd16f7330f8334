//! A small object-oriented layer over filesystem primitives: path strings,
//! files and directories.
//!
//! ### Overview
//!
//! The centerpiece is [`Path`], an immutable value type over a `/`-separated
//! pathname with an optional stream scheme (`vfs://`, `s3://`, ...). It offers a
//! string-segment algebra: segment access, prefix matching, extension and
//! separator handling, appending and relative-path stripping. Only
//! [`Path::is_absolute`] and [`Path::equals`] consult the host filesystem, through
//! a pluggable [`Resolver`].
//!
//! [`File`], [`Directory`] and [`FileDescriptor`] are thin wrappers around
//! `std::fs` sharing the [`FileOperation`] trait. They translate I/O failures
//! into `anyhow` errors naming the offending path and create missing parent
//! directories before writing, copying, moving or linking.
//!
//! **Key ideas**:
//! - **Values, not mutation**: every `Path` transformer returns a new `Path`.
//! - **Strings in, strings out**: anything `AsRef<str>` (a `Path` included) is
//!   accepted wherever a path is expected.
//! - **Streams are opaque**: stream paths are always absolute and only equal to
//!   identical stream paths.

mod core;
mod fs;
mod path;

pub use crate::core::{FileOperation, HostResolver, Resolver, Result};
pub use crate::fs::{Directory, File, FileDescriptor};
pub use crate::path::Path;
