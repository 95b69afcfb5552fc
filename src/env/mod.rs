//! # Environment
//!
//! The filesystem surface the placement subsystem depends on. Only two
//! primitives are needed:
//!
//! - creating a directory (when the configuration asks for it), and
//! - opening a directory handle that can later be **fsync**'ed so that
//!   directory-entry changes (new files, renames) survive a crash.
//!
//! Everything above this module talks to the [`Env`] and [`Directory`]
//! traits, never to `std::fs` directly, so tests can substitute a recording
//! implementation.
//!
//! ## Thread safety
//!
//! Both traits require `Send + Sync`. A [`Directory`] handle is never
//! mutated after it is opened; concurrent `fsync` calls on one handle are
//! as safe as the operating system makes them.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use tracing::{error, trace};

// ------------------------------------------------------------------------------------------------
// Traits
// ------------------------------------------------------------------------------------------------

/// An open operating-system directory, used only as a durability barrier.
pub trait Directory: Send + Sync {
    /// Persists all directory-entry changes made so far.
    fn fsync(&self) -> io::Result<()>;

    /// The path this handle was opened for.
    fn path(&self) -> &Path;
}

/// Factory for directory handles.
pub trait Env: Send + Sync {
    /// Creates `path` (and missing parents). Succeeds if it already exists.
    fn create_dir_if_missing(&self, path: &Path) -> io::Result<()>;

    /// Opens a handle on an existing directory.
    fn new_directory(&self, path: &Path) -> io::Result<Box<dyn Directory>>;
}

/// Creates `path` when `create_if_missing` is set, then opens a handle on it.
pub fn create_and_new_directory(
    env: &dyn Env,
    path: &Path,
    create_if_missing: bool,
) -> io::Result<Box<dyn Directory>> {
    if create_if_missing {
        env.create_dir_if_missing(path)?;
    }
    env.new_directory(path)
}

// ------------------------------------------------------------------------------------------------
// std::fs implementation
// ------------------------------------------------------------------------------------------------

/// [`Env`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEnv;

impl Env for FsEnv {
    fn create_dir_if_missing(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn new_directory(&self, path: &Path) -> io::Result<Box<dyn Directory>> {
        let file = File::open(path)?;
        if !file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Box::new(FsDirectory {
            file,
            path: path.to_path_buf(),
        }))
    }
}

/// A directory opened read-only so it can be `sync_all`'ed.
#[derive(Debug)]
pub struct FsDirectory {
    file: File,
    path: PathBuf,
}

impl Directory for FsDirectory {
    fn fsync(&self) -> io::Result<()> {
        trace!(path = %self.path.display(), "fsync directory");
        self.file.sync_all().inspect_err(|e| {
            error!(path = %self.path.display(), %e, "directory fsync failed");
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
