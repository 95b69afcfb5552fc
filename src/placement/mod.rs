//! # Path Placement
//!
//! Decides which configured data path a new SSTable is written to, and
//! whether an existing file's path is acceptable for a **trivial move**
//! (changing a file's level without rewriting its contents).
//!
//! ## Suppliers
//!
//! [`PathSupplier`] is a closed set of two policies:
//!
//! - [`FixedPathSupplier`]: every file lands in one path id. A trivial
//!   move is accepted only if the file already lives there.
//! - [`RandomPathSupplier`]: each file lands in a uniformly random path
//!   id. Every valid id is an equally legitimate outcome, so any in-range
//!   id is accepted and path choice alone never forces a rewrite.
//!
//! Both answer the same four questions:
//!
//! | Operation | Meaning |
//! |---|---|
//! | [`select_path_id`](PathSupplier::select_path_id) | where the next file goes |
//! | [`add_file_size`](PathSupplier::add_file_size) | bytes written to the last choice (no-op today) |
//! | [`fsync_db_path`](PathSupplier::fsync_db_path) | durability barrier on a path's directory |
//! | [`accept_path_id`](PathSupplier::accept_path_id) | is this id fine for a trivial move |
//!
//! ## Locking contract
//!
//! Suppliers perform no synchronization. Every call must be made while the
//! caller holds the lock that protects the owning column family. The types
//! keep this honest:
//!
//! - a supplier borrows the column family it was built from, so it cannot
//!   outlive the guard that protects it;
//! - a random supplier reaches its [`PathCatalog`] through a plain `&dyn`
//!   reference and is therefore neither `Send` nor `Sync`. A fixed supplier
//!   only borrows a [`Directory`](crate::env::Directory), which is
//!   `Send + Sync`, so it may cross threads while the borrow lasts;
//! - [`add_file_size`](PathSupplier::add_file_size) takes `&mut self`.
//!
//! Random selection draws from a [`PlacementRng`] owned by the calling
//! worker. Workers never share generator state.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests;

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

mod fixed;
mod random;

pub use fixed::FixedPathSupplier;
pub use random::{PlacementRng, RandomPathSupplier};

use std::io;

use thiserror::Error;

use crate::directories::DirectoryError;
use crate::env::Directory;

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

/// Errors returned by placement operations.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A path id resolves to no directory, or a policy names a path that
    /// does not exist.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A random draw was requested with no configured paths.
    #[error("cannot select a random path id: no paths configured")]
    EmptyPathList,

    /// The directory fsync failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Opening column-family directories failed.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

// ------------------------------------------------------------------------------------------------
// Path catalog
// ------------------------------------------------------------------------------------------------

/// The narrow view of a column family that placement needs.
///
/// Implemented by [`ColumnFamilyPaths`](crate::ColumnFamilyPaths); tests
/// implement it directly.
pub trait PathCatalog {
    /// Length of the effective path list (see [`effective_path_count`]).
    fn path_count(&self) -> usize;

    /// Directory that files with `path_id` live in, if any.
    fn dir_for_path(&self, path_id: u32) -> Option<&dyn Directory>;
}

/// Length of a column family's effective path list: its own list when
/// non-empty, otherwise the database-wide list.
pub fn effective_path_count(cf_paths: usize, db_paths: usize) -> usize {
    if cf_paths == 0 { db_paths } else { cf_paths }
}

// ------------------------------------------------------------------------------------------------
// Supplier
// ------------------------------------------------------------------------------------------------

/// Placement policy for one column family.
#[derive(Debug)]
pub enum PathSupplier<'a> {
    Fixed(FixedPathSupplier<'a>),
    Random(RandomPathSupplier<'a>),
}

impl PathSupplier<'_> {
    /// Path id for a new file at `level`.
    ///
    /// `rng` is consumed only by the random policy.
    ///
    /// # Errors
    ///
    /// [`PlacementError::EmptyPathList`] if the random policy has no paths
    /// to choose from.
    pub fn select_path_id(
        &self,
        level: u32,
        rng: &mut PlacementRng,
    ) -> Result<u32, PlacementError> {
        match self {
            Self::Fixed(s) => Ok(s.select_path_id(level)),
            Self::Random(s) => s.select_path_id(level, rng),
        }
    }

    /// Records bytes written to the last selected path.
    pub fn add_file_size(&mut self, file_size: u64) {
        match self {
            Self::Fixed(s) => s.add_file_size(file_size),
            Self::Random(s) => s.add_file_size(file_size),
        }
    }

    /// Fsyncs the directory that holds `path_id`.
    ///
    /// May block on the operating system.
    ///
    /// # Errors
    ///
    /// - [`PlacementError::InvalidArgument`] if no directory resolves.
    /// - [`PlacementError::Io`] if the fsync itself fails.
    pub fn fsync_db_path(&self, path_id: u32) -> Result<(), PlacementError> {
        match self {
            Self::Fixed(s) => s.fsync_db_path(path_id),
            Self::Random(s) => s.fsync_db_path(path_id),
        }
    }

    /// Whether a file already at `path_id` may be moved between levels
    /// without rewriting it.
    pub fn accept_path_id(&self, path_id: u32) -> bool {
        match self {
            Self::Fixed(s) => s.accept_path_id(path_id),
            Self::Random(s) => s.accept_path_id(path_id),
        }
    }
}

impl<'a> From<FixedPathSupplier<'a>> for PathSupplier<'a> {
    fn from(s: FixedPathSupplier<'a>) -> Self {
        Self::Fixed(s)
    }
}

impl<'a> From<RandomPathSupplier<'a>> for PathSupplier<'a> {
    fn from(s: RandomPathSupplier<'a>) -> Self {
        Self::Random(s)
    }
}

/// Issues the fsync and logs on failure.
fn fsync_dir(dir: &dyn Directory, path_id: u32) -> Result<(), PlacementError> {
    tracing::trace!(path_id, path = %dir.path().display(), "fsync db path");
    dir.fsync().map_err(|e| {
        tracing::error!(path_id, path = %dir.path().display(), %e, "db path fsync failed");
        PlacementError::Io(e)
    })
}
