//! Fixed placement.
//!
//! Every new file goes to one configured path id, whatever its level. The
//! supplier holds the directory handle for that id and nothing else, so a
//! trivial move is accepted only when the file already lives there.

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use tracing::debug;

use super::{PlacementError, fsync_dir};
use crate::directories::Directories;
use crate::env::Directory;

// ------------------------------------------------------------------------------------------------
// Supplier
// ------------------------------------------------------------------------------------------------

/// Places every file in one path id, regardless of level.
///
/// Used when a column family manages a single path: all of its files end
/// up in exactly one directory and stay there.
pub struct FixedPathSupplier<'a> {
    path_id: u32,
    path_dir: Option<&'a dyn Directory>,
}

impl std::fmt::Debug for FixedPathSupplier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedPathSupplier")
            .field("path_id", &self.path_id)
            .field("path_dir", &self.path_dir.map(|d| d.path()))
            .finish()
    }
}

impl<'a> FixedPathSupplier<'a> {
    /// Builds a supplier around an already resolved directory handle.
    pub fn new(path_id: u32, path_dir: Option<&'a dyn Directory>) -> Self {
        Self { path_id, path_dir }
    }

    /// Builds a supplier whose handle is resolved through the registry,
    /// falling back to the primary directory when `path_id` has no
    /// dedicated handle (including when no data paths exist at all).
    pub fn from_directories(path_id: u32, dirs: &'a Directories) -> Self {
        let idx = path_id as usize;
        let dir = if idx < dirs.data_dir_count() {
            dirs.data_dir(idx)
        } else {
            dirs.db_dir()
        };
        Self::new(path_id, Some(dir))
    }

    pub fn path_id(&self) -> u32 {
        self.path_id
    }

    pub(super) fn select_path_id(&self, _level: u32) -> u32 {
        self.path_id
    }

    pub(super) fn add_file_size(&mut self, _file_size: u64) {}

    /// The supplier owns a single directory, so `path_id` only shows up in
    /// the log when it disagrees with the fixed id.
    pub(super) fn fsync_db_path(&self, path_id: u32) -> Result<(), PlacementError> {
        let Some(dir) = self.path_dir else {
            return Err(PlacementError::InvalidArgument("path_dir is null".into()));
        };
        if path_id != self.path_id {
            debug!(
                requested = path_id,
                fixed = self.path_id,
                "fsync requested for foreign path id, syncing fixed directory"
            );
        }
        fsync_dir(dir, self.path_id)
    }

    pub(super) fn accept_path_id(&self, path_id: u32) -> bool {
        path_id == self.path_id
    }
}
