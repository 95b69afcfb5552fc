//! # Directory Registry
//!
//! [`Directories`] owns every directory handle a database needs for
//! durability barriers:
//!
//! - the **primary** database directory (always present),
//! - one slot per configured **data path** (a slot may be empty),
//! - an optional **WAL** directory.
//!
//! ## Fallback rule
//!
//! An empty data slot, or an absent WAL handle, resolves to the primary
//! handle. Callers therefore always get a usable directory back and never
//! have to special-case unopened paths.
//!
//! A data slot is left empty when:
//!
//! - the data path is the primary directory itself, or
//! - opening the data path failed (logged, not fatal).
//!
//! ## Lifecycle
//!
//! Opened once with the database and dropped once on close. Handles are
//! never replaced while the registry is alive, so references handed out by
//! the resolve methods stay valid for the registry's lifetime.
//!
//! ## Thread safety
//!
//! The registry holds no locks. After [`Directories::open`] returns it is
//! read-only and may be shared (`&Directories` / `Arc<Directories>`) by any
//! number of placement suppliers.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{io, path::Path};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{DbPath, DirectoryConfig};
use crate::env::{Directory, Env, create_and_new_directory};

// ------------------------------------------------------------------------------------------------
// Error Types
// ------------------------------------------------------------------------------------------------

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Underlying I/O error while opening or syncing a directory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

// ------------------------------------------------------------------------------------------------
// Registry
// ------------------------------------------------------------------------------------------------

/// Directory handles for the primary, WAL and data directories of a database.
pub struct Directories {
    db_dir: Box<dyn Directory>,
    data_paths: Vec<DbPath>,
    data_dirs: Vec<Option<Box<dyn Directory>>>,
    wal_dir: Option<Box<dyn Directory>>,
}

impl std::fmt::Debug for Directories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directories")
            .field("db_dir", &self.db_dir.path())
            .field("data_paths", &self.data_paths)
            .field(
                "data_dirs",
                &self
                    .data_dirs
                    .iter()
                    .map(|d| d.as_ref().map(|d| d.path()))
                    .collect::<Vec<_>>(),
            )
            .field("wal_dir", &self.wal_dir.as_ref().map(|d| d.path()))
            .finish()
    }
}

impl Directories {
    /// Validates `config` and opens all directories it names.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::InvalidConfig`] if validation fails.
    /// - [`DirectoryError::Io`] if the primary or a distinct WAL directory
    ///   cannot be created or opened.
    pub fn open(env: &dyn Env, config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        config.validate()?;
        Self::set_directories(
            env,
            &config.db_name,
            config.wal_dir.as_deref(),
            &config.db_paths,
            config.create_if_missing,
        )
    }

    /// Opens the primary directory, the WAL directory (only when it differs
    /// from `db_name`) and one slot per entry of `data_paths`.
    ///
    /// A data path that cannot be opened leaves an empty slot and a warning
    /// in the log. Resolving that slot later yields the primary directory.
    pub fn set_directories(
        env: &dyn Env,
        db_name: &Path,
        wal_dir: Option<&Path>,
        data_paths: &[DbPath],
        create_if_missing: bool,
    ) -> Result<Self, DirectoryError> {
        let db_dir = create_and_new_directory(env, db_name, create_if_missing)?;

        let wal_dir = match wal_dir {
            Some(wal) if !wal.as_os_str().is_empty() && wal != db_name => {
                Some(create_and_new_directory(env, wal, create_if_missing)?)
            }
            _ => None,
        };

        let mut data_dirs = Vec::with_capacity(data_paths.len());
        for (path_id, data_path) in data_paths.iter().enumerate() {
            if data_path.path.as_path() == db_name {
                debug!(path_id, "data path is the primary directory");
                data_dirs.push(None);
                continue;
            }
            match create_and_new_directory(env, &data_path.path, create_if_missing) {
                Ok(dir) => data_dirs.push(Some(dir)),
                Err(e) => {
                    warn!(
                        path_id,
                        path = %data_path.path.display(),
                        %e,
                        "failed to open data path, falling back to primary directory"
                    );
                    data_dirs.push(None);
                }
            }
        }
        debug_assert_eq!(data_dirs.len(), data_paths.len());

        info!(
            db = %db_name.display(),
            data_paths = data_dirs.len(),
            opened = data_dirs.iter().filter(|d| d.is_some()).count(),
            separate_wal = wal_dir.is_some(),
            "directories opened"
        );

        Ok(Self {
            db_dir,
            data_paths: data_paths.to_vec(),
            data_dirs,
            wal_dir,
        })
    }

    /// Returns the handle for `path_id`, or the primary handle if that slot
    /// was never opened.
    ///
    /// `path_id` must be below [`data_dir_count`](Self::data_dir_count).
    /// Debug builds assert this; release builds fall back to the primary
    /// handle.
    pub fn data_dir(&self, path_id: usize) -> &dyn Directory {
        debug_assert!(
            path_id < self.data_dirs.len(),
            "path_id {path_id} out of range ({} data paths)",
            self.data_dirs.len()
        );
        match self.data_dirs.get(path_id) {
            Some(Some(dir)) => dir.as_ref(),
            _ => self.db_dir.as_ref(),
        }
    }

    /// The data paths this registry was opened with, one per slot.
    pub fn data_paths(&self) -> &[DbPath] {
        &self.data_paths
    }

    /// Returns the WAL handle, or the primary handle if the WAL shares it.
    pub fn wal_dir(&self) -> &dyn Directory {
        match &self.wal_dir {
            Some(dir) => dir.as_ref(),
            None => self.db_dir.as_ref(),
        }
    }

    /// Returns the primary database directory handle.
    pub fn db_dir(&self) -> &dyn Directory {
        self.db_dir.as_ref()
    }

    /// Number of data-path slots (opened or not).
    pub fn data_dir_count(&self) -> usize {
        self.data_dirs.len()
    }

    /// Whether a dedicated handle was opened for `path_id`.
    pub fn has_data_dir(&self, path_id: usize) -> bool {
        matches!(self.data_dirs.get(path_id), Some(Some(_)))
    }

    /// Fsyncs every distinct handle once: primary, WAL, then each opened
    /// data directory. Stops at the first failure.
    pub fn fsync_all(&self) -> Result<(), DirectoryError> {
        self.db_dir.fsync()?;
        if let Some(wal) = &self.wal_dir {
            wal.fsync()?;
        }
        for dir in self.data_dirs.iter().flatten() {
            dir.fsync()?;
        }
        Ok(())
    }
}
