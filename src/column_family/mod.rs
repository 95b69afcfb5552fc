//! # Column-Family Paths
//!
//! [`ColumnFamilyPaths`] is the column family's share of the placement
//! subsystem: its effective path list, the directory handles it opened for
//! its own `cf_paths`, and a borrowed reference to the database-wide
//! [`Directories`] registry.
//!
//! It implements [`PathCatalog`], which is all a
//! [`RandomPathSupplier`](crate::RandomPathSupplier) needs, and builds the
//! supplier configured by [`ColumnFamilyOptions::path_policy`].
//!
//! ## Effective path list
//!
//! A column family with its own `cf_paths` places files only there.
//! Otherwise it shares the database-wide `db_paths`. With neither, the only
//! legal path id is `0`, meaning the primary database directory.
//!
//! ## Directory resolution
//!
//! | cf_paths | path_id | resolves to |
//! |---|---|---|
//! | non-empty | `< cf_paths.len()` | cf handle, else primary |
//! | empty | `< db_paths.len()` | registry data handle (with its fallback) |
//! | both empty | `0` | primary |
//! | any | otherwise | nothing |

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{ColumnFamilyOptions, DbPath, PathPolicy};
use crate::directories::Directories;
use crate::env::{Directory, Env, create_and_new_directory};
use crate::placement::{
    FixedPathSupplier, PathCatalog, PathSupplier, PlacementError, RandomPathSupplier,
    effective_path_count,
};

// ------------------------------------------------------------------------------------------------
// Column family paths
// ------------------------------------------------------------------------------------------------

/// Path list and directory table of one column family.
pub struct ColumnFamilyPaths<'a> {
    name: String,
    cf_paths: Vec<DbPath>,
    cf_dirs: Vec<Option<Box<dyn Directory>>>,
    path_policy: PathPolicy,
    dirs: &'a Directories,
}

impl std::fmt::Debug for ColumnFamilyPaths<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnFamilyPaths")
            .field("name", &self.name)
            .field("cf_paths", &self.cf_paths)
            .field("db_paths", &self.dirs.data_paths())
            .field("path_policy", &self.path_policy)
            .finish_non_exhaustive()
    }
}

impl<'a> ColumnFamilyPaths<'a> {
    /// Opens one directory per cf path and binds the column family to the
    /// database registry.
    ///
    /// The shared `db_paths` are the ones `dirs` was opened with. A cf path
    /// that cannot be opened, or that is the primary directory, leaves an
    /// empty slot resolving to the primary directory.
    ///
    /// # Errors
    ///
    /// [`PlacementError::Directory`] if `options` fail validation.
    pub fn open(
        env: &dyn Env,
        name: impl Into<String>,
        options: &ColumnFamilyOptions,
        dirs: &'a Directories,
    ) -> Result<Self, PlacementError> {
        options.validate()?;

        let name = name.into();
        let primary = dirs.db_dir().path();
        let mut cf_dirs = Vec::with_capacity(options.cf_paths.len());
        for (path_id, cf_path) in options.cf_paths.iter().enumerate() {
            if cf_path.path.as_path() == primary {
                debug!(cf = %name, path_id, "cf path is the primary directory");
                cf_dirs.push(None);
                continue;
            }
            match create_and_new_directory(env, &cf_path.path, options.create_if_missing) {
                Ok(dir) => cf_dirs.push(Some(dir)),
                Err(e) => {
                    warn!(
                        cf = %name,
                        path_id,
                        path = %cf_path.path.display(),
                        %e,
                        "failed to open cf path, falling back to primary directory"
                    );
                    cf_dirs.push(None);
                }
            }
        }

        info!(
            cf = %name,
            cf_paths = options.cf_paths.len(),
            db_paths = dirs.data_dir_count(),
            policy = ?options.path_policy,
            "column family paths opened"
        );

        Ok(Self {
            name,
            cf_paths: options.cf_paths.clone(),
            cf_dirs,
            path_policy: options.path_policy,
            dirs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured policy.
    pub fn path_policy(&self) -> PathPolicy {
        self.path_policy
    }

    /// The effective path list: `cf_paths` when non-empty, else `db_paths`.
    pub fn effective_paths(&self) -> &[DbPath] {
        if self.cf_paths.is_empty() {
            self.dirs.data_paths()
        } else {
            &self.cf_paths
        }
    }

    /// Directory new files with `path_id` are written under.
    ///
    /// With no configured paths, path id `0` is the primary directory.
    pub fn data_path(&self, path_id: u32) -> Option<&Path> {
        let paths = self.effective_paths();
        if paths.is_empty() && path_id == 0 {
            return Some(self.dirs.db_dir().path());
        }
        paths.get(path_id as usize).map(|p| p.path.as_path())
    }

    /// Builds the supplier for the configured [`PathPolicy`].
    pub fn path_supplier(&self) -> Result<PathSupplier<'_>, PlacementError> {
        self.path_supplier_with(self.path_policy)
    }

    /// Builds a supplier for an explicit policy.
    ///
    /// # Errors
    ///
    /// [`PlacementError::InvalidArgument`] if a fixed path id lies outside
    /// the effective path list.
    pub fn path_supplier_with(
        &self,
        policy: PathPolicy,
    ) -> Result<PathSupplier<'_>, PlacementError> {
        match policy {
            PathPolicy::Fixed(path_id) => {
                let Some(dir) = self.dir_for_path(path_id) else {
                    return Err(PlacementError::InvalidArgument(format!(
                        "fixed path_id {path_id} out of range for column family {} ({} paths)",
                        self.name,
                        self.path_count()
                    )));
                };
                Ok(FixedPathSupplier::new(path_id, Some(dir)).into())
            }
            PathPolicy::Random => Ok(RandomPathSupplier::new(self).into()),
        }
    }
}

impl PathCatalog for ColumnFamilyPaths<'_> {
    fn path_count(&self) -> usize {
        effective_path_count(self.cf_paths.len(), self.dirs.data_dir_count())
    }

    fn dir_for_path(&self, path_id: u32) -> Option<&dyn Directory> {
        let idx = path_id as usize;
        if !self.cf_dirs.is_empty() {
            return match self.cf_dirs.get(idx) {
                Some(Some(dir)) => Some(dir.as_ref()),
                Some(None) => Some(self.dirs.db_dir()),
                None => None,
            };
        }
        if idx < self.dirs.data_dir_count() {
            return Some(self.dirs.data_dir(idx));
        }
        if self.dirs.data_dir_count() == 0 && idx == 0 {
            return Some(self.dirs.db_dir());
        }
        None
    }
}
