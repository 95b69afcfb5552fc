//! Configuration types for directory registration and path placement.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::directories::DirectoryError;

// ------------------------------------------------------------------------------------------------
// Data paths
// ------------------------------------------------------------------------------------------------

/// One configured storage location for SSTables.
///
/// The position of a `DbPath` in its list is its **path id**.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPath {
    /// Directory the files are written to.
    pub path: PathBuf,

    /// Soft capacity hint in bytes. Carried for space-aware placement
    /// policies; the fixed and random suppliers ignore it.
    pub target_size: u64,
}

impl DbPath {
    pub fn new(path: impl Into<PathBuf>, target_size: u64) -> Self {
        Self {
            path: path.into(),
            target_size,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Directory configuration
// ------------------------------------------------------------------------------------------------

/// Everything needed to open a [`Directories`](crate::Directories) registry.
///
/// # Example
///
/// ```rust
/// use aeternus_placement::{DbPath, DirectoryConfig};
///
/// let config = DirectoryConfig {
///     db_name: "/var/lib/db".into(),
///     db_paths: vec![
///         DbPath::new("/mnt/fast", 64 << 30),
///         DbPath::new("/mnt/slow", 1 << 40),
///     ],
///     ..DirectoryConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Primary database directory. Always opened.
    pub db_name: PathBuf,

    /// Write-ahead-log directory. `None`, empty, or equal to `db_name`
    /// means the WAL shares the primary directory.
    pub wal_dir: Option<PathBuf>,

    /// Database-wide data paths, in path-id order.
    pub db_paths: Vec<DbPath>,

    /// Create missing directories before opening them.
    ///
    /// Default: `true`.
    pub create_if_missing: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            db_name: PathBuf::new(),
            wal_dir: None,
            db_paths: Vec::new(),
            create_if_missing: true,
        }
    }
}

impl DirectoryConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.db_name.as_os_str().is_empty() {
            return Err(DirectoryError::InvalidConfig(
                "db_name must not be empty".into(),
            ));
        }
        validate_paths("db_paths", &self.db_paths)
    }
}

/// Rejects empty and duplicated entries in a path list.
pub(crate) fn validate_paths(what: &str, paths: &[DbPath]) -> Result<(), DirectoryError> {
    let mut seen = HashSet::with_capacity(paths.len());
    for (id, p) in paths.iter().enumerate() {
        if p.path.as_os_str().is_empty() {
            return Err(DirectoryError::InvalidConfig(format!(
                "{what}[{id}] must not be empty"
            )));
        }
        if !seen.insert(&p.path) {
            return Err(DirectoryError::InvalidConfig(format!(
                "{what}[{id}] duplicates {}",
                p.path.display()
            )));
        }
    }
    Ok(())
}

// ------------------------------------------------------------------------------------------------
// Placement policy
// ------------------------------------------------------------------------------------------------

/// Which [`PathSupplier`](crate::PathSupplier) variant a column family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPolicy {
    /// Every file goes to one path id. Trivial moves are accepted only
    /// when the file already lives there.
    Fixed(u32),

    /// Each file goes to a uniformly random path id. Any valid id is
    /// acceptable for a trivial move.
    Random,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

// ------------------------------------------------------------------------------------------------
// Column family options
// ------------------------------------------------------------------------------------------------

/// Per-column-family placement settings.
#[derive(Debug, Clone)]
pub struct ColumnFamilyOptions {
    /// Column-family data paths. When empty, the database-wide
    /// [`DirectoryConfig::db_paths`] are used instead.
    pub cf_paths: Vec<DbPath>,

    /// Placement policy for new files.
    ///
    /// Default: [`PathPolicy::Fixed(0)`](PathPolicy::Fixed).
    pub path_policy: PathPolicy,

    /// Create missing cf path directories before opening them.
    ///
    /// Default: `true`.
    pub create_if_missing: bool,
}

impl Default for ColumnFamilyOptions {
    fn default() -> Self {
        Self {
            cf_paths: Vec::new(),
            path_policy: PathPolicy::default(),
            create_if_missing: true,
        }
    }
}

impl ColumnFamilyOptions {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        validate_paths("cf_paths", &self.cf_paths)
    }
}
