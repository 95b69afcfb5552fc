//! # Aeternus Placement
//!
//! Multi-path SSTable placement for an **LSM-tree** storage engine. Decides
//! which configured data directory each new file of a column family goes
//! to, and owns the directory handles used to make file creation and
//! renames durable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aeternus_placement::{
//!     ColumnFamilyOptions, ColumnFamilyPaths, DbPath, Directories, DirectoryConfig, FsEnv,
//!     PathPolicy, PlacementRng,
//! };
//!
//! let config = DirectoryConfig {
//!     db_name: "/tmp/my_db".into(),
//!     db_paths: vec![DbPath::new("/data/a", 0), DbPath::new("/data/b", 0)],
//!     ..DirectoryConfig::default()
//! };
//! let dirs = Directories::open(&FsEnv, &config).unwrap();
//!
//! let options = ColumnFamilyOptions {
//!     path_policy: PathPolicy::Random,
//!     ..ColumnFamilyOptions::default()
//! };
//! let cf = ColumnFamilyPaths::open(&FsEnv, "default", &options, &dirs).unwrap();
//!
//! // Each flush/compaction worker owns its generator.
//! let mut rng = PlacementRng::from_clock();
//!
//! let supplier = cf.path_supplier().unwrap();
//! let path_id = supplier.select_path_id(0, &mut rng).unwrap();
//! // ... write the SSTable under cf.data_path(path_id) ...
//! supplier.fsync_db_path(path_id).unwrap();
//!
//! // Later, during compaction:
//! assert!(supplier.accept_path_id(path_id));
//! ```
//!
//! ## Components
//!
//! - [`Directories`]: primary, WAL and per-data-path directory handles with
//!   fallback to the primary directory.
//! - [`PathSupplier`]: fixed or random placement policy, plus the trivial-move
//!   acceptance rule that must agree with it.
//! - [`ColumnFamilyPaths`]: a column family's effective path list and its
//!   [`PathCatalog`] implementation.
//! - [`Env`] / [`Directory`]: the filesystem surface, with a `std::fs`
//!   implementation in [`FsEnv`].
//!
//! ## Locking
//!
//! Nothing in this crate takes a lock. Callers serialize access to a column
//! family's supplier the same way they serialize the rest of the column
//! family's mutable state. The registry is read-only once opened.

pub mod column_family;
pub mod config;
pub mod directories;
pub mod env;
pub mod placement;

pub use column_family::ColumnFamilyPaths;
pub use config::{ColumnFamilyOptions, DbPath, DirectoryConfig, PathPolicy};
pub use directories::{Directories, DirectoryError};
pub use env::{Directory, Env, FsDirectory, FsEnv};
pub use placement::{
    FixedPathSupplier, PathCatalog, PathSupplier, PlacementError, PlacementRng,
    RandomPathSupplier, effective_path_count,
};
