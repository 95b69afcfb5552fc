//! Random placement.
//!
//! Each new file goes to a path id drawn uniformly from the column family's
//! effective path list. Any in-range id is an equally valid outcome, so
//! acceptance only checks the range. The draw comes from a [`PlacementRng`]
//! owned by the calling worker.

// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use super::{PathCatalog, PlacementError, fsync_dir};

// ------------------------------------------------------------------------------------------------
// Per-worker generator
// ------------------------------------------------------------------------------------------------

/// Random source for path selection, owned by one flush/compaction worker.
///
/// Each worker keeps its own generator and passes it to
/// [`PathSupplier::select_path_id`](super::PathSupplier::select_path_id),
/// so concurrent workers never contend on shared generator state.
#[derive(Debug, Clone)]
pub struct PlacementRng {
    inner: StdRng,
}

impl PlacementRng {
    /// Seeds from the wall clock in nanoseconds.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::seeded(seed)
    }

    /// Deterministic generator for reproducible placement.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: u32) -> u32 {
        self.inner.random_range(0..n)
    }
}

impl Default for PlacementRng {
    fn default() -> Self {
        Self::from_clock()
    }
}

// ------------------------------------------------------------------------------------------------
// Supplier
// ------------------------------------------------------------------------------------------------

/// Places each file in a uniformly random path id.
///
/// The path count is read from the catalog on every call rather than
/// cached, so the supplier never disagrees with its column family.
pub struct RandomPathSupplier<'a> {
    catalog: &'a dyn PathCatalog,
}

impl std::fmt::Debug for RandomPathSupplier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomPathSupplier")
            .field("path_count", &self.catalog.path_count())
            .finish()
    }
}

impl<'a> RandomPathSupplier<'a> {
    pub fn new(catalog: &'a dyn PathCatalog) -> Self {
        Self { catalog }
    }

    pub(super) fn select_path_id(
        &self,
        level: u32,
        rng: &mut PlacementRng,
    ) -> Result<u32, PlacementError> {
        let count = self.catalog.path_count();
        if count == 0 {
            return Err(PlacementError::EmptyPathList);
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let path_id = rng.below(count);
        trace!(level, path_id, path_count = count, "random path selected");
        Ok(path_id)
    }

    pub(super) fn add_file_size(&mut self, _file_size: u64) {}

    pub(super) fn fsync_db_path(&self, path_id: u32) -> Result<(), PlacementError> {
        match self.catalog.dir_for_path(path_id) {
            Some(dir) => fsync_dir(dir, path_id),
            None => Err(PlacementError::InvalidArgument(format!(
                "no dir to sync for path_id {path_id}"
            ))),
        }
    }

    pub(super) fn accept_path_id(&self, path_id: u32) -> bool {
        let count = self.catalog.path_count();
        if count == 0 {
            return path_id == 0;
        }
        (path_id as usize) < count
    }
}
