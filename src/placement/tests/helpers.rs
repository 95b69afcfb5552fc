use std::cell::Cell;

use crate::env::Directory;
use crate::env::tests::helpers::MockDirectory;
use crate::placement::PathCatalog;

/// Hand-built [`PathCatalog`] with a primary directory and one optional
/// handle per path.
pub struct TestCatalog {
    pub primary: MockDirectory,
    pub dirs: Vec<Option<MockDirectory>>,
    /// Overrides the reported path count while a supplier is borrowing
    /// the catalog.
    pub visible: Cell<Option<usize>>,
}

impl TestCatalog {
    /// `count` paths, all with their own handle.
    pub fn with_paths(count: usize) -> Self {
        Self {
            primary: MockDirectory::standalone("/db"),
            dirs: (0..count)
                .map(|i| Some(MockDirectory::standalone(format!("/p{i}"))))
                .collect(),
            visible: Cell::new(None),
        }
    }

    pub fn fsyncs(&self, path_id: usize) -> usize {
        self.dirs[path_id].as_ref().map_or(0, |d| d.fsync_count())
    }
}

impl PathCatalog for TestCatalog {
    fn path_count(&self) -> usize {
        self.visible.get().unwrap_or(self.dirs.len())
    }

    fn dir_for_path(&self, path_id: u32) -> Option<&dyn Directory> {
        match self.dirs.get(path_id as usize) {
            Some(Some(dir)) => Some(dir),
            Some(None) => Some(&self.primary),
            None if self.dirs.is_empty() && path_id == 0 => Some(&self.primary),
            None => None,
        }
    }
}
