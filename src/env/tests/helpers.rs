use crate::env::{Directory, Env};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber controlled by `RUST_LOG` env var.
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct MockEnvState {
    created: Vec<PathBuf>,
    opened: Vec<PathBuf>,
    fail_open: HashSet<PathBuf>,
    fail_fsync: HashSet<PathBuf>,
    fsyncs: HashMap<PathBuf, Arc<AtomicUsize>>,
}

/// In-memory [`Env`] that records every call and can inject failures.
///
/// Each opened directory shares an fsync counter keyed by path, so a test
/// can ask how many barriers were issued against a directory regardless of
/// which handle issued them.
#[derive(Default)]
pub struct MockEnv {
    state: Mutex<MockEnvState>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `new_directory(path)` fail with `PermissionDenied`.
    pub fn fail_open(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.fail_open.insert(path.as_ref().to_path_buf());
    }

    /// Makes `fsync` on any handle for `path` fail with an I/O error.
    pub fn fail_fsync(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.fail_fsync.insert(path.as_ref().to_path_buf());
    }

    pub fn fsync_count(&self, path: impl AsRef<Path>) -> usize {
        let state = self.state.lock().unwrap();
        state
            .fsyncs
            .get(path.as_ref())
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_fsyncs(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.fsyncs.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    pub fn created(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().opened.clone()
    }
}

impl Env for MockEnv {
    fn create_dir_if_missing(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.created.push(path.to_path_buf());
        Ok(())
    }

    fn new_directory(&self, path: &Path) -> io::Result<Box<dyn Directory>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_open.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected open failure for {}", path.display()),
            ));
        }
        state.opened.push(path.to_path_buf());
        let counter = Arc::clone(state.fsyncs.entry(path.to_path_buf()).or_default());
        Ok(Box::new(MockDirectory {
            path: path.to_path_buf(),
            fsyncs: counter,
            fail_fsync: state.fail_fsync.contains(path),
        }))
    }
}

/// Directory handle produced by [`MockEnv`].
pub struct MockDirectory {
    path: PathBuf,
    fsyncs: Arc<AtomicUsize>,
    fail_fsync: bool,
}

impl MockDirectory {
    /// A standalone handle not tied to any env, for strategy-level tests.
    pub fn standalone(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fsyncs: Arc::new(AtomicUsize::new(0)),
            fail_fsync: false,
        }
    }

    pub fn failing(path: impl AsRef<Path>) -> Self {
        Self {
            fail_fsync: true,
            ..Self::standalone(path)
        }
    }

    pub fn fsync_count(&self) -> usize {
        self.fsyncs.load(Ordering::SeqCst)
    }
}

impl Directory for MockDirectory {
    fn fsync(&self) -> io::Result<()> {
        if self.fail_fsync {
            return Err(io::Error::other(format!(
                "injected fsync failure for {}",
                self.path.display()
            )));
        }
        self.fsyncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Returns `true` when both references point at the same handle object.
pub fn same_dir(a: &dyn Directory, b: &dyn Directory) -> bool {
    std::ptr::addr_eq(a, b)
}
