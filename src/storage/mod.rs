//! Non-volatile key/value storage and debounced save scheduling

mod saver;

pub use saver::{Debouncer, SaveScheduler, SaveTiming};

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opaque blob storage addressed by key.
///
/// The store knows nothing about what it holds; the engine hands it bytes
/// to write and receives bytes on load.
pub trait KvStore: Send {
    /// Read the blob under `key`, or `None` if nothing was ever written
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replace the blob under `key`
    fn save(&mut self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// One file per key below a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data_dir>/keystroke-stats`, or `None` if the platform has no data dir
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("keystroke-stats"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in key.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path.set_extension("bin");
        path
    }
}

impl KvStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // write beside the target, then swap it in
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

/// In-process store. Clones share contents, so a test can keep a handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.inner.lock().writes
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.lock().values.get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: Vec<u8>) {
        self.inner.lock().values.insert(key.to_string(), value);
    }

    /// Make subsequent writes fail with an I/O error
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }
}

impl KvStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure"));
        }
        inner.values.insert(key.to_string(), value.to_vec());
        inner.writes += 1;
        Ok(())
    }
}
