//! In-memory storage for embedding and tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::io;

use super::Storage;

/// Map-backed storage. Every call yields to the scheduler once, the way a
/// real host's I/O would suspend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    dirs: RefCell<BTreeSet<String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a file without counting it as a write
    pub fn insert(&self, path: &str, contents: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.to_string(), contents.into());
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    /// Number of successful `write` calls
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Make every following `write` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn has_dir(&self, dir: &str) -> bool {
        let prefix = format!("{}/", dir);
        self.dirs.borrow().contains(dir) || self.files.borrow().keys().any(|p| p.starts_with(&prefix))
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path))
}

impl Storage for MemoryStorage {
    async fn exists(&self, path: &str) -> bool {
        tokio::task::yield_now().await;
        self.files.borrow().contains_key(path) || self.has_dir(path)
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::task::yield_now().await;
        self.get(path).ok_or_else(|| not_found(path))
    }

    async fn write(&self, path: &str, contents: &str) -> io::Result<()> {
        tokio::task::yield_now().await;
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only"));
        }
        self.insert(path, contents.as_bytes());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    async fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        tokio::task::yield_now().await;
        if !self.has_dir(dir) {
            return Err(not_found(dir));
        }
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.strip_prefix(&prefix).is_some_and(|rest| !rest.contains('/')))
            .cloned()
            .collect())
    }

    async fn mkdir(&self, path: &str) -> io::Result<()> {
        tokio::task::yield_now().await;
        self.dirs.borrow_mut().insert(path.trim_end_matches('/').to_string());
        Ok(())
    }
}
