//! Filesystem-backed storage rooted at a vault directory

use std::io;
use std::path::PathBuf;

use tracing::debug;

use super::{join, Storage};

#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for FsStorage {
    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        tokio::fs::read_to_string(self.resolve(path)).await
    }

    async fn read_binary(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(path)).await
    }

    async fn write(&self, path: &str, contents: &str) -> io::Result<()> {
        debug!(path = %path, bytes = contents.len(), "Writing file");
        tokio::fs::write(self.resolve(path), contents).await
    }

    async fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(self.resolve(dir)).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be addressed through string paths
            if let Some(name) = entry.file_name().to_str() {
                files.push(join(dir, name));
            }
        }
        Ok(files)
    }

    async fn mkdir(&self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.resolve(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_list() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.mkdir("fonts/sub").await.unwrap();
        storage.write("fonts/a.css", "body {}").await.unwrap();
        std::fs::write(dir.path().join("fonts/b.ttf"), [1u8, 2, 3]).unwrap();

        assert!(storage.exists("fonts/a.css").await);
        assert!(!storage.exists("fonts/missing.css").await);
        assert_eq!(storage.read("fonts/a.css").await.unwrap(), "body {}");
        assert_eq!(storage.read_binary("fonts/b.ttf").await.unwrap(), vec![1, 2, 3]);

        let mut listed = storage.list("fonts").await.unwrap();
        listed.sort();
        // Directories are not listed
        assert_eq!(listed, vec!["fonts/a.css".to_string(), "fonts/b.ttf".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let err = storage.read_binary("nope.ttf").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(storage.list("nope").await.is_err());
    }
}
