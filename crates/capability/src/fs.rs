//! Real-filesystem capability backed by `tokio::fs`.

use crate::error::{CapabilityError, Result};
use crate::handle::{DirectoryHandle, Entry, EntryKind, FileHandle};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Directory capability rooted at a real path.
///
/// Only the subtree under the path handed to [`FsDirectory::open_root`] is
/// reachable: child handles are opened by bare name, never by caller-supplied
/// paths, so `..` and absolute paths cannot escape the root.
pub struct FsDirectory {
    name: String,
    path: PathBuf,
}

impl FsDirectory {
    /// Open a root directory capability for `path`.
    ///
    /// Fails when the path does not exist or is not a directory — this is the
    /// one error a snapshot build treats as fatal.
    pub async fn open_root(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let meta = tokio::fs::metadata(&path).await?;
        if !meta.is_dir() {
            return Err(CapabilityError::NotADirectory(path.display().to_string()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, path })
    }

    fn child_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

#[async_trait]
impl DirectoryHandle for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<Entry>> {
        let mut read_dir = tokio::fs::read_dir(&self.path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            // Symlinks and other special entries are not part of the snapshot.
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                log::debug!("skipping special entry {}", entry.path().display());
                continue;
            };
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    async fn open_dir(&self, name: &str) -> Result<Box<dyn DirectoryHandle>> {
        let path = self.child_path(name);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| CapabilityError::NotFound(name.to_string()))?;
        if !meta.is_dir() {
            return Err(CapabilityError::NotADirectory(name.to_string()));
        }
        Ok(Box::new(FsDirectory {
            name: name.to_string(),
            path,
        }))
    }

    async fn open_file(&self, name: &str) -> Result<Box<dyn FileHandle>> {
        let path = self.child_path(name);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|_| CapabilityError::NotFound(name.to_string()))?;
        if !meta.is_file() {
            return Err(CapabilityError::NotAFile(name.to_string()));
        }
        Ok(Box::new(FsFile {
            name: name.to_string(),
            path,
        }))
    }
}

/// File capability over a real path.
pub struct FsFile {
    name: String,
    path: PathBuf,
}

#[async_trait]
impl FileHandle for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn size(&self) -> Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }

    async fn read_text(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        String::from_utf8(bytes)
            .map_err(|_| CapabilityError::NotUtf8(self.path.display().to_string()))
    }

    async fn read_prefix(&self, max_bytes: usize) -> Result<String> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut buf = Vec::with_capacity(max_bytes);
        file.take(max_bytes as u64).read_to_end(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn enumerates_files_and_directories() {
        let temp = tempdir().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

        let root = FsDirectory::open_root(temp.path()).await.unwrap();
        let mut entries = root.entries().await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[tokio::test]
    async fn reads_size_text_and_prefix() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.txt"), b"hello world").unwrap();

        let root = FsDirectory::open_root(temp.path()).await.unwrap();
        let file = root.open_file("a.txt").await.unwrap();

        assert_eq!(file.size().await.unwrap(), 11);
        assert_eq!(file.read_text().await.unwrap(), "hello world");
        assert_eq!(file.read_prefix(5).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn binary_content_is_a_read_error() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("bin"), [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let root = FsDirectory::open_root(temp.path()).await.unwrap();
        let file = root.open_file("bin").await.unwrap();

        assert!(matches!(
            file.read_text().await,
            Err(CapabilityError::NotUtf8(_))
        ));
    }

    #[tokio::test]
    async fn open_root_rejects_missing_path() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(FsDirectory::open_root(&missing).await.is_err());
    }

    #[tokio::test]
    async fn open_dir_rejects_files() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.txt"), b"x").unwrap();

        let root = FsDirectory::open_root(temp.path()).await.unwrap();
        assert!(matches!(
            root.open_dir("a.txt").await,
            Err(CapabilityError::NotADirectory(_))
        ));
        assert!(matches!(
            root.open_file("missing").await,
            Err(CapabilityError::NotFound(_))
        ));
    }
}
