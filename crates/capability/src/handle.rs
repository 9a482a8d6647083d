use crate::error::Result;
use async_trait::async_trait;

/// Kind of a directory entry as reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a directory, as delivered by [`DirectoryHandle::entries`].
///
/// Enumeration order is whatever the underlying capability delivers — callers
/// must not assume it is sorted.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Read-only capability over a single directory.
#[async_trait]
pub trait DirectoryHandle: Send + Sync {
    /// Name of this directory (last path component, not a full path).
    fn name(&self) -> &str;

    /// Enumerate immediate children.
    async fn entries(&self) -> Result<Vec<Entry>>;

    /// Open a child directory by name.
    async fn open_dir(&self, name: &str) -> Result<Box<dyn DirectoryHandle>>;

    /// Open a child file by name.
    async fn open_file(&self, name: &str) -> Result<Box<dyn FileHandle>>;
}

/// Read-only capability over a single file.
#[async_trait]
pub trait FileHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Byte size of the file without reading its contents.
    async fn size(&self) -> Result<u64>;

    /// Read the whole file as UTF-8 text.
    async fn read_text(&self) -> Result<String>;

    /// Read at most `max_bytes` from the start of the file.
    ///
    /// Decodes lossily: a multi-byte code point cut at the boundary becomes a
    /// replacement character instead of shifting the byte budget.
    async fn read_prefix(&self, max_bytes: usize) -> Result<String>;
}
