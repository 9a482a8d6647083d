//! In-memory capability fake for tests.
//!
//! Builds a scriptable directory tree with insertion-ordered enumeration and
//! failure injection: a directory can refuse enumeration, a file can refuse
//! reads or lie about its size. Read counters are shared across clones so a
//! test can assert that skipped files were never read.

use crate::error::{CapabilityError, Result};
use crate::handle::{DirectoryHandle, Entry, EntryKind, FileHandle};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
enum MemoryChild {
    Dir(MemoryDir),
    File(MemoryFile),
}

/// In-memory directory. Children enumerate in insertion order.
#[derive(Clone)]
pub struct MemoryDir {
    name: String,
    children: Vec<MemoryChild>,
    deny_enumeration: bool,
}

impl MemoryDir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            deny_enumeration: false,
        }
    }

    pub fn with_dir(mut self, dir: MemoryDir) -> Self {
        self.children.push(MemoryChild::Dir(dir));
        self
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.children.push(MemoryChild::File(file));
        self
    }

    /// Make `entries()` fail, simulating revoked permission on a subtree.
    pub fn deny_enumeration(mut self) -> Self {
        self.deny_enumeration = true;
        self
    }
}

#[async_trait]
impl DirectoryHandle for MemoryDir {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<Entry>> {
        if self.deny_enumeration {
            return Err(CapabilityError::Denied(self.name.clone()));
        }
        Ok(self
            .children
            .iter()
            .map(|child| match child {
                MemoryChild::Dir(d) => Entry {
                    name: d.name.clone(),
                    kind: EntryKind::Directory,
                },
                MemoryChild::File(f) => Entry {
                    name: f.name.clone(),
                    kind: EntryKind::File,
                },
            })
            .collect())
    }

    async fn open_dir(&self, name: &str) -> Result<Box<dyn DirectoryHandle>> {
        for child in &self.children {
            if let MemoryChild::Dir(d) = child {
                if d.name == name {
                    return Ok(Box::new(d.clone()));
                }
            }
        }
        Err(CapabilityError::NotFound(name.to_string()))
    }

    async fn open_file(&self, name: &str) -> Result<Box<dyn FileHandle>> {
        for child in &self.children {
            if let MemoryChild::File(f) = child {
                if f.name == name {
                    return Ok(Box::new(f.clone()));
                }
            }
        }
        Err(CapabilityError::NotFound(name.to_string()))
    }
}

/// In-memory file with failure injection.
#[derive(Clone)]
pub struct MemoryFile {
    name: String,
    content: Arc<Vec<u8>>,
    reported_size: Option<u64>,
    fail_read: bool,
    reads: Arc<AtomicU64>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Arc::new(content.into()),
            reported_size: None,
            fail_read: false,
            reads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Report this size instead of the content length. Lets a tiny fixture
    /// stand in for a multi-megabyte file when only the size matters.
    pub fn with_reported_size(mut self, size: u64) -> Self {
        self.reported_size = Some(size);
        self
    }

    /// Make every read fail, simulating permission loss or an IO error.
    pub fn unreadable(mut self) -> Self {
        self.fail_read = true;
        self
    }

    /// Shared read counter; clones of this file update the same counter.
    pub fn read_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.reads)
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn size(&self) -> Result<u64> {
        Ok(self.reported_size.unwrap_or(self.content.len() as u64))
    }

    async fn read_text(&self) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            return Err(CapabilityError::Denied(self.name.clone()));
        }
        String::from_utf8(self.content.as_ref().clone())
            .map_err(|_| CapabilityError::NotUtf8(self.name.clone()))
    }

    async fn read_prefix(&self, max_bytes: usize) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            return Err(CapabilityError::Denied(self.name.clone()));
        }
        let end = max_bytes.min(self.content.len());
        Ok(String::from_utf8_lossy(&self.content[..end]).into_owned())
    }
}
