//! # Dirscope Capability
//!
//! Capability-scoped filesystem access for the snapshot engine.
//!
//! A capability is a handle to a single directory or file. It can enumerate
//! immediate children, open a child by name, and read file bytes — nothing
//! else. No write access, no global paths, no assumptions about enumeration
//! order. The snapshot builder only ever sees these traits, so it can be
//! driven by the real filesystem ([`FsDirectory`]) or by an in-memory fake
//! ([`MemoryDir`]) in tests.

mod error;
mod fs;
mod handle;
mod memory;

pub use error::{CapabilityError, Result};
pub use fs::{FsDirectory, FsFile};
pub use handle::{DirectoryHandle, Entry, EntryKind, FileHandle};
pub use memory::{MemoryDir, MemoryFile};
