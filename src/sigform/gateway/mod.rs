//! Persistence gateway: where documents live and how their bytes move.
//!
//! The store never touches storage itself; sessions go through this trait
//! so the same editing logic runs against the real profile directory
//! ([`fs::FsGateway`]) or an in-memory map in tests ([`memory::MemoryGateway`]).
//!
//! Methods take `&self`; backends handle their own interior mutability.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::DocKind;

pub mod fs;
pub mod memory;

pub use fs::FsGateway;
pub use memory::MemoryGateway;

pub trait PersistenceGateway {
    /// Resolves the backing resource for a document kind. Pure name
    /// resolution; the resource may not exist yet.
    fn resolve(&self, kind: DocKind) -> PathBuf;

    /// Reads a resource. `Ok(None)` when it does not exist; any other
    /// failure is an error.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Writes a serialized document, replacing the previous contents.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}
