//! In-memory gateway for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::gateway::PersistenceGateway;
use crate::model::DocKind;

/// Keeps documents in a map under a synthetic profile root. Supports
/// simulating write failures to exercise error paths.
#[derive(Debug)]
pub struct MemoryGateway {
    profile_dir: PathBuf,
    files: RefCell<HashMap<PathBuf, String>>,
    fail_writes: RefCell<bool>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        MemoryGateway {
            profile_dir: PathBuf::from("profile"),
            files: RefCell::new(HashMap::new()),
            fail_writes: RefCell::new(false),
        }
    }

    /// Seeds a document, as if a previous run had written it.
    pub fn with_document(self, kind: DocKind, contents: &str) -> Self {
        let path = self.resolve(kind);
        self.files.borrow_mut().insert(path, contents.to_string());
        self
    }

    /// Makes every subsequent `write` fail with a permission error.
    pub fn set_simulate_write_error(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }

    /// Stored contents of a document, if any.
    pub fn contents(&self, kind: DocKind) -> Option<String> {
        self.files.borrow().get(&self.resolve(kind)).cloned()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn resolve(&self, kind: DocKind) -> PathBuf {
        self.profile_dir.join(kind.file_name())
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if *self.fail_writes.borrow() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated write error",
            )
            .into());
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseeded_document_reads_as_none() {
        let gateway = MemoryGateway::new();
        let path = gateway.resolve(DocKind::Signatures);
        assert_eq!(gateway.read(&path).unwrap(), None);
    }

    #[test]
    fn seeded_document_reads_back() {
        let gateway = MemoryGateway::new().with_document(DocKind::Texts, "<texts/>");
        let path = gateway.resolve(DocKind::Texts);
        assert_eq!(gateway.read(&path).unwrap().as_deref(), Some("<texts/>"));
    }

    #[test]
    fn simulated_write_error_surfaces() {
        let gateway = MemoryGateway::new();
        gateway.set_simulate_write_error(true);
        let path = gateway.resolve(DocKind::Texts);
        assert!(gateway.write(&path, "x").is_err());
        assert_eq!(gateway.contents(DocKind::Texts), None);
    }
}
