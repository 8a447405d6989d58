//! Filesystem gateway over a profile directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::gateway::PersistenceGateway;
use crate::model::DocKind;

/// Reads and writes documents under a profile directory.
#[derive(Debug, Clone)]
pub struct FsGateway {
    profile_dir: PathBuf,
}

impl FsGateway {
    pub fn new(profile_dir: impl Into<PathBuf>) -> Self {
        FsGateway {
            profile_dir: profile_dir.into(),
        }
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }
}

impl PersistenceGateway for FsGateway {
    fn resolve(&self, kind: DocKind) -> PathBuf {
        self.profile_dir.join(kind.file_name())
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "document does not exist");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        debug!(path = %path.display(), bytes = contents.len(), "document written");
        Ok(())
    }
}
