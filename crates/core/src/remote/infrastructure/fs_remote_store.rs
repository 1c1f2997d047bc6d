use std::fs;
use std::path::PathBuf;

use crate::remote::domain::remote_store::RemoteStore;

/// Storage system reachable as a mounted filesystem path (NFS/SMB share
/// or a local directory in tests and the CLI).
///
/// Remote paths are resolved relative to the mount root; absolute paths
/// are re-rooted so a store can never escape its mount.
pub struct FsRemoteStore {
    root: PathBuf,
}

impl FsRemoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        self.root.join(relative)
    }
}

impl RemoteStore for FsRemoteStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::remove_file(self.resolve(path))?;
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::rename(self.resolve(from), self.resolve(to))?;
        Ok(())
    }
}
