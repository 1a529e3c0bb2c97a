//! File storage behind the `/files/` routes.
//!
//! Names are joined onto the configured root, with any leading `/` dropped.
//! Nothing here rejects `..` segments, so the root is a convenience and not
//! a sandbox.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Byte-level file access used by the files handler.
pub trait Storage: Send + Sync {
    /// Reads the whole file called `name`.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Creates or truncates `name` and writes `contents` to it.
    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()>;
}

/// [`Storage`] rooted at a directory on the local file system.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Leading slashes are dropped so an absolute-looking name still lands
    /// under the root. `..` segments are left alone.
    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name.trim_start_matches('/'))
    }
}

impl Storage for DirStorage {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(name))
    }

    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::write(self.resolve(name), contents)
    }
}
