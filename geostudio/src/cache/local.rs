//! Local filesystem mirror of the object store.
//!
//! Every artifact written to the bucket is also written under the same
//! relative path below a local root directory. The mirror is the fast tier:
//! it is written first and read when the bucket cannot answer, but losing it
//! is harmless because the bucket is authoritative.
//!
//! Reads and writes run on tokio's blocking pool so the async runtime never
//! waits on the disk.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Filesystem mirror rooted at a cache directory.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    root: PathBuf,
}

impl LocalMirror {
    /// Creates a mirror rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative cache path below the root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for absolute paths or paths containing `..`,
    /// which would escape the mirror.
    pub fn path_for(&self, relative: &str) -> io::Result<PathBuf> {
        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cache path escapes the mirror: {}", relative.display()),
            ));
        }
        Ok(self.root.join(relative))
    }

    /// Writes `contents` at `relative`, creating parent directories.
    pub async fn write(&self, relative: &str, contents: Vec<u8>) -> io::Result<()> {
        let path = self.path_for(relative)?;
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, contents)
        })
        .await
        .map_err(io::Error::other)?
    }

    /// Reads the file at `relative`, or `None` if it is missing or unreadable.
    pub async fn read(&self, relative: &str) -> Option<Vec<u8>> {
        let path = self.path_for(relative).ok()?;
        tokio::task::spawn_blocking(move || std::fs::read(&path).ok())
            .await
            .ok()
            .flatten()
    }
}
