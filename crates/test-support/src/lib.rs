//! Filesystem fixtures shared by the workspace's tests.
//!
//! A [`Fixture`] owns a temporary directory and creates entries of every
//! kind the status normalizer distinguishes. Everything is removed when the
//! fixture is dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory populated on demand.
#[derive(Debug)]
pub struct Fixture {
    root: TempDir,
}

impl Fixture {
    /// Creates an empty fixture directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            root: tempfile::tempdir()?,
        })
    }

    /// The fixture's root directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the fixture, without creating anything.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.path().join(name)
    }

    /// Writes a regular file.
    pub fn file(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Creates a subdirectory.
    pub fn dir(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.join(name);
        fs::create_dir(&path)?;
        Ok(path)
    }

    /// Creates a symlink named `name` pointing at `target`.
    #[cfg(unix)]
    pub fn symlink(&self, target: impl AsRef<Path>, name: &str) -> io::Result<PathBuf> {
        let path = self.join(name);
        std::os::unix::fs::symlink(target, &path)?;
        Ok(path)
    }

    /// Creates a named pipe.
    #[cfg(unix)]
    pub fn fifo(&self, name: &str) -> io::Result<PathBuf> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let path = self.join(name);
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains interior NUL"))?;
        // SAFETY: c_path is a valid NUL-terminated string.
        let result = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
        if result == 0 {
            Ok(path)
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Creates a Unix-domain socket node.
    ///
    /// The listener is closed right away; the node stays on disk.
    #[cfg(unix)]
    pub fn socket(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.join(name);
        let _listener = std::os::unix::net::UnixListener::bind(&path)?;
        Ok(path)
    }

    /// Creates `count` regular files named `file-{index}`, each `index + 1`
    /// bytes long.
    pub fn files(&self, count: usize) -> io::Result<Vec<PathBuf>> {
        (0..count)
            .map(|index| self.file(&format!("file-{index}"), &vec![b'x'; index + 1]))
            .collect()
    }
}
