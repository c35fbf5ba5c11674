// src/fs/mock.rs

use super::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory filesystem for tests.
///
/// Directories must be registered (explicitly, or implicitly by `add_file`)
/// before a `write` into them succeeds, mirroring the real implementation.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.add_dir(".");
        fs
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        let mut cur = Some(path.as_ref());
        while let Some(p) = cur {
            let p = normalise(p);
            if !state.dirs.insert(p.to_path_buf()) {
                break;
            }
            cur = p.parent();
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.lock()
            .files
            .insert(path.to_path_buf(), content.into());
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    pub fn deny_write(&self, path: impl AsRef<Path>) {
        self.lock().read_only.insert(path.as_ref().to_path_buf());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not poison every later assertion.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn normalise(p: &Path) -> &Path {
    if p.as_os_str().is_empty() {
        Path::new(".")
    } else {
        p
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.lock();
        match state.files.get(path) {
            Some(content) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None if state.dirs.contains(path) => Err(io::Error::other(format!(
                "Is a directory: {path:?}"
            ))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {path:?}"),
            )),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.lock();
        if state.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {path:?}"),
            ));
        }
        let parent = normalise(path.parent().unwrap_or(Path::new(".")));
        if !state.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory {parent:?} does not exist"),
            ));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) || state.dirs.contains(path)
    }
}
