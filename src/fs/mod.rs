// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

pub mod mock;

/// Abstract filesystem interface used by the renderer.
///
/// Errors stay as `io::Error` so callers can attach the path and keep the
/// error kind intact.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file at `path` with `contents`.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
///
/// Writes go through a temporary file in the target directory which is then
/// renamed over the destination, so readers see either the old or the new
/// file and never a partial one. The replacement keeps the previous file's
/// mode and owner; a new file gets `0666 & !umask`, as a shell redirect would.
/// Targets that cannot be renamed over (a bind-mounted file) are written in
/// place instead.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory {dir:?} does not exist"),
            ));
        }

        let existing = fs::metadata(path).ok();
        let mut tmp = temp_file_like(dir, existing.as_ref())?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;

        match tmp.persist(path) {
            Ok(_) => Ok(()),
            Err(e) if is_busy(&e.error) => {
                debug!(path = %path.display(), "target busy; writing in place");
                fs::write(path, contents)
            }
            Err(e) => Err(e.error),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(unix)]
fn temp_file_like(dir: &Path, existing: Option<&fs::Metadata>) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    // The kernel applies the umask to this mode at creation.
    let tmp = tempfile::Builder::new()
        .prefix(".confexec-")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)?;

    if let Some(meta) = existing {
        // chown first: it may clear setuid/setgid bits that set_permissions restores.
        if let Err(e) = std::os::unix::fs::chown(tmp.path(), Some(meta.uid()), Some(meta.gid())) {
            debug!(error = %e, "cannot keep owner of replaced file");
        }
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    Ok(tmp)
}

#[cfg(not(unix))]
fn temp_file_like(dir: &Path, existing: Option<&fs::Metadata>) -> io::Result<NamedTempFile> {
    let tmp = NamedTempFile::new_in(dir)?;
    if let Some(meta) = existing {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    Ok(tmp)
}

#[cfg(unix)]
fn is_busy(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EBUSY)
}

#[cfg(not(unix))]
fn is_busy(_err: &io::Error) -> bool {
    false
}
