// src/launch/resolve.rs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Locate `program` the way `execvp` would, without running it.
///
/// Names containing a path separator are checked as-is; bare names are
/// searched in `path_var` (normally `$PATH`). Only used for reporting: the
/// actual launch still lets the OS do its own lookup.
pub fn resolve_program(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&p, std::fs::Permissions::from_mode(mode)).unwrap();
        p
    }

    #[test]
    fn finds_executable_on_search_path() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        make_file(a.path(), "nginx", 0o644);
        let expected = make_file(b.path(), "nginx", 0o755);

        let path_var = std::env::join_paths([a.path(), b.path()]).unwrap();
        assert_eq!(resolve_program("nginx", Some(path_var.as_os_str())), Some(expected));
    }

    #[test]
    fn explicit_path_is_not_searched() {
        let dir = tempfile::tempdir().unwrap();
        let exe = make_file(dir.path(), "srv", 0o755);
        let exe_str = exe.to_string_lossy().into_owned();

        assert_eq!(resolve_program(&exe_str, None), Some(exe));
        assert_eq!(resolve_program("./does-not-exist", None), None);
    }

    #[test]
    fn missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(resolve_program("nginx", Some(path_var.as_os_str())), None);
        assert_eq!(resolve_program("nginx", None), None);
    }
}
