use std::{
    env, fs,
    path::{Component, Path, PathBuf},
};

use crate::error::{Error, Result};

/// Validates `arg` as an existing, listable directory and returns it absolute
/// and lexically cleaned.
///
/// `.` and `..` segments are folded without touching the filesystem, so
/// symlinks are only followed as far as the stat call does.
pub fn resolve_target_dir(arg: &str) -> Result<PathBuf> {
    if arg.is_empty() {
        return Err(Error::InvalidArgument);
    }
    let path = Path::new(arg);

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::read_dir(path).map_err(|e| Error::NotADirectory {
                path: path.to_path_buf(),
                source: Some(e),
            })?;
        }
        Ok(_) => {
            return Err(Error::NotADirectory {
                path: path.to_path_buf(),
                source: None,
            });
        }
        Err(e) => {
            return Err(Error::NotADirectory {
                path: path.to_path_buf(),
                source: Some(e),
            });
        }
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    Ok(clean_path(&absolute))
}

/// Lexical cleanup: drops `.` and resolves `..` against the previous
/// component. `..` above the root stays at the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Recursively lists every non-directory entry under `dir`, depth first, in
/// `read_dir` order.
///
/// Directories are followed through symlinks and there is no loop detection:
/// a link back to an ancestor recurses until the OS refuses.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    walk_dir(dir, &mut result)?;
    Ok(result)
}

fn walk_dir(dir: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    let read_err = |source: std::io::Error| Error::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = dir.join(entry.file_name());

        if path.is_dir() {
            walk_dir(&path, result)?;
        } else {
            result.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn empty_argument_is_invalid() {
        assert!(matches!(resolve_target_dir(""), Err(Error::InvalidArgument)));
    }

    #[test]
    fn missing_path_is_not_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");
        let err = resolve_target_dir(missing.to_str().unwrap()).unwrap_err();
        match err {
            Error::NotADirectory { path, source } => {
                assert_eq!(path, missing);
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn regular_file_is_not_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("file.txt");
        fs::write(&file, "contents").unwrap();
        let err = resolve_target_dir(file.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { source: None, .. }));
    }

    /// Makes `dir` unreadable. Returns false when that has no effect (root).
    #[cfg(unix)]
    pub(crate) fn lock_dir(dir: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(dir).is_ok() {
            unlock_dir(dir);
            return false;
        }
        true
    }

    #[cfg(unix)]
    pub(crate) fn unlock_dir(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_directory_is_rejected_up_front() {
        let root = tempfile::tempdir().unwrap();
        let locked = root.path().join("locked");
        fs::create_dir(&locked).unwrap();
        if !lock_dir(&locked) {
            return;
        }

        let result = resolve_target_dir(locked.to_str().unwrap());
        unlock_dir(&locked);
        match result {
            Err(Error::NotADirectory { path, source }) => {
                assert_eq!(path, locked);
                assert!(source.is_some());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn resolves_dot_segments() {
        let root = tempfile::tempdir().unwrap();
        let child = root.path().join("child");
        fs::create_dir(&child).unwrap();
        let messy = root.path().join("child").join(".").join("..").join("child");

        let resolved = resolve_target_dir(messy.to_str().unwrap()).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, clean_path(&child));
    }

    #[test]
    fn clean_path_is_lexical() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean_path(Path::new("../../b")), PathBuf::from("../../b"));
        assert_eq!(clean_path(Path::new("./a/")), PathBuf::from("a"));
    }

    #[test]
    fn lists_nested_files_but_not_directories() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("file1.txt"), "file 1 contents").unwrap();
        let subdir1 = root.path().join("subdir1");
        fs::create_dir_all(subdir1.join("deeper")).unwrap();
        fs::write(subdir1.join("file2.txt"), "file 2 contents").unwrap();
        fs::write(subdir1.join("deeper").join("file3.txt"), "3").unwrap();
        fs::create_dir(root.path().join("empty")).unwrap();

        let files: BTreeSet<PathBuf> = list_files(root.path()).unwrap().into_iter().collect();
        let expected: BTreeSet<PathBuf> = [
            root.path().join("file1.txt"),
            subdir1.join("file2.txt"),
            subdir1.join("deeper").join("file3.txt"),
        ]
        .into_iter()
        .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a").join("b")).unwrap();
        assert!(list_files(root.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_discards_partial_results() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("a.txt"), "a").unwrap();
        let sub = root.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.txt"), "b").unwrap();
        if !lock_dir(&sub) {
            return;
        }

        let result = list_files(root.path());
        unlock_dir(&sub);
        match result {
            Err(Error::DirectoryRead { path, .. }) => assert_eq!(path, sub),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unreadable_directory_aborts_the_walk() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("gone");
        let err = list_files(&missing).unwrap_err();
        match err {
            Error::DirectoryRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
