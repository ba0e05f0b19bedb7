use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Extension given to every produced archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("root name is empty")]
    EmptyRoot,
    #[error("root {root:?} not found in path {path:?}")]
    RootNotFound { path: String, root: String },
    #[error("path {path:?} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// Returns the last component of `dir` as a string.
///
/// Fails with [`NamingError::EmptyRoot`] for paths without a final component,
/// such as `/`, and with [`NamingError::NotUtf8`] when the name is not UTF-8.
pub fn base_name(dir: &Path) -> Result<String, NamingError> {
    let name = match dir.file_name() {
        Some(n) => utf8(Path::new(n))?,
        None => "",
    };
    if name.is_empty() {
        return Err(NamingError::EmptyRoot);
    }
    Ok(name.to_string())
}

/// Borrows `path` as `&str`, refusing anything a lossy conversion would
/// alter: two distinct names must never map to the same entry.
pub fn utf8(path: &Path) -> Result<&str, NamingError> {
    path.to_str().ok_or_else(|| NamingError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// `<root>.zip`
pub fn archive_file_name(root: &str) -> Result<String, NamingError> {
    if root.is_empty() {
        return Err(NamingError::EmptyRoot);
    }
    Ok(format!("{root}.{ARCHIVE_EXTENSION}"))
}

/// Strips everything up to and including the first occurrence of `root` in
/// `path`, then one leading separator.
///
/// The match is on the raw string, so `root` may hit inside an unrelated
/// segment (`foo-dst/` matches `dst`). Callers that want a segment-exact
/// result should pass a path that starts with `root`.
///
/// The result always uses `/` as separator, which is how zip stores names.
pub fn path_relative_to_root(path: &str, root: &str) -> Result<String, NamingError> {
    if root.is_empty() {
        return Err(NamingError::EmptyRoot);
    }
    let idx = path.find(root).ok_or_else(|| NamingError::RootNotFound {
        path: path.to_string(),
        root: root.to_string(),
    })?;

    let rest = &path[idx + root.len()..];
    let rest = rest
        .strip_prefix('/')
        .or_else(|| rest.strip_prefix(MAIN_SEPARATOR))
        .unwrap_or(rest);

    if MAIN_SEPARATOR == '/' {
        Ok(rest.to_string())
    } else {
        Ok(rest.replace(MAIN_SEPARATOR, "/"))
    }
}
