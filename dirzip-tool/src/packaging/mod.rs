use std::path::{Path, PathBuf};

use dirzip_lib::naming::{base_name, path_relative_to_root, utf8};
use log::debug;
use tokio::runtime::Builder;

use crate::error::Result;
use crate::packaging::zip::{Compressor, write_zip_async};

pub mod zip;

/// Represents a file to include in the ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
}

/// Pairs every file under `target` with its root-relative entry name.
///
/// Names are computed on the path relative to `target`'s parent, so the
/// string handed to [`path_relative_to_root`] always starts with the target's
/// own name and ancestors cannot produce a false match.
pub fn prepare_entries(target: &Path, files: Vec<PathBuf>) -> Result<Vec<FileEntry>> {
    let root = base_name(target)?;
    let parent = target.parent();

    files
        .into_iter()
        .map(|path| -> Result<FileEntry> {
            let local = parent
                .and_then(|p| path.strip_prefix(p).ok())
                .unwrap_or(path.as_path());
            let name_in_archive = path_relative_to_root(utf8(local)?, &root)?;
            debug!("{:?} -> {}", path, name_in_archive);
            Ok(FileEntry {
                path,
                name_in_archive,
            })
        })
        .collect()
}

/// Writes `files` into a ZIP at `output`, driving the async writer on a
/// current-thread runtime.
///
/// Files are processed strictly one after another; the first failure aborts
/// the run and leaves the archive unfinished.
pub fn create_zip_sync(compressor: Compressor, files: &[FileEntry], output: &Path) -> Result<()> {
    let rt = Builder::new_current_thread().enable_all().build()?;
    rt.block_on(write_zip_async(compressor, files, output))
}
