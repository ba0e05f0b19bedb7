use std::path::{Path, PathBuf};

use dirzip_lib::Config;
use dirzip_lib::naming::{archive_file_name, base_name};
use log::info;

use crate::error::Result;
use crate::packaging::zip::Compressor;
use crate::packaging::{create_zip_sync, prepare_entries};

/// What a run did with the collected files.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Archive written to the path.
    Written(PathBuf),
    /// Dry run; the archive would have gone to the path.
    DryRun(PathBuf),
}

/// `<output_dir>/<base name of target>.zip`
pub fn output_path(config: &Config, target: &Path) -> Result<PathBuf> {
    let dir = config
        .output_dir
        .as_deref()
        .unwrap_or(Config::DEFAULT_OUTPUT_DIR);
    let name = archive_file_name(&base_name(target)?)?;
    Ok(Path::new(dir).join(name))
}

pub fn process_files(config: &Config, target: &Path, files: Vec<PathBuf>) -> Result<Outcome> {
    let output = output_path(config, target)?;
    let entries = prepare_entries(target, files)?;

    if config.dry == Some(true) {
        println!(
            "Dry run - would create archive with {} files",
            entries.len()
        );
        for fe in &entries {
            println!("  {} -> {}", fe.path.display(), fe.name_in_archive);
        }
        println!("Output: {}", output.display());
        return Ok(Outcome::DryRun(output));
    }

    let compressor = if config.compress.unwrap_or(true) {
        Compressor::Deflate
    } else {
        Compressor::Stored
    };
    info!("compressing with {compressor:?}");

    create_zip_sync(compressor, &entries, &output)?;
    Ok(Outcome::Written(output))
}
