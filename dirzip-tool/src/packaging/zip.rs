use std::path::Path;

use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipDateTime, ZipEntryBuilder};
use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

use crate::error::{Error, Result};
use crate::packaging::FileEntry;

/// Compression algorithm to use when creating the ZIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compressor {
    Deflate,
    Stored,
}

impl From<Compressor> for Compression {
    fn from(c: Compressor) -> Self {
        match c {
            Compressor::Deflate => Compression::Deflate,
            Compressor::Stored => Compression::Stored,
        }
    }
}

/// Creates (or truncates) `output` and streams every entry into it, in order.
///
/// The central directory is only written once every file went in; on error
/// the partially written file is left behind unfinished.
pub async fn write_zip_async(
    compressor: Compressor,
    files: &[FileEntry],
    output: &Path,
) -> Result<()> {
    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .await
        .map_err(|source| Error::ArchiveOpen {
            path: output.to_path_buf(),
            source,
        })?;
    info!("writing {} entries to {}", files.len(), output.display());

    let mut writer = ZipFileWriter::with_tokio(target);
    for fe in files {
        append_file(&mut writer, fe, compressor.into()).await?;
    }

    let finalize_err = |source: std::io::Error| Error::Finalize {
        path: output.to_path_buf(),
        source,
    };
    let mut target = writer
        .close()
        .await
        .map_err(|e| finalize_err(std::io::Error::other(e)))?
        .into_inner();
    target.flush().await.map_err(finalize_err)?;
    Ok(())
}

async fn append_file(
    writer: &mut ZipFileWriter<File>,
    fe: &FileEntry,
    compression: Compression,
) -> Result<()> {
    let open_err = |source: std::io::Error| Error::SourceOpen {
        path: fe.path.clone(),
        source,
    };
    let copy_err = |source: std::io::Error| Error::Copy {
        path: fe.path.clone(),
        source,
    };

    let f = File::open(&fe.path).await.map_err(open_err)?;
    let modified: DateTime<Utc> = f
        .metadata()
        .await
        .and_then(|m| m.modified())
        .map_err(open_err)?
        .into();

    let builder = ZipEntryBuilder::new(fe.name_in_archive.clone().into(), compression)
        .last_modification_date(ZipDateTime::from_chrono(&modified));
    let mut entry_writer =
        writer
            .write_entry_stream(builder)
            .await
            .map_err(|source| Error::EntryCreate {
                path: fe.path.clone(),
                source,
            })?;

    let written = futures::io::copy(&mut f.compat(), &mut entry_writer)
        .await
        .map_err(copy_err)?;
    entry_writer
        .close()
        .await
        .map_err(|e| copy_err(std::io::Error::other(e)))?;

    debug!("added {} ({written} bytes)", fe.name_in_archive);
    Ok(())
}
