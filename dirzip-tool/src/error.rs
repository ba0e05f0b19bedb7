use std::path::PathBuf;

use dirzip_lib::naming::NamingError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("a directory path argument is required")]
    InvalidArgument,
    #[error("{path:?} is not a directory")]
    NotADirectory {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
    #[error("reading directory {path:?}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open zip {path:?} for writing")]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("naming archive entry")]
    Naming {
        #[from]
        source: NamingError,
    },
    #[error("failed to open {path:?}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create entry for {path:?} in zip file")]
    EntryCreate {
        path: PathBuf,
        #[source]
        source: async_zip::error::ZipError,
    },
    #[error("failed to write {path:?} to zip")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to finalize zip {path:?}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
