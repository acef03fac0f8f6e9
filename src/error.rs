use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can abort a `fetch`.
#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable directory or ignore file, permission denial, missing start path.
    #[error("could not access {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An ignore rule that does not compile as a glob.
    #[error("{}: invalid pattern `{pattern}`: {source}", .file.display())]
    MalformedPattern {
        file: PathBuf,
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn fs(path: &Path, source: io::Error) -> Self {
        Error::Filesystem { path: path.to_path_buf(), source }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        Error::Filesystem { path, source: io::Error::from(err) }
    }
}
