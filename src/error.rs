use std::io;
use std::path::PathBuf;

use crate::common::io_error_msg;

/// Errors raised by the reading, parsing and writing around the sort.
/// The sort itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // OS text is part of the message; no source chain.
    #[error("{}: {}", .path.display(), io_error_msg(.err))]
    Io { path: PathBuf, err: io::Error },

    #[error("{}: input is empty (expected a header line)", .path.display())]
    EmptyInput { path: PathBuf },

    #[error("invalid sort field '{0}'")]
    InvalidField(String),
}

impl Error {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            err,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
