//! Failures raised inside the library before they are flattened into
//! a context's `error_status` / `error_message` pair.
//!
//! Copyright (c) 2025 Posit, PBC

use std::os::raw::c_int;
use std::path::Path;

use thiserror::Error;

use crate::types::{
    SASS_STATUS_INVALID_ARGUMENT, SASS_STATUS_IO_ERROR, SASS_STATUS_STYLESHEET_ERROR,
};

#[derive(Debug, Error)]
pub(crate) enum Failure {
    /// The engine rejected the stylesheet
    #[error("{0}")]
    Stylesheet(String),

    /// Reading an input or writing an output failed
    #[error("{0}")]
    Io(String),

    /// A context field could not be used
    #[error("{0}")]
    InvalidArgument(String),
}

impl Failure {
    pub(crate) fn status(&self) -> c_int {
        match self {
            Failure::Stylesheet(_) => SASS_STATUS_STYLESHEET_ERROR,
            Failure::Io(_) => SASS_STATUS_IO_ERROR,
            Failure::InvalidArgument(_) => SASS_STATUS_INVALID_ARGUMENT,
        }
    }

    /// Prefix the message with the file it came from (folder mode).
    pub(crate) fn in_file(self, path: &Path) -> Self {
        let prefix = |message: String| format!("{}: {}", path.display(), message);
        match self {
            Failure::Stylesheet(m) => Failure::Stylesheet(prefix(m)),
            Failure::Io(m) => Failure::Io(prefix(m)),
            Failure::InvalidArgument(m) => Failure::InvalidArgument(prefix(m)),
        }
    }
}

impl From<Box<grass::Error>> for Failure {
    fn from(err: Box<grass::Error>) -> Self {
        Failure::Stylesheet(err.to_string())
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::Io(err.to_string())
    }
}
