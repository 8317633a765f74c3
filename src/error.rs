//! Error types for letterparse.

use std::io;
use thiserror::Error;

/// Result type alias for letterparse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing a letter.
///
/// Missing metadata and a degenerate body classification are not errors:
/// the first resolves to the `"None Found"` sentinel, the second falls back
/// to the width vote.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The markup converter failed or produced markup that cannot be read.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// OCR failed for a single image.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// An external program could not be started.
    #[error("Failed to run {program}: {source}")]
    Tool {
        /// Program that was invoked
        program: String,
        /// Spawn error
        #[source]
        source: io::Error,
    },

    /// Record output error.
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid options or configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecoverable failure while parsing one file.
    #[error("Failed to parse {file}: {source}")]
    Parse {
        /// File name of the source document
        file: String,
        /// Originating error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the identity of the file being parsed.
    pub fn in_file(self, file: impl Into<String>) -> Self {
        match self {
            Error::Parse { .. } => self,
            other => Error::Parse {
                file: file.into(),
                source: Box::new(other),
            },
        }
    }

    /// The originating error, unwrapping the per-file context.
    pub fn cause(&self) -> &Error {
        match self {
            Error::Parse { source, .. } => source.as_ref(),
            other => other,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Conversion(format!("malformed XML: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Conversion(format!("malformed attribute: {}", err))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}
