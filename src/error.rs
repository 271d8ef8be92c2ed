//! Error types for the xlsxpack library.

use std::io;
use thiserror::Error;

/// Result type alias for xlsxpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced source path or part is absent.
    NotFound,
    /// Malformed part content.
    Parse,
    /// A medium with neither an in-memory buffer nor a filesystem path.
    UnsupportedMedia,
    /// Underlying sink or source failure.
    Io,
    /// First failure among concurrently joined sub-tasks.
    Aggregate,
}

/// Errors that can occur while reading or writing a package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file or sink operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A source path given by the caller does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A medium carries neither a buffer nor a filesystem path.
    #[error("Unsupported media: {0} has neither a buffer nor a path")]
    UnsupportedMedia(String),

    /// A joined sub-task failed; its siblings' results were discarded.
    #[error("{task} failed: {source}")]
    Aggregate {
        /// Name of the failing unit of work (part path or media file).
        task: String,
        /// The underlying failure.
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a failure raised inside a joined unit of work.
    pub fn aggregate(task: impl Into<String>, source: Error) -> Self {
        Error::Aggregate {
            task: task.into(),
            source: Box::new(source),
        }
    }

    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::ZipArchive(_) => ErrorKind::Io,
            Error::XmlParse(_) | Error::InvalidData(_) => ErrorKind::Parse,
            Error::NotFound(_) | Error::MissingComponent(_) => ErrorKind::NotFound,
            Error::UnsupportedMedia(_) => ErrorKind::UnsupportedMedia,
            Error::Aggregate { .. } => ErrorKind::Aggregate,
        }
    }

    /// The innermost error beneath any `Aggregate` wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Aggregate { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::aggregate("spawned task", Error::Io(io::Error::other(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedMedia("image1.png".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported media: image1.png has neither a buffer nor a path"
        );

        let err = Error::NotFound("missing.xlsx".to_string());
        assert_eq!(err.to_string(), "Not found: missing.xlsx");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_aggregate_root() {
        let err = Error::aggregate(
            "xl/worksheets/sheet1.xml",
            Error::XmlParse("unexpected end".to_string()),
        );
        assert_eq!(err.kind(), ErrorKind::Aggregate);
        assert_eq!(err.root().kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("xl/worksheets/sheet1.xml failed"));
    }
}
