//! Error types for the unsage library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unsage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating worksheets.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading a worksheet or writing a notebook.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A code block opened while a code cell was still open.
    ///
    /// Fatal for the document being translated: the run stops immediately
    /// and output already written is not retracted.
    #[error("code cell starting inside a code cell (line {line})")]
    NestedCodeCell {
        /// 1-indexed source line of the offending open marker.
        line: usize,
    },

    /// A worksheet's companion metadata record held no recoverable name.
    #[error("no worksheet name in metadata record: {}", path.display())]
    WorksheetName {
        /// Path of the metadata record that was scanned.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NestedCodeCell { line: 7 };
        assert_eq!(
            err.to_string(),
            "code cell starting inside a code cell (line 7)"
        );

        let err = Error::WorksheetName {
            path: PathBuf::from("/tmp/ws/worksheet_conf.pickle"),
        };
        assert_eq!(
            err.to_string(),
            "no worksheet name in metadata record: /tmp/ws/worksheet_conf.pickle"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
