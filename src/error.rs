//! Error type for parsing and file I/O.
//!
//! Only parse failures and file failures are errors. Everything the extractor
//! skips (unexported structs, embedded or internal fields, unsupported field
//! types) is reported as a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! instead.

use crate::ast::Position;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not syntactically valid Go source.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The output file could not be written; nothing was left behind.
    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn parse(position: Position, message: impl Into<String>) -> Self {
        Error::Parse {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Error::Read { .. })
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Error::Write { .. })
    }
}
