//! Error types shared by the codec, the stores and the build pipeline

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A malformed metadata block, or a post that cannot be encoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing opening delimiter")]
    MissingOpeningDelimiter,

    #[error("missing closing delimiter")]
    MissingClosingDelimiter,

    /// `line` is 1-based and counts from the start of the file
    #[error("malformed metadata line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("post is not valid UTF-8")]
    InvalidUtf8,

    /// A field value containing `=` or a line break cannot be written back
    #[error("value for {key} may not contain '=' or line breaks")]
    InvalidValue { key: &'static str },
}

/// Coarse classification of an [`Error`], used by callers that map errors
/// onto user-facing responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    NotFound,
    Conflict,
    Io,
    Template,
}

/// The pipeline stage a per-post failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Decode,
    Template,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Decode => "decode",
            Stage::Template => "template",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("post already exists: {0}")]
    Conflict(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template error: {0}")]
    Template(String),

    /// A single post failed somewhere in the build pipeline
    #[error("post {post} failed at {stage}: {source}")]
    Build {
        post: String,
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Classify an I/O error, turning a missing file into [`Error::NotFound`]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io { path, source }
        }
    }

    /// Wrap an error with the post and stage it happened in
    pub fn at(self, post: impl Into<String>, stage: Stage) -> Self {
        Error::Build {
            post: post.into(),
            stage,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format(_) => ErrorKind::Format,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Io { .. } => ErrorKind::Io,
            Error::Template(_) => ErrorKind::Template,
            Error::Build { source, .. } => source.kind(),
        }
    }
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Error::Template(message)
    }
}
