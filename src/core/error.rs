use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidOperation,
    InvalidArgument,
    UnsupportedIdentifierKind,
    UniqueIndexMissingValue,
    DuplicateUniqueIndex,
    PagingRequiresSorting,
    OnlyWhereAllowed,
    MissingWhere,
    PrefixTooLong,
    Serialization,
    Db,
}

#[derive(Debug, ThisError)]
#[error("{kind:?}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Shorthand for failures reported by a `DbClient` implementation.
    pub fn db(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Db, context)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Serialization,
            context: err.to_string(),
        }
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error {
            kind: ErrorKind::InvalidArgument,
            context: format!("Invalid guid: {}", err),
        }
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error {
            kind: ErrorKind::InvalidArgument,
            context: format!("Invalid integer: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
