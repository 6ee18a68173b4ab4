use super::*;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SortError {
    #[error("unknown sort field: {0}")]
    UnknownField(String),

    #[error("no sort resolved yet (handle must run first)")]
    UnresolvedSort,

    #[error("no applier found for given data")]
    NoApplierFound,

    #[error("no direction recorded for path: {0}")]
    MissingDirection(String),

    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),
}

pub type Result<T> = std::result::Result<T, SortError>;
