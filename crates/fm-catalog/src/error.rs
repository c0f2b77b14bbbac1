use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A single record was malformed and has been excluded.
    #[error("record {record}: {reason}")]
    Record { record: usize, reason: String },

    /// The input as a whole could not be parsed (e.g. JSON that is not an
    /// array).
    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
