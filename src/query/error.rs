use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Cannot filter on field '{0}'")]
    UnknownFilterField(String),

    #[error("Unsupported filter operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFilterValue { field: String, value: String },

    #[error("Cannot select field '{0}'")]
    UnknownSelectField(String),

    #[error("Cannot sort by field '{0}'")]
    UnknownSortField(String),
}
