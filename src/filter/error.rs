use thiserror::Error;

use super::types::FilterField;

/// Caller-correctable query validation failures. Every variant is raised
/// before the persistence layer is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid operator for {0}")]
    InvalidOperator(FilterField),

    #[error("Invalid value for {0}")]
    InvalidValue(FilterField),

    #[error("Invalid order field")]
    InvalidOrderField,

    #[error("Invalid order direction")]
    InvalidDirection,

    #[error("Invalid limit")]
    InvalidLimit,

    #[error("Invalid offset")]
    InvalidOffset,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
}
