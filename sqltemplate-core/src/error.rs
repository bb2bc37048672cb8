use crate::{Error, SqlType, Value};

/// Conditions a caller may want to tell apart, carried inside [`Error`].
///
/// Every error produced by this crate is an `anyhow::Error`. The conditions
/// listed here are attached either as the error itself or as context, use
/// [`DataError::all`] to look for them.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Template '{0}' not found")]
    NotFound(String),
    #[error("Cannot convert {value} to {target}")]
    Coercion { value: String, target: &'static str },
    #[error("Unsupported sql type {sql_type:?} for {target}")]
    UnsupportedSqlType {
        sql_type: SqlType,
        target: &'static str,
    },
    #[error("No enum constant {target}.{name}")]
    NoEnumConstant { target: &'static str, name: String },
    #[error("Member `{member}` of {target} has no value in the row provided")]
    MissingMember {
        member: &'static str,
        target: &'static str,
    },
    #[error("Incorrect column count: expected {expected}, actual {actual}")]
    IncorrectColumnCount { expected: usize, actual: usize },
    #[error("Incorrect result size: expected {expected}, actual {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },
    #[error("The row stream has no more rows")]
    Exhausted,
    #[error("{operation} failed while executing `{sql}`")]
    Execution { operation: String, sql: String },
}

impl DataError {
    /// Every `DataError` found in the error, outermost first.
    pub fn all(error: &Error) -> impl Iterator<Item = &DataError> {
        error
            .downcast_ref::<DataError>()
            .into_iter()
            .chain(error.chain().filter_map(|e| e.downcast_ref::<DataError>()))
    }

    pub(crate) fn coercion(value: &Value, target: &'static str) -> Error {
        DataError::Coercion {
            value: format!("{value:?}"),
            target,
        }
        .into()
    }
}
