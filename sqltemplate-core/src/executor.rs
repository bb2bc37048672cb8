use crate::{DataError, Error, Parameters, Result, SqlType, Value, truncate_long};

/// Forward only cursor over the rows of one query.
///
/// The cursor and the statement behind it are released when it is dropped.
pub trait RowCursor {
    /// Column labels, as returned by the database.
    fn columns(&self) -> &[String];
    /// Move to the next row, `false` once there are no more rows.
    fn advance(&mut self) -> Result<bool>;
    /// Value of the column at `index` in the current row. `hint` is the type
    /// the caller expects, the cursor may use it to pick an extraction.
    fn column_value(&mut self, index: usize, hint: SqlType) -> Result<Value>;
}

/// The statement execution layer.
pub trait Executor {
    /// Run a query and return a cursor over its rows.
    fn query(&mut self, sql: &str, params: &Parameters<'_>) -> Result<Box<dyn RowCursor + '_>>;

    /// Run a statement and return the number of rows affected.
    fn update(&mut self, sql: &str, params: &Parameters<'_>) -> Result<u64>;

    /// Run the same statement once per parameter set.
    fn batch_update(&mut self, sql: &str, batch: &[Parameters<'_>]) -> Result<Vec<u64>> {
        batch.iter().map(|params| self.update(sql, params)).collect()
    }
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn query(&mut self, sql: &str, params: &Parameters<'_>) -> Result<Box<dyn RowCursor + '_>> {
        (**self).query(sql, params)
    }
    fn update(&mut self, sql: &str, params: &Parameters<'_>) -> Result<u64> {
        (**self).update(sql, params)
    }
    fn batch_update(&mut self, sql: &str, batch: &[Parameters<'_>]) -> Result<Vec<u64>> {
        (**self).batch_update(sql, batch)
    }
}

/// Turns an execution failure into the error seen by the caller.
pub trait ErrorTranslator {
    fn translate(&self, operation: &str, sql: &str, error: Error) -> Error;
}

/// Keeps the cause and attaches [`DataError::Execution`] with the operation and the SQL text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataAccessTranslator;

impl ErrorTranslator for DataAccessTranslator {
    fn translate(&self, operation: &str, sql: &str, error: Error) -> Error {
        log::debug!("{operation} failed: {error:#}");
        error.context(DataError::Execution {
            operation: operation.to_string(),
            sql: truncate_long!(sql),
        })
    }
}

impl<F: Fn(&str, &str, Error) -> Error> ErrorTranslator for F {
    fn translate(&self, operation: &str, sql: &str, error: Error) -> Error {
        self(operation, sql, error)
    }
}
