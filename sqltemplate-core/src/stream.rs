use crate::{DataError, Error, ErrorTranslator, Result, RowCursor, RowMapper};
use std::{fmt, iter::FusedIterator, marker::PhantomData, mem};

pub(crate) const STREAM_OPERATION: &str = "stream";

/// One row lookahead of a [`RowStream`].
enum Lookahead<T> {
    /// Nothing pulled since the last row was handed out.
    Empty,
    Row(T),
    /// A failure met while pulling, raised when the caller looks at the stream.
    Failed(Error),
    Exhausted,
}

/// Lazy, single pass sequence of mapped rows over a cursor.
///
/// The cursor is advanced only when the caller asks for a row. A failure
/// while advancing or mapping is kept in the lookahead and surfaces,
/// translated, at the `has_next`/`next_row` call that asked for that row.
/// After that the stream is exhausted.
pub struct RowStream<'a, T, M> {
    sql: &'a str,
    cursor: Box<dyn RowCursor + 'a>,
    mapper: M,
    translator: &'a dyn ErrorTranslator,
    state: Lookahead<T>,
    row_number: usize,
    _type: PhantomData<fn() -> T>,
}

impl<'a, T, M: RowMapper<T>> RowStream<'a, T, M> {
    pub fn new(
        sql: &'a str,
        cursor: Box<dyn RowCursor + 'a>,
        mapper: M,
        translator: &'a dyn ErrorTranslator,
    ) -> Self {
        Self {
            sql,
            cursor,
            mapper,
            translator,
            state: Lookahead::Empty,
            row_number: 0,
            _type: PhantomData,
        }
    }

    fn fetch(&mut self) -> Lookahead<T> {
        match self.cursor.advance() {
            Ok(true) => match self.mapper.map_row(self.cursor.as_mut(), self.row_number) {
                Ok(row) => {
                    self.row_number += 1;
                    Lookahead::Row(row)
                }
                Err(e) => Lookahead::Failed(e),
            },
            Ok(false) => Lookahead::Exhausted,
            Err(e) => Lookahead::Failed(e),
        }
    }

    /// Whether another row is available, pulling it from the cursor if needed.
    pub fn has_next(&mut self) -> Result<bool> {
        if matches!(self.state, Lookahead::Empty) {
            self.state = self.fetch();
        }
        match mem::replace(&mut self.state, Lookahead::Exhausted) {
            Lookahead::Failed(error) => Err(self
                .translator
                .translate(STREAM_OPERATION, self.sql, error)),
            Lookahead::Exhausted => Ok(false),
            state => {
                self.state = state;
                Ok(true)
            }
        }
    }

    /// Next row, [`DataError::Exhausted`] when there are no more rows.
    pub fn next_row(&mut self) -> Result<T> {
        self.has_next()?;
        match mem::replace(&mut self.state, Lookahead::Empty) {
            Lookahead::Row(row) => Ok(row),
            state => {
                self.state = state;
                Err(DataError::Exhausted.into())
            }
        }
    }

    /// Rows handed out so far.
    pub fn rows_read(&self) -> usize {
        match self.state {
            Lookahead::Row(..) => self.row_number - 1,
            _ => self.row_number,
        }
    }
}

impl<T, M: RowMapper<T>> Iterator for RowStream<'_, T, M> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_row()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<T, M: RowMapper<T>> FusedIterator for RowStream<'_, T, M> {}

impl<T, M> fmt::Debug for RowStream<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            Lookahead::Empty => "Empty",
            Lookahead::Row(..) => "Row",
            Lookahead::Failed(..) => "Failed",
            Lookahead::Exhausted => "Exhausted",
        };
        f.debug_struct("RowStream")
            .field("row_number", &self.row_number)
            .field("state", &state)
            .finish()
    }
}

impl<T, M> Drop for RowStream<'_, T, M> {
    fn drop(&mut self) {
        log::trace!("Releasing the cursor after {} rows", self.row_number);
    }
}

/// Hands a [`RowStream`] over `cursor` to `consumer` and returns what it
/// returns.
///
/// The cursor is released exactly once when this returns, however much of
/// the stream the consumer read, and also when the consumer fails or panics.
pub fn stream<'a, T, M, R>(
    sql: &'a str,
    cursor: Box<dyn RowCursor + 'a>,
    mapper: M,
    translator: &'a dyn ErrorTranslator,
    consumer: impl FnOnce(&mut RowStream<'a, T, M>) -> Result<R>,
) -> Result<R>
where
    M: RowMapper<T>,
{
    let mut rows = RowStream::new(sql, cursor, mapper, translator);
    consumer(&mut rows)
}
