use sqltemplate_core::{
    Bound, Error, Executor, ParameterSource, Parameters, Result, RowCursor, SqlType, Value,
    truncate_long,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    vec,
};

/// Rows returned by the [`MemoryExecutor`] for one query.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Advancing onto this row fails.
    pub fail_at: Option<usize>,
}

impl ResultSet {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            fail_at: None,
        }
    }
    pub fn row(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.rows.push(values.into_iter().collect());
        self
    }
    pub fn fail_at(mut self, row: usize) -> Self {
        self.fail_at = Some(row);
        self
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Rows(ResultSet),
    Affected(u64),
    Fails(String),
}

/// One statement run by the [`MemoryExecutor`] with the values it was bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub sql: String,
    /// Placeholder name (`None` for `?`) and the value bound to it.
    pub bound: Vec<(Option<String>, Bound)>,
}

/// Shared counters of the cursors opened by a [`MemoryExecutor`].
#[derive(Debug, Clone, Default)]
pub struct CursorCounters {
    opened: Arc<AtomicUsize>,
    advances: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl CursorCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }
    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::Relaxed)
    }
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }
}

/// Executor answering registered statements from memory.
///
/// Statements are matched on their text with whitespace collapsed. Named
/// placeholders (`:name`) and positional ones (`?`) are resolved against the
/// parameters and recorded in [`MemoryExecutor::executions`].
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    outcomes: HashMap<String, Outcome>,
    executions: Vec<Execution>,
    counters: CursorCounters,
}

fn collapse(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Placeholders in order of appearance, skipping quoted text and `::` casts.
pub fn placeholders(sql: &str) -> Vec<Option<String>> {
    let mut result = Vec::new();
    let mut chars = sql.chars().peekable();
    let mut quote = None;
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(..), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '?') => result.push(None),
            (None, ':') => {
                if chars.peek() == Some(&':') {
                    chars.next();
                    continue;
                }
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                if !name.is_empty() {
                    result.push(Some(name));
                }
            }
            _ => {}
        }
    }
    result
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn on_query(mut self, sql: &str, rows: ResultSet) -> Self {
        self.outcomes.insert(collapse(sql), Outcome::Rows(rows));
        self
    }
    pub fn on_update(mut self, sql: &str, affected: u64) -> Self {
        self.outcomes.insert(collapse(sql), Outcome::Affected(affected));
        self
    }
    /// Running `sql` fails with `message`.
    pub fn on_failure(mut self, sql: &str, message: &str) -> Self {
        self.outcomes
            .insert(collapse(sql), Outcome::Fails(message.to_string()));
        self
    }
    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }
    pub fn counters(&self) -> CursorCounters {
        self.counters.clone()
    }

    fn bind(&self, sql: &str, params: &Parameters<'_>) -> Result<Vec<(Option<String>, Bound)>> {
        let mut positional = params.positional().iter();
        placeholders(sql)
            .into_iter()
            .map(|placeholder| match placeholder {
                Some(name) => match params.value_of(&name)? {
                    Some(bound) => Ok((Some(name), bound)),
                    None => Err(Error::msg(format!(
                        "No value supplied for the SQL parameter '{name}'"
                    ))),
                },
                None => match positional.next() {
                    Some(bound) => Ok((None, bound.clone())),
                    None => Err(Error::msg(format!(
                        "Not enough positional parameters for `{}`",
                        truncate_long!(sql)
                    ))),
                },
            })
            .collect()
    }

    fn run(&mut self, sql: &str, params: &Parameters<'_>) -> Result<Outcome> {
        let bound = self.bind(sql, params)?;
        self.executions.push(Execution {
            sql: sql.to_string(),
            bound,
        });
        match self.outcomes.get(&collapse(sql)) {
            Some(Outcome::Fails(message)) => Err(Error::msg(message.clone())),
            Some(outcome) => Ok(outcome.clone()),
            None => Err(Error::msg(format!(
                "No statement registered for `{}`",
                truncate_long!(sql)
            ))),
        }
    }
}

impl Executor for MemoryExecutor {
    fn query(&mut self, sql: &str, params: &Parameters<'_>) -> Result<Box<dyn RowCursor + '_>> {
        match self.run(sql, params)? {
            Outcome::Rows(result) => {
                self.counters.opened.fetch_add(1, Ordering::Relaxed);
                Ok(Box::new(MemoryCursor {
                    columns: result.columns,
                    rows: result.rows.into_iter(),
                    current: None,
                    position: 0,
                    fail_at: result.fail_at,
                    counters: self.counters.clone(),
                }))
            }
            _ => Err(Error::msg(format!(
                "`{}` does not return rows",
                truncate_long!(sql)
            ))),
        }
    }

    fn update(&mut self, sql: &str, params: &Parameters<'_>) -> Result<u64> {
        match self.run(sql, params)? {
            Outcome::Affected(affected) => Ok(affected),
            _ => Err(Error::msg(format!(
                "`{}` is not an update",
                truncate_long!(sql)
            ))),
        }
    }
}

struct MemoryCursor {
    columns: Vec<String>,
    rows: vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
    position: usize,
    fail_at: Option<usize>,
    counters: CursorCounters,
}

impl RowCursor for MemoryCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool> {
        self.counters.advances.fetch_add(1, Ordering::Relaxed);
        if self.fail_at == Some(self.position) {
            return Err(Error::msg(format!(
                "Connection reset while fetching row {}",
                self.position
            )));
        }
        self.current = self.rows.next();
        if self.current.is_some() {
            self.position += 1;
        }
        Ok(self.current.is_some())
    }

    fn column_value(&mut self, index: usize, _hint: SqlType) -> Result<Value> {
        let Some(row) = &self.current else {
            return Err(Error::msg("The cursor is not on a row"));
        };
        row.get(index).cloned().ok_or_else(|| {
            Error::msg(format!(
                "Column index {index} out of range, the row has {} columns",
                row.len()
            ))
        })
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.counters.releases.fetch_add(1, Ordering::Relaxed);
    }
}
