use crate::{
    Coercion, DataAccessTranslator, DataError, ErrorTranslator, Executor, FromRow, MapParameter,
    MapperBuilder, ParamBuilder, Parameters, PlainText, Record, Result, RowMapper, RowStream,
    TemplateResolver, ToValue, stream, truncate_long,
};
use std::sync::Arc;
use time::UtcOffset;

/// Resolves SQL, binds parameters, runs the statement and maps the rows.
///
/// ```rust,ignore
/// let mut template = SqlTemplate::new(executor).with_resolver(TextFile::new("sql").cached());
/// let params = template.args(&[&30])?;
/// let employees: Vec<Employee> = template.for_list("employees_by_dept.sql", &params)?;
/// ```
pub struct SqlTemplate<E, R = PlainText> {
    executor: E,
    resolver: R,
    coercion: Coercion,
    translator: Box<dyn ErrorTranslator + Send + Sync>,
}

impl<E: Executor> SqlTemplate<E, PlainText> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            resolver: PlainText,
            coercion: Coercion::default(),
            translator: Box::new(DataAccessTranslator),
        }
    }
}

impl<E: Executor, R: TemplateResolver> SqlTemplate<E, R> {
    pub fn with_resolver<S: TemplateResolver>(self, resolver: S) -> SqlTemplate<E, S> {
        SqlTemplate {
            executor: self.executor,
            resolver,
            coercion: self.coercion,
            translator: self.translator,
        }
    }

    /// Zone used to store and read back zoned temporal values.
    pub fn with_zone(mut self, zone: UtcOffset) -> Self {
        self.coercion = Coercion::new(zone);
        self
    }

    pub fn with_translator(mut self, translator: impl ErrorTranslator + Send + Sync + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn params(&self) -> ParamBuilder {
        ParamBuilder::new(self.coercion)
    }

    pub fn mappers(&self) -> MapperBuilder {
        MapperBuilder::new(self.coercion)
    }

    pub fn args(&self, values: &[&dyn ToValue]) -> Result<Parameters<'static>> {
        self.params().by_args(values)
    }

    pub fn map<'a>(&self) -> MapParameter<'a> {
        self.params().map()
    }

    pub fn record<'a, T: Record>(&self, record: &'a T) -> Parameters<'a> {
        self.params().by_record(record)
    }

    fn sql(&self, resource: &str, params: &Parameters<'_>) -> Result<Arc<str>> {
        self.resolver.resolve(resource, params)
    }

    /// Hands the rows, mapped by `mapper`, to `consumer`.
    pub fn for_stream_with<T, M, F, Res>(
        &mut self,
        resource: &str,
        params: &Parameters<'_>,
        mapper: M,
        consumer: F,
    ) -> Result<Res>
    where
        M: RowMapper<T>,
        F: FnOnce(&mut RowStream<'_, T, M>) -> Result<Res>,
    {
        let sql = self.sql(resource, params)?;
        log::debug!("Executing query:\n{}", truncate_long!(sql));
        let translator = self.translator.as_ref();
        let cursor = self
            .executor
            .query(&sql, params)
            .map_err(|e| translator.translate("query", &sql, e))?;
        stream(&sql, cursor, mapper, translator, consumer)
    }

    pub fn for_stream<T, F, Res>(
        &mut self,
        resource: &str,
        params: &Parameters<'_>,
        consumer: F,
    ) -> Result<Res>
    where
        T: FromRow,
        F: FnOnce(&mut RowStream<'_, T, T::Mapper>) -> Result<Res>,
    {
        let mapper = T::mapper(self.coercion);
        self.for_stream_with(resource, params, mapper, consumer)
    }

    pub fn for_list_with<T, M: RowMapper<T>>(
        &mut self,
        resource: &str,
        params: &Parameters<'_>,
        mapper: M,
    ) -> Result<Vec<T>> {
        self.for_stream_with(resource, params, mapper, |rows| rows.collect())
    }

    pub fn for_list<T: FromRow>(&mut self, resource: &str, params: &Parameters<'_>) -> Result<Vec<T>> {
        self.for_stream(resource, params, |rows| rows.collect())
    }

    /// The only row of the result, `None` when it is empty.
    pub fn for_optional<T: FromRow>(
        &mut self,
        resource: &str,
        params: &Parameters<'_>,
    ) -> Result<Option<T>> {
        let mut rows = self.for_list::<T>(resource, params)?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            actual => Err(DataError::IncorrectResultSize {
                expected: 1,
                actual,
            }
            .into()),
        }
    }

    /// The only row of the result.
    pub fn for_object<T: FromRow>(&mut self, resource: &str, params: &Parameters<'_>) -> Result<T> {
        self.for_optional(resource, params)?.ok_or_else(|| {
            DataError::IncorrectResultSize {
                expected: 1,
                actual: 0,
            }
            .into()
        })
    }

    pub fn update(&mut self, resource: &str, params: &Parameters<'_>) -> Result<u64> {
        let sql = self.sql(resource, params)?;
        log::debug!("Executing update:\n{}", truncate_long!(sql));
        self.executor
            .update(&sql, params)
            .map_err(|e| self.translator.translate("update", &sql, e))
    }

    /// Runs the statement once per parameter set, the SQL is resolved with the first one.
    pub fn batch_update(&mut self, resource: &str, batch: &[Parameters<'_>]) -> Result<Vec<u64>> {
        let none = Parameters::none();
        let sql = self.sql(resource, batch.first().unwrap_or(&none))?;
        log::debug!(
            "Executing batch update of {} statements:\n{}",
            batch.len(),
            truncate_long!(sql)
        );
        self.executor
            .batch_update(&sql, batch)
            .map_err(|e| self.translator.translate("batch update", &sql, e))
    }
}
