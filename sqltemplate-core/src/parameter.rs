use crate::{
    Coercion, Context, Direction, Record, Result, SchemaIndex, SqlType, ToValue, Value, index_for,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// A coerced value together with the type it must be bound as.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Value,
    pub sql_type: SqlType,
}

impl Bound {
    pub fn new(value: Value) -> Self {
        let sql_type = value.sql_type();
        Self { value, sql_type }
    }
}

/// Named parameter values. Names the source does not know are a miss, never an
/// error. A known value that cannot be coerced is an error.
pub trait ParameterSource {
    fn has_value(&self, name: &str) -> bool;
    fn value_of(&self, name: &str) -> Result<Option<Bound>>;
}

/// No named values.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyParameter;

impl ParameterSource for EmptyParameter {
    fn has_value(&self, _name: &str) -> bool {
        false
    }
    fn value_of(&self, _name: &str) -> Result<Option<Bound>> {
        Ok(None)
    }
}

/// Positional values, coerced in call order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArgsParameter {
    values: Vec<Bound>,
}

impl ArgsParameter {
    pub fn new(values: &[&dyn ToValue], coercion: &Coercion) -> Result<Self> {
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.to_value(coercion)
                    .map(Bound::new)
                    .with_context(|| format!("While binding positional parameter {}", i + 1))
            })
            .collect::<Result<_>>()?;
        Ok(Self { values })
    }
    pub fn values(&self) -> &[Bound] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterSource for ArgsParameter {
    fn has_value(&self, _name: &str) -> bool {
        false
    }
    fn value_of(&self, _name: &str) -> Result<Option<Bound>> {
        Ok(None)
    }
}

/// Values looked up by exact key, coerced when they are read.
pub struct MapParameter<'a> {
    values: HashMap<String, Box<dyn ToValue + 'a>>,
    coercion: Coercion,
}

impl<'a> MapParameter<'a> {
    pub fn new(coercion: Coercion) -> Self {
        Self {
            values: HashMap::new(),
            coercion,
        }
    }
    pub fn add(mut self, name: impl Into<String>, value: impl ToValue + 'a) -> Self {
        self.values.insert(name.into(), Box::new(value));
        self
    }
}

impl fmt::Debug for MapParameter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = self.values.keys().collect::<Vec<_>>();
        entries.sort();
        f.debug_struct("MapParameter")
            .field("names", &entries)
            .field("coercion", &self.coercion)
            .finish()
    }
}

impl ParameterSource for MapParameter<'_> {
    fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
    fn value_of(&self, name: &str) -> Result<Option<Bound>> {
        let Some(value) = self.values.get(name) else {
            return Ok(None);
        };
        value
            .to_value(&self.coercion)
            .map(|v| Some(Bound::new(v)))
            .with_context(|| format!("While binding parameter `{name}`"))
    }
}

/// Members of a record, resolved through its binding schema index.
pub struct RecordParameter<'a, T: Record> {
    record: &'a T,
    index: Arc<SchemaIndex>,
    coercion: Coercion,
}

impl<'a, T: Record> RecordParameter<'a, T> {
    pub fn new(record: &'a T, coercion: Coercion) -> Self {
        Self {
            record,
            index: index_for::<T>(Direction::Binding),
            coercion,
        }
    }
}

impl<T: Record> ParameterSource for RecordParameter<'_, T> {
    fn has_value(&self, name: &str) -> bool {
        self.index.lookup(name).is_some()
    }
    fn value_of(&self, name: &str) -> Result<Option<Bound>> {
        let Some((i, _)) = self.index.lookup(name) else {
            return Ok(None);
        };
        Ok(self.record.read_member(i, &self.coercion)?.map(Bound::new))
    }
}

/// Parameters of one statement execution.
pub enum Parameters<'a> {
    Positional(ArgsParameter),
    Named(Box<dyn ParameterSource + 'a>),
}

impl<'a> Parameters<'a> {
    pub fn none() -> Self {
        Parameters::Positional(ArgsParameter::default())
    }
    pub fn named(source: impl ParameterSource + 'a) -> Self {
        Parameters::Named(Box::new(source))
    }
    /// Positional values, empty for named parameters.
    pub fn positional(&self) -> &[Bound] {
        match self {
            Parameters::Positional(args) => args.values(),
            Parameters::Named(..) => &[],
        }
    }
}

impl Default for Parameters<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Parameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameters::Positional(args) => f.debug_tuple("Positional").field(args).finish(),
            Parameters::Named(..) => f.write_str("Named(..)"),
        }
    }
}

impl ParameterSource for Parameters<'_> {
    fn has_value(&self, name: &str) -> bool {
        match self {
            Parameters::Positional(args) => args.has_value(name),
            Parameters::Named(source) => source.has_value(name),
        }
    }
    fn value_of(&self, name: &str) -> Result<Option<Bound>> {
        match self {
            Parameters::Positional(args) => args.value_of(name),
            Parameters::Named(source) => source.value_of(name),
        }
    }
}

impl From<ArgsParameter> for Parameters<'_> {
    fn from(value: ArgsParameter) -> Self {
        Parameters::Positional(value)
    }
}

impl<'a> From<MapParameter<'a>> for Parameters<'a> {
    fn from(value: MapParameter<'a>) -> Self {
        Parameters::named(value)
    }
}

impl<'a, T: Record> From<RecordParameter<'a, T>> for Parameters<'a> {
    fn from(value: RecordParameter<'a, T>) -> Self {
        Parameters::named(value)
    }
}

/// Builds parameters that share one coercion.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParamBuilder {
    coercion: Coercion,
}

impl ParamBuilder {
    pub fn new(coercion: Coercion) -> Self {
        Self { coercion }
    }
    pub fn by_args(&self, values: &[&dyn ToValue]) -> Result<Parameters<'static>> {
        ArgsParameter::new(values, &self.coercion).map(Into::into)
    }
    pub fn by_map<'a, K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Parameters<'a>
    where
        K: Into<String>,
        V: ToValue + 'a,
    {
        values
            .into_iter()
            .fold(self.map(), |map, (k, v)| map.add(k, v))
            .into()
    }
    /// Empty map to add values to.
    pub fn map<'a>(&self) -> MapParameter<'a> {
        MapParameter::new(self.coercion)
    }
    pub fn by_record<'a, T: Record>(&self, record: &'a T) -> Parameters<'a> {
        RecordParameter::new(record, self.coercion).into()
    }
}
