use crate::{
    Coercion, Context, DataError, Direction, FromValue, Record, Result, RowCursor, SchemaIndex,
    SqlType, ToValue, Value, index_for, normalize_label,
};
use rust_decimal::Decimal;
use std::{any, marker::PhantomData, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Converts the current row of a cursor into a `T`.
pub trait RowMapper<T> {
    fn map_row(&self, cursor: &mut dyn RowCursor, row_number: usize) -> Result<T>;
}

impl<T, F: Fn(&mut dyn RowCursor, usize) -> Result<T>> RowMapper<T> for F {
    fn map_row(&self, cursor: &mut dyn RowCursor, row_number: usize) -> Result<T> {
        self(cursor, row_number)
    }
}

/// Types that know which mapper converts a row into them.
pub trait FromRow: Sized {
    type Mapper: RowMapper<Self>;
    fn mapper(coercion: Coercion) -> Self::Mapper;
}

/// Maps columns onto the members of a [`Record`] by name.
///
/// Columns without a member are skipped, members without a column are left
/// to [`Record::from_members`].
pub struct RecordMapper<T: Record> {
    index: Arc<SchemaIndex>,
    coercion: Coercion,
    _type: PhantomData<fn() -> T>,
}

impl<T: Record> RecordMapper<T> {
    pub fn new(coercion: Coercion) -> Self {
        Self {
            index: index_for::<T>(Direction::Mapping),
            coercion,
            _type: PhantomData,
        }
    }
}

impl<T: Record> RowMapper<T> for RecordMapper<T> {
    fn map_row(&self, cursor: &mut dyn RowCursor, row_number: usize) -> Result<T> {
        let plan = cursor
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(column, label)| {
                let (index, member) = self.index.lookup(label)?;
                if row_number == 0 {
                    log::debug!(
                        "Mapping column '{}' to member '{}' of type {}",
                        label,
                        member.name,
                        member.type_name,
                    );
                }
                Some((column, index, member))
            })
            .collect::<Vec<_>>();
        let mut values = Vec::with_capacity(plan.len());
        for (column, index, member) in plan {
            let value = cursor
                .column_value(column, member.sql_type)
                .with_context(|| {
                    format!(
                        "While reading column {} for member `{}` of {}",
                        column,
                        member.name,
                        self.index.type_name(),
                    )
                })?;
            values.push((index, value));
        }
        T::from_members(values, &self.coercion)
            .with_context(|| format!("Could not map row {row_number} to {}", self.index.type_name()))
    }
}

/// Maps a row made of exactly one column.
pub struct SingleColumnMapper<T> {
    coercion: Coercion,
    _type: PhantomData<fn() -> T>,
}

impl<T> SingleColumnMapper<T> {
    pub fn new(coercion: Coercion) -> Self {
        Self {
            coercion,
            _type: PhantomData,
        }
    }
}

impl<T: FromValue + ToValue> RowMapper<T> for SingleColumnMapper<T> {
    fn map_row(&self, cursor: &mut dyn RowCursor, row_number: usize) -> Result<T> {
        let actual = cursor.columns().len();
        if actual != 1 {
            return Err(DataError::IncorrectColumnCount {
                expected: 1,
                actual,
            }
            .into());
        }
        let value = cursor.column_value(0, T::empty_value().sql_type())?;
        if value.is_null() {
            if let Some(result) = T::absent() {
                return Ok(result);
            }
        }
        T::from_value(value, &self.coercion)
            .with_context(|| format!("Could not map row {row_number} to {}", any::type_name::<T>()))
    }
}

/// Column labels of a result.
pub type RowNames = Arc<[String]>;
/// Values of one row, aligned with its labels.
pub type Row = Box<[Value]>;

/// A row as it came from the cursor, with its column labels.
#[derive(Default, Clone, Debug)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    /// Value of the column whose label matches `name`, ignoring case and whitespace.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        let name = normalize_label(name);
        self.labels
            .iter()
            .position(|v| normalize_label(v) == name)
            .map(|i| &self.values[i])
    }
}

/// Maps a whole row into a [`RowLabeled`], without type hints.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabeledMapper;

impl RowMapper<RowLabeled> for LabeledMapper {
    fn map_row(&self, cursor: &mut dyn RowCursor, _row_number: usize) -> Result<RowLabeled> {
        let labels: RowNames = cursor.columns().into();
        let values = (0..labels.len())
            .map(|i| cursor.column_value(i, SqlType::Unknown))
            .collect::<Result<_>>()?;
        Ok(RowLabeled::new(labels, values))
    }
}

impl FromRow for RowLabeled {
    type Mapper = LabeledMapper;
    fn mapper(_coercion: Coercion) -> Self::Mapper {
        LabeledMapper
    }
}

macro_rules! impl_from_row_single_column {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromRow for $ty {
            type Mapper = SingleColumnMapper<Self>;
            fn mapper(coercion: Coercion) -> Self::Mapper {
                SingleColumnMapper::new(coercion)
            }
        }
    )+};
}

impl_from_row_single_column!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    Vec<u8>,
    Uuid,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
    crate::OffsetTime,
);

impl<T: FromValue + ToValue> FromRow for Option<T> {
    type Mapper = SingleColumnMapper<Self>;
    fn mapper(coercion: Coercion) -> Self::Mapper {
        SingleColumnMapper::new(coercion)
    }
}

/// Builds mappers that share one coercion.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapperBuilder {
    coercion: Coercion,
}

impl MapperBuilder {
    pub fn new(coercion: Coercion) -> Self {
        Self { coercion }
    }
    pub fn mapper<T: FromRow>(&self) -> T::Mapper {
        T::mapper(self.coercion)
    }
    pub fn record<T: Record>(&self) -> RecordMapper<T> {
        RecordMapper::new(self.coercion)
    }
    pub fn single_column<T: FromValue + ToValue>(&self) -> SingleColumnMapper<T> {
        SingleColumnMapper::new(self.coercion)
    }
}
