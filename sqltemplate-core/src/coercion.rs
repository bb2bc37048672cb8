use crate::{DataError, FromValue, Result, ToValue, Value};
use std::any;
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::{parse_borrowed, well_known::Rfc3339},
};

/// Zone parameter of the coercion table.
///
/// The relational side is zone naive: zoned values are moved to `zone` and
/// stripped when bound, and read back with `zone` attached. A value written in
/// a different zone therefore comes back as the same instant expressed in
/// `zone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coercion {
    zone: UtcOffset,
}

impl Default for Coercion {
    fn default() -> Self {
        Self::utc()
    }
}

impl Coercion {
    pub const fn new(zone: UtcOffset) -> Self {
        Self { zone }
    }
    pub const fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }
    /// Coercion in the current local offset of the process, UTC when it cannot
    /// be determined.
    pub fn local() -> Self {
        match UtcOffset::current_local_offset() {
            Ok(zone) => Self::new(zone),
            Err(e) => {
                log::warn!("Could not determine the local offset ({e}), using UTC");
                Self::utc()
            }
        }
    }
    pub fn zone(&self) -> UtcOffset {
        self.zone
    }

    /// `value` in the configured zone, without the offset. Fails when the
    /// local date-time falls outside the supported range.
    pub fn timestamp_to_relational(&self, value: OffsetDateTime) -> Result<PrimitiveDateTime> {
        let shifted = value.checked_to_offset(self.zone).ok_or_else(|| DataError::Coercion {
            value: value.to_string(),
            target: any::type_name::<PrimitiveDateTime>(),
        })?;
        Ok(PrimitiveDateTime::new(shifted.date(), shifted.time()))
    }
    pub fn timestamp_from_relational(&self, value: PrimitiveDateTime) -> OffsetDateTime {
        value.assume_offset(self.zone)
    }
    pub fn time_to_relational(&self, value: OffsetTime) -> Time {
        value.to_offset(self.zone).time()
    }
    pub fn time_from_relational(&self, value: Time) -> OffsetTime {
        OffsetTime::new(value, self.zone)
    }
}

/// Time of day with a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: Time,
    offset: UtcOffset,
}

impl OffsetTime {
    pub const fn new(time: Time, offset: UtcOffset) -> Self {
        Self { time, offset }
    }
    pub const fn time(&self) -> Time {
        self.time
    }
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }
    /// Same instant of the day in another offset, wrapping around midnight.
    pub fn to_offset(self, offset: UtcOffset) -> Self {
        let shift = offset.whole_seconds() - self.offset.whole_seconds();
        Self {
            time: self.time + Duration::seconds(shift as i64),
            offset,
        }
    }
}

/// String backed enum, stored by variant name. Implemented by `#[derive(SqlEnum)]`.
pub trait SqlEnum: Sized + 'static {
    fn name(&self) -> &'static str;
    fn from_name(name: &str) -> Option<Self>;
}

pub fn enum_to_value<E: SqlEnum>(value: &E) -> Value {
    Value::Varchar(Some(value.name().to_string()))
}

/// Enums are read only from character columns, by exact variant name.
pub fn enum_from_value<E: SqlEnum>(value: Value) -> Result<E> {
    match value {
        Value::Varchar(Some(name)) => E::from_name(&name).ok_or_else(|| {
            DataError::NoEnumConstant {
                target: any::type_name::<E>(),
                name,
            }
            .into()
        }),
        Value::Varchar(None) => Err(DataError::coercion(&value, any::type_name::<E>())),
        _ => Err(DataError::UnsupportedSqlType {
            sql_type: value.sql_type(),
            target: any::type_name::<E>(),
        }
        .into()),
    }
}

macro_rules! parse_temporal {
    ($ty:ty, $value:expr, $($formats:literal),+ $(,)?) => {
        'value: {
            let text = $value.trim();
            for format in [$($formats,)+] {
                let format = parse_borrowed::<2>(format)?;
                if let Ok(result) = <$ty>::parse(text, &format) {
                    break 'value Ok(result);
                }
            }
            Err(DataError::Coercion {
                value: format!("`{text}`"),
                target: any::type_name::<$ty>(),
            }
            .into())
        }
    };
}

impl ToValue for Date {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Date(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Date(None)
    }
}

impl FromValue for Date {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(v)) => parse_temporal!(Date, v, "[year]-[month]-[day]"),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for Time {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Time(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Time(None)
    }
}

impl FromValue for Time {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(v)) => parse_temporal!(
                Time,
                v,
                "[hour]:[minute]:[second].[subsecond]",
                "[hour]:[minute]:[second]",
                "[hour]:[minute]",
            ),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for PrimitiveDateTime {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Timestamp(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Timestamp(None)
    }
}

impl FromValue for PrimitiveDateTime {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::Date(Some(v)) => Ok(v.midnight()),
            Value::Varchar(Some(v)) => parse_temporal!(
                PrimitiveDateTime,
                v,
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
                "[year]-[month]-[day]T[hour]:[minute]:[second]",
                "[year]-[month]-[day]T[hour]:[minute]",
                "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
                "[year]-[month]-[day] [hour]:[minute]:[second]",
                "[year]-[month]-[day] [hour]:[minute]",
            ),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for OffsetDateTime {
    fn to_value(&self, coercion: &Coercion) -> Result<Value> {
        Ok(Value::Timestamp(Some(coercion.timestamp_to_relational(*self)?)))
    }
    fn empty_value() -> Value {
        Value::Timestamp(None)
    }
}

impl FromValue for OffsetDateTime {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self> {
        if let Value::Varchar(Some(ref v)) = value {
            if let Ok(result) = OffsetDateTime::parse(v.trim(), &Rfc3339) {
                return result.checked_to_offset(coercion.zone()).ok_or_else(|| {
                    DataError::coercion(&value, any::type_name::<Self>())
                });
            }
        }
        PrimitiveDateTime::from_value(value, coercion)
            .map(|v| coercion.timestamp_from_relational(v))
    }
}

impl ToValue for OffsetTime {
    fn to_value(&self, coercion: &Coercion) -> Result<Value> {
        Ok(Value::Time(Some(coercion.time_to_relational(*self))))
    }
    fn empty_value() -> Value {
        Value::Time(None)
    }
}

impl FromValue for OffsetTime {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self> {
        Time::from_value(value, coercion).map(|v| coercion.time_from_relational(v))
    }
}
