use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Zone naive relational cell.
///
/// Every typed variant wraps an `Option` so that a NULL still knows the
/// column type it came from (or the bind type it must be sent with).
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    Uuid(Option<Uuid>),
}

/// Bind type hint handed to the executor together with a value.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    #[default]
    Unknown,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    Varchar,
    Binary,
    Date,
    Time,
    Timestamp,
    Uuid,
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// The type hint of this value, known even when it is a typed NULL.
    ///
    /// Unsigned integers are widened to the next signed type able to hold them.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null => SqlType::Unknown,
            Value::Boolean(..) => SqlType::Boolean,
            Value::Int8(..) => SqlType::TinyInt,
            Value::Int16(..) | Value::UInt8(..) => SqlType::SmallInt,
            Value::Int32(..) | Value::UInt16(..) => SqlType::Integer,
            Value::Int64(..) | Value::UInt32(..) => SqlType::BigInt,
            Value::UInt64(..) | Value::Decimal(..) => SqlType::Decimal,
            Value::Float32(..) => SqlType::Real,
            Value::Float64(..) => SqlType::Double,
            Value::Varchar(..) => SqlType::Varchar,
            Value::Blob(..) => SqlType::Binary,
            Value::Date(..) => SqlType::Date,
            Value::Time(..) => SqlType::Time,
            Value::Timestamp(..) => SqlType::Timestamp,
            Value::Uuid(..) => SqlType::Uuid,
        }
    }
}
