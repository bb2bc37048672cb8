use crate::{Coercion, DataError, Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, fmt::Display};
use uuid::Uuid;

/// Write direction of the coercion table: application value into its
/// relational form.
///
/// The trait is object safe so that a heterogeneous list of arguments can be
/// bound positionally (`&[&dyn ToValue]`).
///
/// ```rust
/// use sqltemplate_core::{Coercion, ToValue, Value};
/// let value = 42i32.to_value(&Coercion::utc()).unwrap();
/// assert_eq!(value, Value::Int32(Some(42)));
/// ```
pub trait ToValue {
    /// Convert into the value handed to the executor. Zoned temporal types are
    /// normalized to the zone of `coercion`, everything else passes through.
    /// Fails when the value has no relational form in that zone.
    fn to_value(&self, coercion: &Coercion) -> Result<Value>;
    /// The typed NULL for this type. It carries the bind type hint used when
    /// there is no runtime value to inspect.
    fn empty_value() -> Value
    where
        Self: Sized;
}

/// Read direction of the coercion table: relational value into an
/// application value.
///
/// Implementations accept the canonical variant for the type, optionally
/// other variants that convert without loss (range checked for numbers), and
/// fail with [`DataError::Coercion`] otherwise.
pub trait FromValue: Sized {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self>;
    /// Value taken by a member when its column is NULL or missing. `None`
    /// leaves the member unassigned.
    fn absent() -> Option<Self> {
        None
    }
}

fn out_of_range<T>(value: &dyn Display) -> Error {
    Error::msg(format!(
        "Value {value} is out of range for {}",
        any::type_name::<T>()
    ))
}

macro_rules! impl_integer {
    ($($source:ty => $destination:path),+ $(,)?) => {$(
        impl ToValue for $source {
            fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
                Ok($destination(Some(*self)))
            }
            fn empty_value() -> Value {
                $destination(None)
            }
        }

        impl FromValue for $source {
            fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
                match value {
                    Value::Int8(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::Int16(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::Int32(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::Int64(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::UInt8(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::UInt16(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::UInt32(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::UInt64(Some(v)) => <$source>::try_from(v).map_err(|_| out_of_range::<Self>(&v)),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => v
                        .to_i128()
                        .and_then(|n| <$source>::try_from(n).ok())
                        .ok_or_else(|| out_of_range::<Self>(&v)),
                    Value::Varchar(Some(ref v)) => v
                        .trim()
                        .parse::<$source>()
                        .map_err(|_| DataError::coercion(&value, any::type_name::<Self>())),
                    _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
                }
            }
        }
    )+};
}

impl_integer!(
    i8 => Value::Int8,
    i16 => Value::Int16,
    i32 => Value::Int32,
    i64 => Value::Int64,
    u8 => Value::UInt8,
    u16 => Value::UInt16,
    u32 => Value::UInt32,
    u64 => Value::UInt64,
);

macro_rules! impl_float {
    ($($source:ty => $destination:path, $from_decimal:ident),+ $(,)?) => {$(
        impl ToValue for $source {
            fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
                Ok($destination(Some(*self)))
            }
            fn empty_value() -> Value {
                $destination(None)
            }
        }

        impl FromValue for $source {
            fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
                #[allow(unreachable_patterns)]
                match value {
                    $destination(Some(v)) => Ok(v),
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Int8(Some(v)) => Ok(v as _),
                    Value::Int16(Some(v)) => Ok(v as _),
                    Value::Int32(Some(v)) => Ok(v as _),
                    Value::Int64(Some(v)) => Ok(v as _),
                    Value::UInt8(Some(v)) => Ok(v as _),
                    Value::UInt16(Some(v)) => Ok(v as _),
                    Value::UInt32(Some(v)) => Ok(v as _),
                    Value::UInt64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v
                        .$from_decimal()
                        .ok_or_else(|| out_of_range::<Self>(&v)),
                    Value::Varchar(Some(ref v)) => v
                        .trim()
                        .parse::<$source>()
                        .map_err(|_| DataError::coercion(&value, any::type_name::<Self>())),
                    _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
                }
            }
        }
    )+};
}

impl_float!(
    f32 => Value::Float32, to_f32,
    f64 => Value::Float64, to_f64,
);

impl ToValue for bool {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Boolean(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Boolean(None)
    }
}

impl FromValue for bool {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::UInt8(Some(v)) => Ok(v != 0),
            Value::UInt16(Some(v)) => Ok(v != 0),
            Value::UInt32(Some(v)) => Ok(v != 0),
            Value::UInt64(Some(v)) => Ok(v != 0),
            Value::Varchar(Some(ref v)) => match v.trim() {
                v if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
                v if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
                _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
            },
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for Decimal {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Decimal(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Decimal(None)
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(Decimal::from(v)),
            Value::Int16(Some(v)) => Ok(Decimal::from(v)),
            Value::Int32(Some(v)) => Ok(Decimal::from(v)),
            Value::Int64(Some(v)) => Ok(Decimal::from(v)),
            Value::UInt8(Some(v)) => Ok(Decimal::from(v)),
            Value::UInt16(Some(v)) => Ok(Decimal::from(v)),
            Value::UInt32(Some(v)) => Ok(Decimal::from(v)),
            Value::UInt64(Some(v)) => Ok(Decimal::from(v)),
            Value::Float32(Some(v)) => Decimal::from_f32(v)
                .ok_or_else(|| DataError::coercion(&value, any::type_name::<Self>())),
            Value::Float64(Some(v)) => Decimal::from_f64(v)
                .ok_or_else(|| DataError::coercion(&value, any::type_name::<Self>())),
            Value::Varchar(Some(ref v)) => v
                .trim()
                .parse::<Decimal>()
                .map_err(|_| DataError::coercion(&value, any::type_name::<Self>())),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for String {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Varchar(Some(self.clone())))
    }
    fn empty_value() -> Value {
        Value::Varchar(None)
    }
}

impl ToValue for &str {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Varchar(Some((*self).to_string())))
    }
    fn empty_value() -> Value {
        Value::Varchar(None)
    }
}

impl FromValue for String {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Boolean(Some(v)) => Ok(v.to_string()),
            Value::Int8(Some(v)) => Ok(v.to_string()),
            Value::Int16(Some(v)) => Ok(v.to_string()),
            Value::Int32(Some(v)) => Ok(v.to_string()),
            Value::Int64(Some(v)) => Ok(v.to_string()),
            Value::UInt8(Some(v)) => Ok(v.to_string()),
            Value::UInt16(Some(v)) => Ok(v.to_string()),
            Value::UInt32(Some(v)) => Ok(v.to_string()),
            Value::UInt64(Some(v)) => Ok(v.to_string()),
            Value::Float32(Some(v)) => Ok(v.to_string()),
            Value::Float64(Some(v)) => Ok(v.to_string()),
            Value::Decimal(Some(v)) => Ok(v.to_string()),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Blob(Some(self.clone().into_boxed_slice())))
    }
    fn empty_value() -> Value {
        Value::Blob(None)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Ok(v.into_bytes()),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl ToValue for Box<[u8]> {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Blob(Some(self.clone())))
    }
    fn empty_value() -> Value {
        Value::Blob(None)
    }
}

impl FromValue for Box<[u8]> {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self> {
        Vec::<u8>::from_value(value, coercion).map(Vec::into_boxed_slice)
    }
}

impl ToValue for Uuid {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(Value::Uuid(Some(*self)))
    }
    fn empty_value() -> Value {
        Value::Uuid(None)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => Uuid::parse_str(v.trim())
                .map_err(|_| DataError::coercion(&value, any::type_name::<Self>())),
            Value::Blob(Some(ref v)) => Uuid::from_slice(v)
                .map_err(|_| DataError::coercion(&value, any::type_name::<Self>())),
            _ => Err(DataError::coercion(&value, any::type_name::<Self>())),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self, coercion: &Coercion) -> Result<Value> {
        match self {
            Some(v) => v.to_value(coercion),
            None => Ok(T::empty_value()),
        }
    }
    fn empty_value() -> Value {
        T::empty_value()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value, coercion).map(Some)
    }
    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: ToValue> ToValue for Box<T> {
    fn to_value(&self, coercion: &Coercion) -> Result<Value> {
        self.as_ref().to_value(coercion)
    }
    fn empty_value() -> Value {
        T::empty_value()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value, coercion: &Coercion) -> Result<Self> {
        T::from_value(value, coercion).map(Box::new)
    }
    fn absent() -> Option<Self> {
        T::absent().map(Box::new)
    }
}

impl ToValue for Value {
    fn to_value(&self, _coercion: &Coercion) -> Result<Value> {
        Ok(self.clone())
    }
    fn empty_value() -> Value {
        Value::Null
    }
}

impl FromValue for Value {
    fn from_value(value: Value, _coercion: &Coercion) -> Result<Self> {
        Ok(value)
    }
    fn absent() -> Option<Self> {
        Some(Value::Null)
    }
}
