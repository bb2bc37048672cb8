use crate::{Coercion, Member, Result, Value};

/// A type with a schema: the members it exposes to mapping and binding.
///
/// Usually generated by `#[derive(Record)]`. A hand written implementation is
/// the explicit mapping table alternative: list the members once, then read
/// and build them by index.
pub trait Record: Sized + 'static {
    /// Members in declaration order. Indexes into this slice identify a member
    /// in [`Record::read_member`] and [`Record::from_members`].
    fn members() -> &'static [Member];
    /// Value of the member at `index`, `None` if it is not readable.
    fn read_member(&self, index: usize, coercion: &Coercion) -> Result<Option<Value>>;
    /// Build an instance out of the values collected for one row. Members with
    /// no entry keep their default or take [`crate::FromValue::absent`].
    fn from_members(values: Vec<(usize, Value)>, coercion: &Coercion) -> Result<Self>;
}
