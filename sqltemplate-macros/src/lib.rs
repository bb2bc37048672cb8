mod decode_member;
mod decode_record;
mod record_trait;
mod sql_enum;

use decode_record::decode_record;
use proc_macro::TokenStream;
use record_trait::record_trait;
use sql_enum::sql_enum;
use syn::{ItemEnum, ItemStruct, parse_macro_input};

/// Implements `Record` and `FromRow` for a struct with named fields.
///
/// Struct attributes: `#[record(rename_all = "camelCase")]` and
/// `#[record(property(name = "..", ty = T, get = path, set = path))]`.
/// Field attributes: `#[record(name = "..")]`, `#[record(skip)]` and
/// `#[record(default)]`.
///
/// A struct that implements `Default` is mapped onto a default instance and
/// members without a column keep their default. Any other struct is built once
/// from the mapped members: a missing `Option` member becomes `None`, and a
/// missing non-`Option` member fails with `DataError::MissingMember` unless it
/// is marked `#[record(default)]`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !item.generics.params.is_empty() {
        panic!("Record cannot be derived for generic structs");
    }
    let record = decode_record(item);
    record_trait(&record).into()
}

/// Stores a unit enum as the name of its variant.
#[proc_macro_derive(SqlEnum, attributes(record))]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let item: ItemEnum = parse_macro_input!(input as ItemEnum);
    sql_enum(&item).into()
}
