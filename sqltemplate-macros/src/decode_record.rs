use crate::decode_member::{MemberKind, MemberMetadata, decode_field, decode_property};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{Ident, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct RecordMetadata {
    pub(crate) item: ItemStruct,
    /// Fields first, then properties, in declaration order.
    pub(crate) members: Vec<MemberMetadata>,
    /// Fields excluded from the schema, built with `Default::default()`.
    pub(crate) skipped: Vec<Ident>,
}

impl RecordMetadata {
    pub(crate) fn fields(&self) -> impl Iterator<Item = (usize, &MemberMetadata, &Ident)> + Clone {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(i, m)| match &m.kind {
                MemberKind::Field(ident) => Some((i, m, ident)),
                MemberKind::Accessor { .. } => None,
            })
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields().count()
    }
}

/// Renames `name` to the case named by `case`, as written in `rename_all`.
pub(crate) fn apply_case(name: &str, case: &str) -> String {
    match case {
        "camelCase" => name.to_case(Case::Camel),
        "PascalCase" => name.to_case(Case::Pascal),
        "snake_case" => name.to_case(Case::Snake),
        "SCREAMING_SNAKE_CASE" => name.to_case(Case::Constant),
        "kebab-case" => name.to_case(Case::Kebab),
        "lowercase" => name.to_case(Case::Flat),
        "UPPERCASE" => name.to_case(Case::UpperFlat),
        _ => panic!(
            "Unknown case `{case}`, expected one of: camelCase, PascalCase, snake_case, SCREAMING_SNAKE_CASE, kebab-case, lowercase, UPPERCASE"
        ),
    }
}

pub(crate) fn decode_record(item: ItemStruct) -> RecordMetadata {
    let mut rename_all = None;
    let mut properties = Vec::new();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("record") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `record`, use it like: `#[record(attribute = value, ..)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("rename_all") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `rename_all`, use it like: `#[record(rename_all = \"camelCase\")]`");
                    };
                    let case = value.value();
                    // Unknown cases panic here
                    apply_case("", &case);
                    rename_all = Some(case);
                } else if arg.path.is_ident("property") {
                    properties.push(decode_property(arg));
                } else {
                    panic!(
                        "Unknown attribute `{}` inside record macro",
                        arg.path.to_token_stream().to_string()
                    );
                }
                Ok(())
            });
        }
    }
    let mut members = Vec::new();
    let mut skipped = Vec::new();
    for field in &item.fields {
        match decode_field(field, rename_all.as_deref()) {
            Some(member) => members.push(member),
            None => skipped.extend(field.ident.clone()),
        }
    }
    members.extend(properties);
    RecordMetadata {
        item,
        members,
        skipped,
    }
}
