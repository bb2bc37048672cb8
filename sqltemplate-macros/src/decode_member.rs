use crate::decode_record::apply_case;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, Ident, LitStr, Path, Type, meta::ParseNestedMeta, parse::ParseBuffer};

pub(crate) enum MemberKind {
    Field(Ident),
    Accessor {
        get: Option<Path>,
        set: Option<Path>,
    },
}

pub(crate) struct MemberMetadata {
    pub(crate) name: String,
    pub(crate) ty: Type,
    pub(crate) kind: MemberKind,
    /// Missing values in holder construction fall back to `Default::default()`.
    pub(crate) default: bool,
}

impl MemberMetadata {
    pub(crate) fn type_name(&self) -> String {
        self.ty
            .to_token_stream()
            .to_string()
            .replace(' ', "")
    }

    pub(crate) fn member_def(&self) -> TokenStream {
        let name = &self.name;
        let ty = &self.ty;
        let type_name = self.type_name();
        let sql_type = quote! {
            ::sqltemplate::Value::sql_type(&<#ty as ::sqltemplate::ToValue>::empty_value())
        };
        match &self.kind {
            MemberKind::Field(..) => quote! {
                ::sqltemplate::Member::field(#name, #type_name, #sql_type)
            },
            MemberKind::Accessor { get, set } => {
                let readable = get.is_some();
                let writable = set.is_some();
                quote! {
                    ::sqltemplate::Member::accessor(#name, #type_name, #sql_type, #readable, #writable)
                }
            }
        }
    }
}

/// Returns `None` when the field is skipped.
pub(crate) fn decode_field(field: &Field, rename_all: Option<&str>) -> Option<MemberMetadata> {
    let Some(ident) = field.ident.clone() else {
        panic!("Record can only be derived for structs with named fields");
    };
    let declared = ident.to_string().trim_start_matches("r#").to_string();
    let mut name = match rename_all {
        Some(case) => apply_case(&declared, case),
        None => declared,
    };
    let mut skip = false;
    let mut default = false;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("record") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `record`, use it like: `#[record(attribute = value, ..)]`");
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!("Error while parsing `name`, use it like: `#[record(name = \"hireDate\")]`");
                    };
                    name = value.value();
                } else if arg.path.is_ident("skip") {
                    skip = true;
                } else if arg.path.is_ident("default") {
                    default = true;
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
    if skip {
        return None;
    }
    Some(MemberMetadata {
        name,
        ty: field.ty.clone(),
        kind: MemberKind::Field(ident),
        default,
    })
}

/// Parses `property(name = "..", ty = T, get = path, set = path)`.
pub(crate) fn decode_property(meta: ParseNestedMeta<'_>) -> MemberMetadata {
    let mut name = None;
    let mut ty = None;
    let mut get = None;
    let mut set = None;
    let usage = "use it like: `#[record(property(name = \"fullName\", ty = String, get = Self::full_name, set = Self::set_full_name))]`";
    let _ = meta.parse_nested_meta(|arg| {
        if arg.path.is_ident("name") {
            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!("Error while parsing property `name`, {usage}");
            };
            name = Some(value.value());
        } else if arg.path.is_ident("ty") {
            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<Type>) else {
                panic!("Error while parsing property `ty`, {usage}");
            };
            ty = Some(value);
        } else if arg.path.is_ident("get") {
            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<Path>) else {
                panic!("Error while parsing property `get`, {usage}");
            };
            get = Some(value);
        } else if arg.path.is_ident("set") {
            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<Path>) else {
                panic!("Error while parsing property `set`, {usage}");
            };
            set = Some(value);
        } else {
            panic!(
                "Unknown attribute `{}` inside property, {usage}",
                arg.path.to_token_stream().to_string()
            );
        }
        Ok(())
    });
    let (Some(name), Some(ty)) = (name, ty) else {
        panic!("A property needs both `name` and `ty`, {usage}");
    };
    if get.is_none() && set.is_none() {
        panic!("Property `{name}` needs at least one of `get` and `set`, {usage}");
    }
    MemberMetadata {
        name,
        ty,
        kind: MemberKind::Accessor { get, set },
        default: false,
    }
}
