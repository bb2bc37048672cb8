use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Fields, ItemEnum, LitStr, parse::ParseBuffer};

pub(crate) fn sql_enum(item: &ItemEnum) -> TokenStream {
    let enum_name = &item.ident;
    let variants = item
        .variants
        .iter()
        .map(|variant| {
            if !matches!(variant.fields, Fields::Unit) {
                panic!(
                    "SqlEnum can only be derived for enums with unit variants, `{}` has fields",
                    variant.ident
                );
            }
            let mut name = variant.ident.to_string();
            for attr in &variant.attrs {
                let meta = &attr.meta;
                if meta.path().is_ident("record") {
                    let Ok(list) = meta.require_list() else {
                        panic!("Error while parsing `record`, use it like: `#[record(name = \"VALUE\")]`");
                    };
                    let _ = list.parse_nested_meta(|arg| {
                        if arg.path.is_ident("name") {
                            let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                                panic!("Error while parsing `name`, use it like: `#[record(name = \"VALUE\")]`");
                            };
                            name = value.value();
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
            (&variant.ident, name)
        })
        .collect::<Vec<_>>();
    let to_name = variants
        .iter()
        .map(|(ident, name)| quote!(Self::#ident => #name,));
    let from_name = variants
        .iter()
        .map(|(ident, name)| quote!(#name => Some(Self::#ident),));
    quote! {
        impl ::sqltemplate::SqlEnum for #enum_name {
            fn name(&self) -> &'static str {
                match self {
                    #(#to_name)*
                }
            }
            fn from_name(name: &str) -> Option<Self> {
                match name {
                    #(#from_name)*
                    _ => None,
                }
            }
        }

        impl ::sqltemplate::ToValue for #enum_name {
            fn to_value(
                &self,
                _coercion: &::sqltemplate::Coercion,
            ) -> ::sqltemplate::Result<::sqltemplate::Value> {
                Ok(::sqltemplate::enum_to_value(self))
            }
            fn empty_value() -> ::sqltemplate::Value {
                ::sqltemplate::Value::Varchar(None)
            }
        }

        impl ::sqltemplate::FromValue for #enum_name {
            fn from_value(
                value: ::sqltemplate::Value,
                _coercion: &::sqltemplate::Coercion,
            ) -> ::sqltemplate::Result<Self> {
                ::sqltemplate::enum_from_value(value)
            }
        }

        impl ::sqltemplate::FromRow for #enum_name {
            type Mapper = ::sqltemplate::SingleColumnMapper<Self>;
            fn mapper(coercion: ::sqltemplate::Coercion) -> Self::Mapper {
                ::sqltemplate::SingleColumnMapper::new(coercion)
            }
        }
    }
}
