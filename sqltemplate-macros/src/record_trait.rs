use crate::{
    decode_member::{MemberKind, MemberMetadata},
    decode_record::RecordMetadata,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// `Option<T>` out of the row value `__v__`, `?` on conversion failures.
fn decode_value(member: &MemberMetadata) -> TokenStream {
    let ty = &member.ty;
    let name = &member.name;
    let type_name = member.type_name();
    quote! {
        if __v__.is_null() {
            <#ty as ::sqltemplate::FromValue>::absent()
        } else {
            Some(::sqltemplate::Context::with_context(
                <#ty as ::sqltemplate::FromValue>::from_value(__v__, __coercion__),
                || format!("While mapping member `{}` of type {}", #name, #type_name),
            )?)
        }
    }
}

pub(crate) fn record_trait(record: &RecordMetadata) -> TokenStream {
    let item = &record.item;
    let struct_name = &item.ident;
    let trait_name = format_ident!("{}FromMembersTrait", struct_name);
    let factory_name = format_ident!("{}FromMembersFactory", struct_name);
    let field_count = record.field_count();
    let member_defs = record.members.iter().map(MemberMetadata::member_def);

    let field_assignment_default = record.fields().map(|(i, member, ident)| {
        let decode = decode_value(member);
        quote! {
            #i => {
                let __m__ = #decode;
                if let Some(__m__) = __m__ {
                    result.#ident = __m__;
                }
            }
        }
    });
    let holders = record.fields().map(|(i, _, _)| format_ident!("__member_{}", i));
    let holder_declarations = record.fields().zip(holders.clone()).map(|((_, member, _), holder)| {
        let ty = &member.ty;
        quote!(let mut #holder: Option<#ty> = None;)
    });
    let field_assignment_holder = record.fields().zip(holders.clone()).map(|((i, member, _), holder)| {
        let decode = decode_value(member);
        quote! {
            #i => {
                let __m__ = #decode;
                if __m__.is_some() {
                    #holder = __m__;
                }
            }
        }
    });
    let create_result = record.fields().zip(holders).map(|((_, member, ident), holder)| {
        let ty = &member.ty;
        let name = &member.name;
        let fallback = if member.default {
            quote!(<#ty as ::sqltemplate::FromValue>::absent().unwrap_or_default())
        } else {
            quote! {
                <#ty as ::sqltemplate::FromValue>::absent().ok_or_else(|| {
                    ::sqltemplate::Error::from(::sqltemplate::DataError::MissingMember {
                        member: #name,
                        target: ::std::any::type_name::<#struct_name>(),
                    })
                })?
            }
        };
        quote! {
            #ident: match #holder {
                Some(v) => v,
                None => #fallback,
            }
        }
    });
    let skipped = record.skipped.iter();

    let read_member = record.members.iter().enumerate().filter_map(|(i, member)| {
        let read = match &member.kind {
            MemberKind::Field(ident) => quote!(&self.#ident),
            MemberKind::Accessor { get: Some(get), .. } => quote!(&#get(self)),
            MemberKind::Accessor { get: None, .. } => return None,
        };
        let name = &member.name;
        let type_name = member.type_name();
        Some(quote! {
            #i => ::sqltemplate::Context::with_context(
                ::sqltemplate::ToValue::to_value(#read, __coercion__),
                || format!("While binding member `{}` of type {}", #name, #type_name),
            )
            .map(Some),
        })
    });
    let setters = record
        .members
        .iter()
        .enumerate()
        .filter_map(|(i, member)| match &member.kind {
            MemberKind::Accessor { set: Some(set), .. } => {
                let decode = decode_value(member);
                Some(quote! {
                    #i => {
                        let __m__ = #decode;
                        if let Some(__m__) = __m__ {
                            #set(&mut result, __m__);
                        }
                    }
                })
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    let from_members = if setters.is_empty() {
        quote!(#factory_name::<#struct_name>::from_members(values, __coercion__))
    } else {
        quote! {
            let (__fields__, __properties__): (Vec<_>, Vec<_>) =
                values.into_iter().partition(|(i, _)| *i < #field_count);
            let mut result = #factory_name::<#struct_name>::from_members(__fields__, __coercion__)?;
            for (__i__, __v__) in __properties__ {
                match __i__ {
                    #(#setters)*
                    _ => {}
                }
            }
            Ok(result)
        }
    };

    quote! {
        const _: () = {
            #[allow(dead_code)]
            trait #trait_name {
                fn from_members(
                    values: Vec<(usize, ::sqltemplate::Value)>,
                    __coercion__: &::sqltemplate::Coercion,
                ) -> ::sqltemplate::Result<#struct_name>;
            }
            struct #factory_name<T>(::std::marker::PhantomData<T>);
            impl<T: Default + Into<#struct_name>> #factory_name<T> {
                // Called when T has Default Trait
                #[allow(dead_code, unused_mut)]
                fn from_members(
                    values: Vec<(usize, ::sqltemplate::Value)>,
                    __coercion__: &::sqltemplate::Coercion,
                ) -> ::sqltemplate::Result<#struct_name> {
                    let mut result: #struct_name = T::default().into();
                    for (__i__, __v__) in values {
                        match __i__ {
                            #(#field_assignment_default)*
                            _ => {}
                        }
                    }
                    Ok(result)
                }
            }
            impl<T> #trait_name for #factory_name<T> {
                // Called when T doesn't have default trait
                fn from_members(
                    values: Vec<(usize, ::sqltemplate::Value)>,
                    __coercion__: &::sqltemplate::Coercion,
                ) -> ::sqltemplate::Result<#struct_name> {
                    #(#holder_declarations)*
                    for (__i__, __v__) in values {
                        match __i__ {
                            #(#field_assignment_holder)*
                            _ => {}
                        }
                    }
                    Ok(#struct_name {
                        #(#create_result,)*
                        #(#skipped: Default::default(),)*
                    })
                }
            }

            impl ::sqltemplate::Record for #struct_name {
                fn members() -> &'static [::sqltemplate::Member] {
                    static MEMBERS: ::std::sync::LazyLock<Box<[::sqltemplate::Member]>> =
                        ::std::sync::LazyLock::new(|| vec![#(#member_defs),*].into_boxed_slice());
                    &MEMBERS
                }

                fn read_member(
                    &self,
                    index: usize,
                    __coercion__: &::sqltemplate::Coercion,
                ) -> ::sqltemplate::Result<Option<::sqltemplate::Value>> {
                    match index {
                        #(#read_member)*
                        _ => Ok(None),
                    }
                }

                fn from_members(
                    values: Vec<(usize, ::sqltemplate::Value)>,
                    __coercion__: &::sqltemplate::Coercion,
                ) -> ::sqltemplate::Result<Self> {
                    #from_members
                }
            }

            impl ::sqltemplate::FromRow for #struct_name {
                type Mapper = ::sqltemplate::RecordMapper<Self>;
                fn mapper(coercion: ::sqltemplate::Coercion) -> Self::Mapper {
                    ::sqltemplate::RecordMapper::new(coercion)
                }
            }
        };
    }
}
