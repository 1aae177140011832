// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitInt, LitStr};

/// Options collected from `#[convert(...)]` attributes.
#[derive(Default)]
struct ConvertAttrs {
    rename: Option<String>,
    id: Option<u32>,
}

fn parse_attrs(attrs: &[Attribute], allow_id: bool) -> syn::Result<ConvertAttrs> {
    let mut out = ConvertAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("convert") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit.value());
                Ok(())
            } else if allow_id && meta.path.is_ident("id") {
                let lit: LitInt = meta.value()?.parse()?;
                out.id = Some(lit.base10_parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported convert attribute"))
            }
        })?;
    }
    Ok(out)
}

fn reject_generics(input: &DeriveInput) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.generics,
            "generic types are not supported",
        ))
    }
}

/// `#[derive(Record)]`: field metadata for name-matched struct conversion.
///
/// Every named field must itself implement `Convert`. Fields are matched by
/// their Rust name unless `#[convert(rename = "...")]` says otherwise.
///
/// Example:
/// ```ignore
/// use hdds_convert::Record;
///
/// #[derive(Default, Record)]
/// struct Pose {
///     x: f64,
///     y: f64,
///     #[convert(rename = "theta")]
///     heading: f32,
/// }
/// ```
#[proc_macro_derive(Record, attributes(convert))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_record(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    reject_generics(input)?;
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let mut entries = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let attrs = parse_attrs(&field.attrs, false)?;
        let source_name = attrs.rename.unwrap_or_else(|| ident.to_string());
        let ty = &field.ty;
        entries.push(quote! {
            ::hdds_convert::Field::new(
                #source_name,
                ::core::mem::offset_of!(#name, #ident),
                |desc, cx| ::hdds_convert::project::<#name, #ty>(desc, cx, |r| &mut r.#ident),
            )
        });
    }

    Ok(quote! {
        impl ::hdds_convert::Record for #name {
            const FIELDS: &'static [::hdds_convert::Field<Self>] = &[#(#entries),*];
        }

        impl ::hdds_convert::Convert for #name {
            const CAPABILITY: ::hdds_convert::Capability = ::hdds_convert::Capability::Record;

            fn build(
                desc: &::hdds_convert::TypeDescriptor,
                cx: &::hdds_convert::Resolver<'_>,
            ) -> ::hdds_convert::Result<::hdds_convert::Plan<Self>> {
                ::hdds_convert::record::resolve_record::<Self>(desc, cx)
            }
        }
    })
}

/// `#[derive(Variant)]`: constructor metadata for tag-dispatched conversion.
///
/// Constructors are either unit or carry exactly one unnamed payload that
/// implements `Convert + Default`. Each constructor gets its declaration
/// index as id unless `#[convert(id = N)]` is given; names can be remapped
/// with `#[convert(rename = "...")]`.
///
/// Example:
/// ```ignore
/// use hdds_convert::Variant;
///
/// #[derive(Default, Variant)]
/// enum Reply {
///     Value(i64),
///     #[convert(rename = "Error")]
///     Failed(i32),
///     #[default]
///     Empty,
/// }
/// ```
#[proc_macro_derive(Variant, attributes(convert))]
pub fn derive_variant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_variant(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_variant(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    reject_generics(input)?;
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(input, "Only enums are supported"));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(input, "enum has no constructors"));
    }

    let mut entries = Vec::with_capacity(data.variants.len());
    let mut id_arms = Vec::with_capacity(data.variants.len());
    let mut seen_ids: Vec<u32> = Vec::with_capacity(data.variants.len());
    let mut seen_names: Vec<String> = Vec::with_capacity(data.variants.len());
    for (index, variant) in data.variants.iter().enumerate() {
        let ident = &variant.ident;
        let attrs = parse_attrs(&variant.attrs, true)?;
        let source_name = attrs.rename.unwrap_or_else(|| ident.to_string());
        let id = match attrs.id {
            Some(id) => id,
            None => u32::try_from(index)
                .map_err(|_| syn::Error::new_spanned(variant, "too many constructors"))?,
        };
        if seen_ids.contains(&id) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate constructor id {id}"),
            ));
        }
        seen_ids.push(id);
        if seen_names.contains(&source_name) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate constructor name \"{source_name}\""),
            ));
        }
        seen_names.push(source_name.clone());

        match &variant.fields {
            Fields::Unit => {
                entries.push(quote! {
                    ::hdds_convert::Constructor::new(
                        #source_name,
                        #id,
                        |desc, cx| ::hdds_convert::variant::unit::<#name>(desc, cx, |u| *u = #name::#ident),
                    )
                });
                id_arms.push(quote! { #name::#ident => #id });
            }
            Fields::Unnamed(f) if f.unnamed.len() == 1 => {
                let ty = &f.unnamed[0].ty;
                entries.push(quote! {
                    ::hdds_convert::Constructor::new(
                        #source_name,
                        #id,
                        |desc, cx| ::hdds_convert::project::<#name, #ty>(desc, cx, |u| {
                            if !::core::matches!(u, #name::#ident(..)) {
                                *u = #name::#ident(::core::default::Default::default());
                            }
                            match u {
                                #name::#ident(payload) => payload,
                                _ => ::core::unreachable!(),
                            }
                        }),
                    )
                });
                id_arms.push(quote! { #name::#ident(..) => #id });
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "constructors must be unit or carry exactly one unnamed field",
                ))
            }
        }
    }

    Ok(quote! {
        impl ::hdds_convert::Variant for #name {
            const CONSTRUCTORS: &'static [::hdds_convert::Constructor<Self>] = &[#(#entries),*];

            fn constructor_id(&self) -> u32 {
                match self {
                    #(#id_arms,)*
                }
            }
        }

        impl ::hdds_convert::Convert for #name {
            const CAPABILITY: ::hdds_convert::Capability = ::hdds_convert::Capability::Union;

            fn build(
                desc: &::hdds_convert::TypeDescriptor,
                cx: &::hdds_convert::Resolver<'_>,
            ) -> ::hdds_convert::Result<::hdds_convert::Plan<Self>> {
                ::hdds_convert::variant::resolve_variant::<Self>(desc, cx)
            }
        }
    })
}
