//! Implementation of the `#[derive(FilterModel)]` macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Path};

/// Parse and generate code for the `#[derive(FilterModel)]` macro.
pub fn derive_filter_model_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "FilterModel derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "FilterModel derive only supports structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(input)?;
    let model_name = struct_attrs.name.unwrap_or_else(|| name.to_string());
    let krate = struct_attrs
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::tagfilter));

    let mut field_infos = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(info) = parse_field(field)? {
            field_infos.push(info);
        }
    }

    let field_defs = field_infos.iter().map(|f| {
        let field_name = &f.name;
        let tags = f.tags.iter().map(|(key, value)| {
            quote! { #krate::model::FieldTag::new(#key, #value) }
        });
        // The tag slice is its own const so it is promoted to 'static.
        quote! {
            #krate::model::FieldDef::new(#field_name, {
                const TAGS: &[#krate::model::FieldTag] = &[#(#tags),*];
                TAGS
            })
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::model::TaggedModel for #name #ty_generics #where_clause {
            const MODEL_NAME: &'static str = #model_name;
            const FIELDS: &'static [#krate::model::FieldDef] = &[#(#field_defs),*];
        }

        impl #impl_generics #krate::model::ModelMetadata for #name #ty_generics #where_clause {
            fn model_name(&self) -> &str {
                <Self as #krate::model::TaggedModel>::MODEL_NAME
            }

            fn fields(&self) -> &[#krate::model::FieldDef] {
                <Self as #krate::model::TaggedModel>::FIELDS
            }
        }
    })
}

/// Struct-level attributes parsed from `#[filter(...)]`.
#[derive(Debug, Default)]
struct StructAttrs {
    name: Option<String>,
    krate: Option<Path>,
}

/// Parse struct-level `#[filter(...)]` attributes.
fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs, syn::Error> {
    let mut attrs = StructAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("filter") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.name = Some(value.value());
            } else if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.krate = Some(value.parse()?);
            } else {
                return Err(meta.error("unknown filter attribute, expected `name` or `crate`"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// A field as it appears in the generated table.
#[derive(Debug)]
struct FieldInfo {
    name: String,
    tags: Vec<(String, String)>,
}

/// Parse a field and its `#[tag(...)]` / `#[filter(...)]` attributes.
///
/// Returns `None` for skipped fields.
fn parse_field(field: &syn::Field) -> Result<Option<FieldInfo>, syn::Error> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "Fields must be named"))?;

    let mut name = ident.unraw().to_string();
    let mut skip = false;
    let mut tags: Vec<(String, String)> = Vec::new();

    for attr in &field.attrs {
        if attr.path().is_ident("filter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    name = value.value();
                } else {
                    return Err(meta.error("unknown filter attribute, expected `name` or `skip`"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("tag key must be a single identifier"))?
                    .unraw()
                    .to_string();
                if tags.iter().any(|(k, _)| *k == key) {
                    return Err(meta.error(format!("duplicate tag `{}`", key)));
                }
                let value: LitStr = meta.value()?.parse()?;
                tags.push((key, value.value()));
                Ok(())
            })?;
        }
    }

    if skip {
        return Ok(None);
    }
    Ok(Some(FieldInfo { name, tags }))
}
