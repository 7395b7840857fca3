//! Enum-specific `Classify` derivation.
//!
//! This module generates one match arm per variant. A container-level
//! `#[status(Code)]` is the default for variants without their own attribute.

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataEnum, Fields, Result, Variant};

use crate::{
    crate_path,
    generics::collect_generics_from_type,
    strategy::{parse_status_attrs, Strategy},
    DeriveOutput,
};

pub(crate) fn derive_enum(
    name: &Ident,
    data: &DataEnum,
    container: Option<Strategy>,
    generics: &syn::Generics,
) -> Result<DeriveOutput> {
    let default = match container {
        Some(Strategy::Transparent(span)) => {
            return Err(syn::Error::new(
                span,
                "#[status(transparent)] on an enum must be placed on individual variants",
            ));
        }
        Some(strategy) => strategy,
        None => Strategy::Unclassified,
    };

    if data.variants.is_empty() {
        return Ok(DeriveOutput {
            body: quote! { match *self {} },
            transparent_generics: Vec::new(),
        });
    }

    let mut arms = Vec::new();
    let mut transparent_generics = Vec::new();

    for variant in &data.variants {
        let strategy = parse_status_attrs(&variant.attrs)?.unwrap_or_else(|| default.clone());
        let arm = match strategy.code_tokens() {
            Some(code) => {
                let variant_ident = &variant.ident;
                quote! { #name::#variant_ident { .. } => #code }
            }
            None => transparent_arm(name, variant, generics, &mut transparent_generics)?,
        };
        arms.push(arm);
    }

    Ok(DeriveOutput {
        body: quote! {
            match self {
                #(#arms),*
            }
        },
        transparent_generics,
    })
}

fn transparent_arm(
    name: &Ident,
    variant: &Variant,
    generics: &syn::Generics,
    transparent_generics: &mut Vec<Ident>,
) -> Result<TokenStream> {
    let classify = crate_path("Classify");
    let variant_ident = &variant.ident;
    let span = variant.span();

    match &variant.fields {
        Fields::Named(fields) if fields.named.len() == 1 => {
            let field = &fields.named[0];
            collect_generics_from_type(&field.ty, generics, transparent_generics);
            let field_ident = &field.ident;
            Ok(quote_spanned! { span =>
                #name::#variant_ident { #field_ident: inner } => #classify::code(inner)
            })
        }
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            collect_generics_from_type(&fields.unnamed[0].ty, generics, transparent_generics);
            Ok(quote_spanned! { span =>
                #name::#variant_ident(inner) => #classify::code(inner)
            })
        }
        _ => Err(syn::Error::new(
            span,
            "#[status(transparent)] requires a variant with exactly one field",
        )),
    }
}
