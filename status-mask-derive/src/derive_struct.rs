//! Struct-specific `Classify` derivation.
//!
//! A struct reports one code for every value: the container attribute, or
//! `Unknown` when there is none. `#[status(transparent)]` forwards to the
//! struct's only field.

use proc_macro2::Ident;
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Fields, Result};

use crate::{
    crate_path,
    generics::collect_generics_from_type,
    strategy::Strategy,
    DeriveOutput,
};

pub(crate) fn derive_struct(
    name: &Ident,
    data: &DataStruct,
    container: Option<Strategy>,
    generics: &syn::Generics,
) -> Result<DeriveOutput> {
    let strategy = container.unwrap_or(Strategy::Unclassified);
    if let Some(code) = strategy.code_tokens() {
        return Ok(DeriveOutput {
            body: code,
            transparent_generics: Vec::new(),
        });
    }

    let field = match &data.fields {
        Fields::Named(fields) if fields.named.len() == 1 => &fields.named[0],
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0],
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "#[status(transparent)] requires a struct with exactly one field",
            ));
        }
    };

    let classify = crate_path("Classify");
    let mut transparent_generics = Vec::new();
    collect_generics_from_type(&field.ty, generics, &mut transparent_generics);

    let span = field.span();
    let body = match &field.ident {
        Some(ident) => quote_spanned! { span => #classify::code(&self.#ident) },
        None => quote_spanned! { span => #classify::code(&self.0) },
    };

    Ok(DeriveOutput {
        body: quote! { #body },
        transparent_generics,
    })
}
