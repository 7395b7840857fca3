//! Derive macros for `status-mask`.
//!
//! This crate generates the `Classify` implementation behind
//! `#[derive(Classify)]`. It:
//! - reads `#[status(...)]` attributes on containers and enum variants
//! - emits a `code()` body that reports the declared RPC status kind
//!
//! It does **not** decide whether an error is masked. That decision lives in the
//! main `status-mask` crate and is made at runtime from the reported code.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::add_classify_bounds;
use strategy::parse_status_attrs;

/// Derives `status_mask::Classify` for structs and enums.
///
/// # Container Attributes
///
/// - `#[status(Code)]` - On a struct, every value reports `Code`. On an enum, `Code` becomes the
///   default for variants without their own attribute.
/// - `#[status(transparent)]` - Structs only. The struct must have exactly one field, and its
///   `Classify` implementation is used.
///
/// # Variant Attributes
///
/// - **No annotation**: The variant reports the container default, or `Unknown` when there is
///   none. `Unknown` errors are masked by the `status-mask` adapters.
/// - `#[status(Code)]`: The variant reports `Code`, which must name a variant of
///   `status_mask::Code` other than `Ok`.
/// - `#[status(transparent)]`: The variant must have exactly one field; its `Classify`
///   implementation is used.
///
/// Unions are rejected at compile time.
#[proc_macro_derive(Classify, attributes(status))]
pub fn derive_classify(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the status-mask crate root.
///
/// Handles crate renaming (e.g., `my_mask = { package = "status-mask", ... }`).
/// The library declares `extern crate self as status_mask`, so the absolute
/// path also resolves from inside the crate and its integration tests.
fn crate_root() -> TokenStream {
    match crate_name("status-mask") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::status_mask },
    }
}

fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let container_strategy = parse_status_attrs(&attrs)?;
    let crate_root = crate_root();

    let output = match &data {
        Data::Struct(data) => derive_struct(&ident, data, container_strategy, &generics)?,
        Data::Enum(data) => derive_enum(&ident, data, container_strategy, &generics)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Classify` cannot be derived for unions",
            ));
        }
    };

    let classify_generics = add_classify_bounds(generics, &output.transparent_generics);
    let (impl_generics, ty_generics, where_clause) = classify_generics.split_for_impl();
    let body = &output.body;

    Ok(quote! {
        impl #impl_generics #crate_root::Classify for #ident #ty_generics #where_clause {
            fn code(&self) -> #crate_root::Code {
                #body
            }
        }
    })
}

/// Output shared by struct and enum derivation.
pub(crate) struct DeriveOutput {
    pub(crate) body: TokenStream,
    pub(crate) transparent_generics: Vec<proc_macro2::Ident>,
}
