//! Parsing of `#[status(...)]` attributes.
//!
//! This module maps attribute syntax to classification decisions and produces
//! structured errors for invalid forms.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{spanned::Spanned, Attribute, Ident, Meta, Result};

use crate::crate_path;

/// Status codes an error may declare. `Ok` is deliberately absent.
const DECLARABLE_CODES: &[&str] = &[
    "Cancelled",
    "Unknown",
    "InvalidArgument",
    "DeadlineExceeded",
    "NotFound",
    "AlreadyExists",
    "PermissionDenied",
    "ResourceExhausted",
    "FailedPrecondition",
    "Aborted",
    "OutOfRange",
    "Unimplemented",
    "Internal",
    "Unavailable",
    "DataLoss",
    "Unauthenticated",
];

/// How a struct or variant reports its status code.
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Unclassified` | Reports `Code::Unknown` (or the enum default) |
/// | `#[status(Code)]` | `Code(Code)` | Reports the named code |
/// | `#[status(transparent)]` | `Transparent` | Delegates to the single field |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation.
    Unclassified,
    /// `#[status(NotFound)]` and friends.
    Code(Ident),
    /// `#[status(transparent)]`: forward to the wrapped error.
    Transparent(Span),
}

impl Strategy {
    /// Tokens for a fixed code, `None` for transparent delegation.
    pub(crate) fn code_tokens(&self) -> Option<TokenStream> {
        let code = crate_path("Code");
        match self {
            Strategy::Unclassified => Some(quote! { #code::Unknown }),
            Strategy::Code(ident) => Some(quote! { #code::#ident }),
            Strategy::Transparent(_) => None,
        }
    }
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[status] attributes specified on the same item",
        ));
    }
    *target = Some(next);
    Ok(())
}

fn parse_code(ident: Ident) -> Result<Strategy> {
    if ident == "transparent" {
        return Ok(Strategy::Transparent(ident.span()));
    }
    if ident == "Ok" {
        return Err(syn::Error::new(
            ident.span(),
            "`Ok` is not an error status; pick a failure code",
        ));
    }
    if !DECLARABLE_CODES.iter().any(|code| ident == *code) {
        return Err(syn::Error::new(
            ident.span(),
            format!(
                "unknown status code `{ident}`; expected one of {} or `transparent`",
                DECLARABLE_CODES.join(", ")
            ),
        ));
    }
    Ok(Strategy::Code(ident))
}

/// Parses the `#[status(...)]` attributes attached to a single item.
///
/// Returns `None` when no `#[status]` attribute is present.
pub(crate) fn parse_status_attrs(attrs: &[Attribute]) -> Result<Option<Strategy>> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("status") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected a status code (e.g., #[status(NotFound)])",
                ));
            }
            Meta::List(list) => match syn::parse2::<Ident>(list.tokens.clone()) {
                Ok(ident) => {
                    set_strategy(&mut strategy, parse_code(ident)?, attr.span())?;
                }
                Err(_) => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected a status code (e.g., #[status(NotFound)])",
                    ));
                }
            },
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[status]",
                ));
            }
        }
    }

    Ok(strategy)
}
