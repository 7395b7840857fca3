//! Generic type parameter handling and trait bound management.
//!
//! Only generics that appear in `#[status(transparent)]` fields get a
//! `Classify` bound. Everything else is left alone, so a variant carrying a
//! `T` payload under a fixed code does not force `T: Classify`.
//!
//! `PhantomData<T>` never reaches the code path, so it is skipped when
//! collecting.

use syn::{parse_quote, Ident};

use crate::crate_path;

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            if let Some(segment) = path.path.segments.last() {
                if segment.ident == "PhantomData" {
                    return;
                }

                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner_ty) = arg {
                            collect_generics_from_type(inner_ty, generics, result);
                        }
                    }
                }

                for param in generics.type_params() {
                    if segment.ident == param.ident && !result.iter().any(|g| g == &param.ident) {
                        result.push(param.ident.clone());
                    }
                }
            }
        }
        syn::Type::Reference(reference) => {
            collect_generics_from_type(&reference.elem, generics, result);
        }
        syn::Type::Paren(paren) => {
            collect_generics_from_type(&paren.elem, generics, result);
        }
        _ => {}
    }
}

/// Adds `Classify` bounds to generic parameters used in transparent fields.
pub(crate) fn add_classify_bounds(
    mut generics: syn::Generics,
    used_generics: &[Ident],
) -> syn::Generics {
    for param in generics.type_params_mut() {
        if used_generics.iter().any(|g| g == &param.ident) {
            let classify_path = crate_path("Classify");
            param.bounds.push(parse_quote!(#classify_path));
        }
    }
    generics
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn generics() -> syn::Generics {
        parse_quote!(<E, T>)
    }

    #[test]
    fn collects_bare_parameter() {
        let mut result = Vec::new();
        collect_generics_from_type(&parse_quote!(E), &generics(), &mut result);
        assert_eq!(result, vec![Ident::new("E", proc_macro2::Span::call_site())]);
    }

    #[test]
    fn collects_through_box_and_reference() {
        let mut result = Vec::new();
        collect_generics_from_type(&parse_quote!(Box<&'static T>), &generics(), &mut result);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], "T");
    }

    #[test]
    fn skips_phantom_data() {
        let mut result = Vec::new();
        collect_generics_from_type(
            &parse_quote!(::core::marker::PhantomData<E>),
            &generics(),
            &mut result,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn bounds_only_used_parameters() {
        let used = vec![Ident::new("E", proc_macro2::Span::call_site())];
        let bounded = add_classify_bounds(generics(), &used);
        let params: Vec<_> = bounded.type_params().collect();
        assert_eq!(params[0].bounds.len(), 1);
        assert!(params[1].bounds.is_empty());
    }
}
