//! Masking unclassified errors and the call adapters that apply it.
//!
//! - **`masker`**: token generation and diagnostic recording bound together
//!   (`ErrorMasker`, `MaskedError`)
//! - **`adapter`**: single-response and streaming call wrappers on top of the
//!   masker
//!
//! Classification itself lives in `crate::classification`.

mod adapter;
mod masker;

pub use masker::{ErrorMasker, MaskedError};
