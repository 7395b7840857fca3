//! Error masking for RPC servers.
//!
//! This crate sits between a service's handlers and its clients and separates:
//! - **Classified failures**: errors the service signaled on purpose, with an
//!   explicit status code. They pass through unchanged.
//! - **Unclassified failures**: everything else (`Unknown` codes, bugs that
//!   surfaced as errors). They are replaced by an `Internal` status whose only
//!   message is a correlation token.
//!
//! The original error is written to a [`DiagnosticSink`] under the same token,
//! so an operator can recover it from the logs using nothing but what the
//! client received.
//!
//! Key rules:
//! - Classification looks at the code only. `Ok` and `Unknown` on an error
//!   value are unclassified; every other code is classified.
//! - Tokens are `<RFC 3339 UTC timestamp>-<UUID>`; uniqueness comes from the
//!   UUID.
//! - The sink write happens before the masked error is returned. Its failure
//!   is ignored.
//!
//! What this crate does:
//! - defines the status model ([`Code`], [`Status`]) and the [`Classify`] /
//!   [`RpcStatus`] traits
//! - provides the masker and single-response / streaming call adapters
//! - provides sinks, plus integrations behind feature flags (`slog`, `tonic`)
//!
//! What it does not do:
//! - run a server or touch the transport
//! - retry, aggregate, or translate classified errors
//!
//! The `Classify` derive macro lives in `status-mask-derive` and is re-exported
//! when the `derive` feature is enabled.

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
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[cfg(feature = "derive")]
pub use status_mask_derive::Classify;

#[allow(unused_extern_crates)]
extern crate self as status_mask;

// Module declarations
mod classification;
mod masking;
mod sink;
#[cfg(feature = "slog")]
pub mod slog;
mod status;
mod token;
#[cfg(feature = "tonic")]
pub mod tonic;

// Re-exports
pub use classification::{classify, classify_outcome, Classification};
pub use masking::{ErrorMasker, MaskedError};
pub use sink::{
    DiagnosticRecord, DiagnosticSink, Fallback, LineSink, MemorySink, NullSink, SinkError,
};
#[cfg(feature = "slog")]
pub use crate::slog::SlogSink;
pub use status::{CallOutcome, Classify, Code, RpcStatus, Status};
pub use token::{
    Clock, CorrelationToken, IdSource, RandomIds, SystemClock, TokenError, TokenGenerator,
};
