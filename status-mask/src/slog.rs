//! Emitting diagnostic records through `slog`.
//!
//! This module provides:
//! - [`SlogSink`], a [`DiagnosticSink`] that logs each record at `error` level
//! - a `slog::Value` implementation for [`DiagnosticRecord`] that serializes
//!   the record as structured JSON via `slog`'s nested-value support
//!
//! Logging through `slog` cannot fail from the caller's point of view: drain
//! errors are handled by the drain (`fuse`, `ignore_res`), and serialization
//! failures fall back to a placeholder string.
//!
//! It does not configure drains. Whether writes are synchronous is decided by
//! the drain the logger was built with; `slog-async` moves them off the call
//! path.

use serde_json::Value as JsonValue;
use slog::{Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::sink::{DiagnosticRecord, DiagnosticSink, SinkError};

/// Placeholder emitted when a record cannot be converted to JSON.
const SERIALIZE_FAILED: &str = "Failed to serialize diagnostic record";

impl SlogValue for DiagnosticRecord {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let json = serde_json::to_value(self)
            .unwrap_or_else(|_| JsonValue::String(SERIALIZE_FAILED.to_string()));
        let nested = slog::Serde(json);
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Logs masked errors to a `slog::Logger`.
///
/// Each record becomes one `error` line whose message is
/// `<token> <CODE>: <message>`. Keys:
/// - `correlation_token`: the token the client received
/// - `code`, `error`, `captured_at`: the original code, message and capture time
/// - `detail`: cause chain or attached details, when the error had any
/// - `diagnostic`: the whole record as nested JSON
#[derive(Clone, Debug)]
pub struct SlogSink {
    logger: Logger,
}

impl SlogSink {
    /// Logs through `logger`.
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The logger records are written to.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl DiagnosticSink for SlogSink {
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        slog::error!(
            self.logger,
            "{}", record;
            "correlation_token" => %record.token(),
            "code" => record.code().as_str(),
            "error" => record.message(),
            "detail" => record.detail(),
            "captured_at" => record.captured_at_rfc3339(),
            "diagnostic" => record
        );
        Ok(())
    }
}
