//! Where original error detail goes once an error is masked.
//!
//! A [`DiagnosticSink`] receives one [`DiagnosticRecord`] per masking event.
//! Writes are best-effort: the masker ignores a [`SinkError`], so a broken
//! sink never changes what the client sees.
//!
//! Sinks are shared across concurrent calls. Each implementation here writes
//! a record as one unit, so records never interleave.

use std::{
    fmt,
    io::{self, Write},
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{status::Code, token::CorrelationToken};

/// The original error, filed under the token the client received.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "slog", derive(serde::Serialize))]
pub struct DiagnosticRecord {
    token: CorrelationToken,
    code: Code,
    message: String,
    detail: Option<String>,
    captured_at: DateTime<Utc>,
}

impl DiagnosticRecord {
    /// Creates a record. The capture time is taken from the token.
    pub fn new(token: CorrelationToken, code: Code, message: impl Into<String>) -> Self {
        let captured_at = token.timestamp();
        Self {
            token,
            code,
            message: message.into(),
            detail: None,
            captured_at,
        }
    }

    /// Attaches structured detail that does not fit in the message, such as a
    /// cause chain or framework error details.
    #[must_use]
    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// The token handed to the client.
    pub fn token(&self) -> &CorrelationToken {
        &self.token
    }

    /// The original error's code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The original error's full message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Detail kept alongside the message, if the error carried any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// When the error was masked.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// The capture time as RFC 3339 with nanosecond precision.
    pub fn captured_at_rfc3339(&self) -> String {
        self.captured_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Renders the record as a single log line: `<token> <CODE>: <message>`,
/// followed by ` [<detail>]` when there is detail.
impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.token, self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " [{detail}]")?;
        }
        Ok(())
    }
}

/// Errors a sink may report. The masker drops them.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("diagnostic write failed: {0}")]
    Io(#[from] io::Error),
    /// A previous writer panicked while holding the sink's lock.
    #[error("diagnostic sink lock poisoned")]
    Poisoned,
    /// The sink refused the record.
    #[error("diagnostic record rejected: {0}")]
    Rejected(String),
}

impl<T> From<PoisonError<T>> for SinkError {
    fn from(_: PoisonError<T>) -> Self {
        SinkError::Poisoned
    }
}

/// Records masked errors for later lookup by operators.
pub trait DiagnosticSink {
    /// Writes one record.
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError>;
}

impl<S> DiagnosticSink for &S
where
    S: DiagnosticSink + ?Sized,
{
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }
}

impl<S> DiagnosticSink for Box<S>
where
    S: DiagnosticSink + ?Sized,
{
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }
}

impl<S> DiagnosticSink for Arc<S>
where
    S: DiagnosticSink + ?Sized,
{
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }
}

/// Keeps records in memory.
///
/// Meant for tests. [`MemorySink::new`] never forgets a record and
/// [`MemorySink::lookup`] scans linearly; a long-running process should use
/// [`MemorySink::bounded`] or a logging sink instead.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<VecDeque<DiagnosticRecord>>,
    capacity: Option<usize>,
}

impl MemorySink {
    /// An empty, unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty sink holding at most `capacity` records (minimum one). The
    /// oldest record is evicted first.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity: Some(capacity.max(1)),
        }
    }

    /// A snapshot of every record held, in write order.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Finds the record filed under `token`.
    pub fn lookup(&self, token: &str) -> Option<DiagnosticRecord> {
        let token = token.trim();
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.token.as_str() == token)
            .cloned()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no record has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock()?;
        if let Some(capacity) = self.capacity {
            while records.len() >= capacity {
                records.pop_front();
            }
        }
        records.push_back(record.clone());
        Ok(())
    }
}

/// Writes each record as one line to an `io::Write`.
///
/// The line is assembled first and written with a single `write_all` under a
/// lock. Newlines inside the record are escaped as `\n`.
#[derive(Debug)]
pub struct LineSink<W> {
    writer: Mutex<W>,
}

impl<W> LineSink<W>
where
    W: Write,
{
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl LineSink<io::Stderr> {
    /// A sink writing to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> DiagnosticSink for LineSink<W>
where
    W: Write,
{
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        let mut line = record.to_string().replace('\n', "\\n");
        line.push('\n');
        let mut writer = self.writer.lock()?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Drops every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _record: &DiagnosticRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes to `secondary` only when `primary` fails.
#[derive(Clone, Debug, Default)]
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> Fallback<P, S> {
    /// Pairs a primary sink with a backup.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> DiagnosticSink for Fallback<P, S>
where
    P: DiagnosticSink,
    S: DiagnosticSink,
{
    fn record(&self, record: &DiagnosticRecord) -> Result<(), SinkError> {
        self.primary
            .record(record)
            .or_else(|_| self.secondary.record(record))
    }
}
