//! Correlation tokens binding a masked error to its diagnostic record.
//!
//! A token is `<timestamp>-<id>`: the capture time as RFC 3339 UTC with
//! nanosecond precision, then a hyphenated lowercase UUID. Uniqueness comes
//! from the UUID, not from the clock.
//!
//! The clock and the id source are injected so tests can pin both halves.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Length of a hyphenated UUID.
const ID_LEN: usize = 36;

/// Source of the capture timestamp.
pub trait Clock {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via `chrono::Utc::now`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Source of the unique half of a token.
pub trait IdSource {
    /// A fresh identifier.
    fn next_id(&self) -> Uuid;
}

/// Random version 4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

impl<F> IdSource for F
where
    F: Fn() -> Uuid,
{
    fn next_id(&self) -> Uuid {
        self()
    }
}

/// Errors from [`CorrelationToken::parse`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The input is not `<timestamp>-<uuid>`.
    #[error("correlation token must be `<timestamp>-<uuid>`")]
    Malformed,
    /// The timestamp half is not RFC 3339.
    #[error("invalid correlation token timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    /// The id half is not a UUID.
    #[error("invalid correlation token id: {0}")]
    Id(#[from] uuid::Error),
}

/// Opaque string handed to the client in place of an unclassified error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationToken {
    captured_at: DateTime<Utc>,
    id: Uuid,
    rendered: String,
}

impl CorrelationToken {
    /// Builds a token from its two halves.
    pub fn new(captured_at: DateTime<Utc>, id: Uuid) -> Self {
        let rendered = format!(
            "{}-{}",
            captured_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            id.hyphenated()
        );
        Self {
            captured_at,
            id,
            rendered,
        }
    }

    /// Recovers a token from the string a client received.
    pub fn parse(input: &str) -> Result<Self, TokenError> {
        let input = input.trim();
        let split = input
            .len()
            .checked_sub(ID_LEN + 1)
            .filter(|split| *split > 0 && input.is_char_boundary(*split))
            .ok_or(TokenError::Malformed)?;
        let (timestamp, rest) = input.split_at(split);
        let id = rest.strip_prefix('-').ok_or(TokenError::Malformed)?;

        let captured_at = DateTime::parse_from_rfc3339(timestamp)?.with_timezone(&Utc);
        let id = Uuid::parse_str(id)?;
        Ok(Self::new(captured_at, id))
    }

    /// The token as sent to the client.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// When the masked error was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// The unique half of the token.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for CorrelationToken {
    fn as_ref(&self) -> &str {
        &self.rendered
    }
}

#[cfg(feature = "slog")]
impl serde::Serialize for CorrelationToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.rendered)
    }
}

/// Produces correlation tokens from a clock and an id source.
///
/// Generation holds no mutable state; a shared generator can be used from
/// any number of calls at once.
#[derive(Clone, Debug, Default)]
pub struct TokenGenerator<C = SystemClock, I = RandomIds> {
    clock: C,
    ids: I,
}

impl TokenGenerator {
    /// A generator using the system clock and random v4 UUIDs.
    pub fn system() -> Self {
        Self::default()
    }
}

impl<C, I> TokenGenerator<C, I> {
    /// A generator using the given clock and id source.
    pub fn new(clock: C, ids: I) -> Self {
        Self { clock, ids }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> TokenGenerator<C2, I> {
        TokenGenerator {
            clock,
            ids: self.ids,
        }
    }

    /// Replaces the id source.
    #[must_use]
    pub fn with_id_source<I2>(self, ids: I2) -> TokenGenerator<C, I2> {
        TokenGenerator {
            clock: self.clock,
            ids,
        }
    }
}

impl<C, I> TokenGenerator<C, I>
where
    C: Clock,
    I: IdSource,
{
    /// Reads the clock, draws an id, and joins them.
    pub fn generate(&self) -> CorrelationToken {
        CorrelationToken::new(self.clock.now(), self.ids.next_id())
    }
}
