//! Replacing unclassified errors with correlation tokens.
//!
//! [`ErrorMasker::mask`] is the only place a token is both generated and bound
//! to an original error. The record is written synchronously, before the
//! masked error is returned, so the diagnostic exists by the time the client
//! can quote the token. A sink that needs to stay off the request path can
//! queue internally (an async `slog` drain, for example); the masker does not
//! wait on anything beyond `DiagnosticSink::record` returning.

use crate::{
    classification::{classify, Classification},
    sink::{DiagnosticRecord, DiagnosticSink},
    status::{Classify, Code, RpcStatus},
    token::{Clock, CorrelationToken, IdSource, RandomIds, SystemClock, TokenGenerator},
};

/// The client-facing replacement for an unclassified error.
///
/// Its code is always [`Code::Internal`] and its only content is the token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{token}")]
pub struct MaskedError {
    token: CorrelationToken,
}

impl MaskedError {
    /// The code every masked error carries.
    pub const CODE: Code = Code::Internal;

    pub(crate) fn new(token: CorrelationToken) -> Self {
        Self { token }
    }

    /// Always [`Code::Internal`].
    pub fn code(&self) -> Code {
        Self::CODE
    }

    /// The token the operator can look up.
    pub fn token(&self) -> &CorrelationToken {
        &self.token
    }

    /// Consumes the error, returning its token.
    pub fn into_token(self) -> CorrelationToken {
        self.token
    }
}

impl Classify for MaskedError {
    fn code(&self) -> Code {
        Self::CODE
    }
}

/// Classifies errors and masks the unclassified ones.
///
/// Holds no per-call state. One masker can serve every call in the process.
#[derive(Clone, Debug)]
pub struct ErrorMasker<S, C = SystemClock, I = RandomIds> {
    tokens: TokenGenerator<C, I>,
    sink: S,
}

impl<S> ErrorMasker<S>
where
    S: DiagnosticSink,
{
    /// A masker recording into `sink`, with system time and random ids.
    pub fn new(sink: S) -> Self {
        Self {
            tokens: TokenGenerator::system(),
            sink,
        }
    }
}

impl<S, C, I> ErrorMasker<S, C, I> {
    /// Replaces the clock used for token timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> ErrorMasker<S, C2, I>
    where
        C2: Clock,
    {
        ErrorMasker {
            tokens: self.tokens.with_clock(clock),
            sink: self.sink,
        }
    }

    /// Replaces the source of token ids.
    #[must_use]
    pub fn with_id_source<I2>(self, ids: I2) -> ErrorMasker<S, C, I2>
    where
        I2: IdSource,
    {
        ErrorMasker {
            tokens: self.tokens.with_id_source(ids),
            sink: self.sink,
        }
    }

    /// The sink records are written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the masker, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S, C, I> ErrorMasker<S, C, I>
where
    S: DiagnosticSink,
    C: Clock,
    I: IdSource,
{
    /// Files `original` under a fresh token and returns the replacement.
    ///
    /// A failed sink write is dropped; the replacement is returned either way.
    pub fn mask<E>(&self, original: &E) -> MaskedError
    where
        E: RpcStatus,
    {
        let token = self.tokens.generate();
        let record = DiagnosticRecord::new(token.clone(), original.code(), original.message())
            .with_detail(original.diagnostic_detail());
        let _ = self.sink.record(&record);
        MaskedError::new(token)
    }

    /// Returns `error` unchanged when it is classified, otherwise its masked
    /// replacement.
    pub fn sanitize<E>(&self, error: E) -> E
    where
        E: RpcStatus,
    {
        match classify(Some(&error)) {
            Classification::Unclassified => E::from_masked(self.mask(&error)),
            Classification::Absent | Classification::Classified(_) => error,
        }
    }
}
