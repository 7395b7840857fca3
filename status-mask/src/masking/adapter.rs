//! Wrapping call handlers so unclassified errors never leave the server.
//!
//! Both call shapes share one decision: run the handler once, then pass the
//! error through [`ErrorMasker::sanitize`]. The adapters add no timeout, retry
//! or cancellation of their own.

use std::future::Future;

use super::masker::ErrorMasker;
use crate::{
    sink::DiagnosticSink,
    status::{CallOutcome, RpcStatus},
    token::{Clock, IdSource},
};

impl<S, C, I> ErrorMasker<S, C, I>
where
    S: DiagnosticSink,
    C: Clock,
    I: IdSource,
{
    /// Runs a single-response handler and sanitizes its error.
    ///
    /// A successful result is returned untouched. The handler is awaited
    /// inline; the adapter never spawns.
    ///
    /// A handler yields either a value or an error, never both, so a failed
    /// call has no partial result to forward alongside the sanitized error.
    pub async fn unary<Req, T, E, F, Fut>(&self, request: Req, handler: F) -> CallOutcome<T, E>
    where
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = CallOutcome<T, E>>,
        E: RpcStatus,
    {
        let outcome = handler(request).await;
        outcome.map_err(|error| self.sanitize(error))
    }

    /// Runs a streaming handler to completion and sanitizes its terminal error.
    pub async fn streaming<Req, St, E, F, Fut>(
        &self,
        request: Req,
        stream: St,
        handler: F,
    ) -> Result<(), E>
    where
        F: FnOnce(Req, St) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: RpcStatus,
    {
        let terminal = handler(request, stream).await;
        terminal.map_err(|error| self.sanitize(error))
    }

    /// Blocking counterpart of [`ErrorMasker::unary`].
    ///
    /// ```rust
    /// use status_mask::{Code, ErrorMasker, MemorySink, Status};
    ///
    /// let masker = ErrorMasker::new(MemorySink::new());
    /// let outcome: Result<String, Status> = masker.unary_blocking("user-7", |id| {
    ///     Err(Status::unknown(format!("{id}: row decode failed")))
    /// });
    ///
    /// let err = outcome.unwrap_err();
    /// assert_eq!(err.code(), Code::Internal);
    /// assert!(masker.sink().lookup(err.message()).is_some());
    /// ```
    pub fn unary_blocking<Req, T, E, F>(&self, request: Req, handler: F) -> CallOutcome<T, E>
    where
        F: FnOnce(Req) -> CallOutcome<T, E>,
        E: RpcStatus,
    {
        handler(request).map_err(|error| self.sanitize(error))
    }

    /// Blocking counterpart of [`ErrorMasker::streaming`].
    pub fn streaming_blocking<Req, St, E, F>(
        &self,
        request: Req,
        stream: St,
        handler: F,
    ) -> Result<(), E>
    where
        F: FnOnce(Req, St) -> Result<(), E>,
        E: RpcStatus,
    {
        handler(request, stream).map_err(|error| self.sanitize(error))
    }
}
