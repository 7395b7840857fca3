//! RPC status kinds and the error values that carry them.
//!
//! [`Code`] is the closed set of standard RPC status codes. Errors report
//! their code through [`Classify`]; values that can also travel back to a
//! client implement [`RpcStatus`].

use std::{error::Error as StdError, fmt, sync::Arc};

use crate::masking::MaskedError;

/// The outcome of a single-response call: a result value or an error.
pub type CallOutcome<T, E> = Result<T, E>;

/// Standard RPC status codes.
///
/// Numeric values match the gRPC wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "slog",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Code {
    /// Not an error.
    Ok = 0,
    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,
    /// Unknown error. Errors without an explicit kind report this.
    Unknown = 2,
    /// The client specified an invalid argument.
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,
    /// A requested entity was not found.
    NotFound = 5,
    /// The entity a client attempted to create already exists.
    AlreadyExists = 6,
    /// The caller does not have permission to execute the operation.
    PermissionDenied = 7,
    /// Some resource has been exhausted.
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation.
    FailedPrecondition = 9,
    /// The operation was aborted.
    Aborted = 10,
    /// The operation was attempted past the valid range.
    OutOfRange = 11,
    /// The operation is not implemented or supported.
    Unimplemented = 12,
    /// Internal error.
    Internal = 13,
    /// The service is currently unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// The request lacks valid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    /// Every code, in wire order.
    pub const ALL: [Code; 17] = [
        Code::Ok,
        Code::Cancelled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    /// Converts a wire value. Values outside `0..=16` become [`Code::Unknown`].
    pub fn from_i32(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(Code::Unknown)
    }

    /// Returns the wire value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Canonical upper-snake-case name, e.g. `NOT_FOUND`.
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Human-readable description of the code.
    pub fn description(self) -> &'static str {
        match self {
            Code::Ok => "The operation completed successfully",
            Code::Cancelled => "The operation was cancelled",
            Code::Unknown => "Unknown error",
            Code::InvalidArgument => "Client specified an invalid argument",
            Code::DeadlineExceeded => "Deadline expired before operation could complete",
            Code::NotFound => "Some requested entity was not found",
            Code::AlreadyExists => "Some entity that we attempted to create already exists",
            Code::PermissionDenied => {
                "The caller does not have permission to execute the specified operation"
            }
            Code::ResourceExhausted => "Some resource has been exhausted",
            Code::FailedPrecondition => {
                "The system is not in a state required for the operation's execution"
            }
            Code::Aborted => "The operation was aborted",
            Code::OutOfRange => "Operation was attempted past the valid range",
            Code::Unimplemented => "Operation is not implemented or not supported",
            Code::Internal => "Internal error",
            Code::Unavailable => "The service is currently unavailable",
            Code::DataLoss => "Unrecoverable data loss or corruption",
            Code::Unauthenticated => "The request does not have valid authentication credentials",
        }
    }

    /// Whether an error carrying this code was signaled on purpose.
    ///
    /// `Ok` and `Unknown` are not intentional failure kinds.
    pub fn is_intentional(self) -> bool {
        !matches!(self, Code::Ok | Code::Unknown)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.as_i32()
    }
}

/// An error that can report its RPC status kind.
///
/// Derive it with `#[derive(Classify)]` (feature `derive`) to attach codes to
/// domain error enums.
pub trait Classify {
    /// The status kind this error carries.
    fn code(&self) -> Code;
}

impl<T> Classify for &T
where
    T: Classify + ?Sized,
{
    fn code(&self) -> Code {
        (**self).code()
    }
}

impl<T> Classify for Box<T>
where
    T: Classify + ?Sized,
{
    fn code(&self) -> Code {
        (**self).code()
    }
}

impl<T> Classify for Arc<T>
where
    T: Classify + ?Sized,
{
    fn code(&self) -> Code {
        (**self).code()
    }
}

/// An error value that crosses the RPC boundary.
///
/// The adapters are generic over this trait: classified errors are handed back
/// as the same value, and unclassified ones are rebuilt with
/// [`RpcStatus::from_masked`].
pub trait RpcStatus: Classify + Sized {
    /// The message sent to the client.
    fn message(&self) -> &str;

    /// Builds the client-facing replacement for a masked error.
    fn from_masked(masked: MaskedError) -> Self;

    /// Anything beyond the message worth keeping in the diagnostic record,
    /// such as a cause chain or attached details. Never sent to the client.
    fn diagnostic_detail(&self) -> Option<String> {
        None
    }
}

/// A status error: a code plus a message.
///
/// An optional diagnostic detail travels with it to the masker. Only the
/// code and message are part of what a client sees.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
    detail: Option<String>,
}

macro_rules! status_constructors {
    ($($(#[$doc:meta])* $name:ident => $code:ident),* $(,)?) => {
        impl Status {
            $(
                $(#[$doc])*
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(Code::$code, message)
                }
            )*
        }
    };
}

status_constructors! {
    /// A `CANCELLED` status.
    cancelled => Cancelled,
    /// An `UNKNOWN` status. These are masked by the adapters.
    unknown => Unknown,
    /// An `INVALID_ARGUMENT` status.
    invalid_argument => InvalidArgument,
    /// A `DEADLINE_EXCEEDED` status.
    deadline_exceeded => DeadlineExceeded,
    /// A `NOT_FOUND` status.
    not_found => NotFound,
    /// An `ALREADY_EXISTS` status.
    already_exists => AlreadyExists,
    /// A `PERMISSION_DENIED` status.
    permission_denied => PermissionDenied,
    /// A `RESOURCE_EXHAUSTED` status.
    resource_exhausted => ResourceExhausted,
    /// A `FAILED_PRECONDITION` status.
    failed_precondition => FailedPrecondition,
    /// An `ABORTED` status.
    aborted => Aborted,
    /// An `OUT_OF_RANGE` status.
    out_of_range => OutOfRange,
    /// An `UNIMPLEMENTED` status.
    unimplemented => Unimplemented,
    /// An `INTERNAL` status.
    internal => Internal,
    /// An `UNAVAILABLE` status.
    unavailable => Unavailable,
    /// A `DATA_LOSS` status.
    data_loss => DataLoss,
    /// An `UNAUTHENTICATED` status.
    unauthenticated => Unauthenticated,
}

impl Status {
    /// Creates a status with the given code and message.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Builds a status from a domain error, using its code and `Display` output.
    ///
    /// When the code is not intentional the error's `source()` chain is kept
    /// as the diagnostic detail, so the masker records the causes too.
    pub fn from_classified<E>(error: &E) -> Self
    where
        E: Classify + StdError + ?Sized,
    {
        let code = error.code();
        let status = Self::new(code, error.to_string());
        if code.is_intentional() {
            status
        } else {
            status.with_detail(source_chain(error))
        }
    }

    /// Attaches a diagnostic detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<Option<String>>) -> Self {
        self.detail = detail.into();
        self
    }

    /// The status code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The status message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The diagnostic detail, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Renders `error`'s causes as `caused by: <first>: <second>...`.
fn source_chain<E>(error: &E) -> Option<String>
where
    E: StdError + ?Sized,
{
    let mut causes = Vec::new();
    let mut next = error.source();
    while let Some(cause) = next {
        causes.push(cause.to_string());
        next = cause.source();
    }
    if causes.is_empty() {
        None
    } else {
        Some(format!("caused by: {}", causes.join(": ")))
    }
}

impl Classify for Status {
    fn code(&self) -> Code {
        self.code
    }
}

impl RpcStatus for Status {
    fn message(&self) -> &str {
        &self.message
    }

    fn from_masked(masked: MaskedError) -> Self {
        Self::new(masked.code(), masked.token().as_str())
    }

    fn diagnostic_detail(&self) -> Option<String> {
        self.detail.clone()
    }
}

impl From<MaskedError> for Status {
    fn from(masked: MaskedError) -> Self {
        <Self as RpcStatus>::from_masked(masked)
    }
}

#[cfg(test)]
mod tests {
    use super::{Classify, Code, Status};

    #[test]
    fn wire_values_round_trip_through_from_i32() {
        for code in Code::ALL {
            assert_eq!(Code::from_i32(code.as_i32()), code);
        }
        assert_eq!(Code::NotFound.as_i32(), 5);
        assert_eq!(Code::Unauthenticated.as_i32(), 16);
    }

    #[test]
    fn out_of_range_wire_values_are_unknown() {
        assert_eq!(Code::from_i32(-1), Code::Unknown);
        assert_eq!(Code::from_i32(17), Code::Unknown);
        assert_eq!(Code::from(i32::MAX), Code::Unknown);
    }

    #[test]
    fn only_ok_and_unknown_are_not_intentional() {
        let unintentional: Vec<Code> = Code::ALL
            .into_iter()
            .filter(|code| !code.is_intentional())
            .collect();
        assert_eq!(unintentional, vec![Code::Ok, Code::Unknown]);
    }

    #[test]
    fn display_uses_canonical_names() {
        assert_eq!(Code::DeadlineExceeded.to_string(), "DEADLINE_EXCEEDED");
        assert_eq!(
            Status::not_found("user 123 missing").to_string(),
            "NOT_FOUND: user 123 missing"
        );
    }

    #[test]
    fn constructors_set_code_and_message() {
        let status = Status::permission_denied("no access");
        assert_eq!(status.code(), Code::PermissionDenied);
        assert_eq!(status.message(), "no access");
        assert_eq!(Status::data_loss("x").code(), Code::DataLoss);
    }

    #[test]
    fn classify_forwards_through_smart_pointers() {
        let status = Status::aborted("retry later");
        let boxed: Box<dyn Classify> = Box::new(status.clone());
        assert_eq!(boxed.code(), Code::Aborted);
        assert_eq!((&status).code(), Code::Aborted);
        assert_eq!(std::sync::Arc::new(status).code(), Code::Aborted);
    }

    #[test]
    fn from_classified_uses_display_output() {
        #[derive(Debug)]
        struct Gone;
        impl Classify for Gone {
            fn code(&self) -> Code {
                Code::NotFound
            }
        }
        impl std::fmt::Display for Gone {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("record is gone")
            }
        }

        impl std::error::Error for Gone {}

        let status = Status::from_classified(&Gone);
        assert_eq!(status, Status::not_found("record is gone"));
        assert_eq!(status.detail(), None);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("query failed")]
    struct QueryError(#[source] std::io::Error);

    impl Classify for QueryError {
        fn code(&self) -> Code {
            Code::Unknown
        }
    }

    #[test]
    fn from_classified_keeps_source_chain_for_unknown() {
        let err = QueryError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "connection refused to 10.0.0.5:5432",
        ));

        let status = Status::from_classified(&err);

        assert_eq!(status.code(), Code::Unknown);
        assert_eq!(status.message(), "query failed");
        assert_eq!(
            status.detail(),
            Some("caused by: connection refused to 10.0.0.5:5432")
        );
        assert_eq!(status.to_string(), "UNKNOWN: query failed");
    }

    #[test]
    fn with_detail_is_not_part_of_display() {
        let status = Status::unknown("boom").with_detail("trace id 7".to_string());
        assert_eq!(status.detail(), Some("trace id 7"));
        assert_eq!(status.to_string(), "UNKNOWN: boom");
    }
}
