//! Deciding whether a call's error is safe to return as-is.
//!
//! Classification is pure: it reads the error's code and nothing else.

use crate::status::{CallOutcome, Classify, Code};

/// What a completed call's error says about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The call succeeded.
    Absent,
    /// The service signaled this status on purpose.
    Classified(Code),
    /// No recognized kind (`Unknown`, or an `Ok` code on an error value).
    Unclassified,
}

impl Classification {
    /// Whether the error may be returned to the client unchanged.
    pub fn is_passthrough(self) -> bool {
        !matches!(self, Classification::Unclassified)
    }
}

/// Classifies an optional error.
///
/// ```rust
/// use status_mask::{classify, Classification, Code, Status};
///
/// assert_eq!(classify::<Status>(None), Classification::Absent);
///
/// let missing = Status::not_found("user 123 missing");
/// assert_eq!(classify(Some(&missing)), Classification::Classified(Code::NotFound));
///
/// let bug = Status::unknown("nil pointer at line 42");
/// assert_eq!(classify(Some(&bug)), Classification::Unclassified);
/// ```
pub fn classify<E>(error: Option<&E>) -> Classification
where
    E: Classify + ?Sized,
{
    match error.map(|error| error.code()) {
        None => Classification::Absent,
        Some(code) if code.is_intentional() => Classification::Classified(code),
        Some(_) => Classification::Unclassified,
    }
}

/// Classifies the error side of a call outcome.
pub fn classify_outcome<T, E>(outcome: &CallOutcome<T, E>) -> Classification
where
    E: Classify,
{
    classify(outcome.as_ref().err())
}
