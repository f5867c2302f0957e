//! Errors raised by the mutation algorithms.
//!
//! [§ 2.6 Exceptions](https://webidl.spec.whatwg.org/#idl-DOMException-error-names)
//!
//! Only the three exception names the tree algorithms can throw are modelled.
//! All of them signal caller misuse and are never retryable.

use thiserror::Error;

/// Result type for DOM mutation operations.
pub type DomResult<T> = Result<T, DomError>;

/// DOM mutation errors.
///
/// Each variant carries a short description of the violated rule. A failing
/// operation has performed no mutation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// "The operation would yield an incorrect node tree."
    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(&'static str),

    /// "The object can not be found here."
    #[error("NotFoundError: {0}")]
    NotFound(&'static str),

    /// "The operation is not supported."
    #[error("NotSupportedError: {0}")]
    NotSupported(&'static str),
}

impl DomError {
    /// The `DOMException` name for this error.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HierarchyRequest(_) => "HierarchyRequestError",
            Self::NotFound(_) => "NotFoundError",
            Self::NotSupported(_) => "NotSupportedError",
        }
    }

    /// The rule that was violated.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::HierarchyRequest(reason)
            | Self::NotFound(reason)
            | Self::NotSupported(reason) => reason,
        }
    }
}
