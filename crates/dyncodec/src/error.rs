//! Codec error taxonomy.

use std::fmt;

use dyncodec_path::Segment;
use thiserror::Error;

/// Failure of a single encode or decode attempt.
///
/// Nested failures render innermost first, each enclosing coercion appended
/// after it, joined by `"; "`:
///
/// ```
/// use dyncodec::CodecError;
/// use dyncodec_path::Segment;
///
/// let err = CodecError::mismatch("Not a number: \"x\"")
///     .nested(Segment::key("value"))
///     .nested(Segment::key("inner"));
/// assert_eq!(
///     err.to_string(),
///     "Not a number: \"x\"; Failed to decode field \"value\"; Failed to decode field \"inner\""
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// The document has the wrong shape for the attempted coercion.
    #[error("{0}")]
    StructuralMismatch(String),
    /// A non-defaultable key is absent.
    #[error("No key \"{key}\" in map")]
    MissingRequiredField { key: String },
    /// A failure below `at`, wrapped by the enclosing coercion.
    #[error("{inner}; {}", Coercion(.at))]
    Nested { at: Segment, inner: Box<CodecError> },
    /// Independent failures of sibling fields or elements.
    #[error("{}", join_messages(.0))]
    Multiple(Vec<CodecError>),
    /// A recursive field was used before its codec was bound.
    #[error("Recursive codec for \"{key}\" is not bound")]
    UnboundRecursion { key: String },
}

impl CodecError {
    pub fn mismatch(message: impl Into<String>) -> Self {
        CodecError::StructuralMismatch(message.into())
    }

    /// Wrap this error as the cause of a failure at `at`.
    pub fn nested(self, at: Segment) -> Self {
        CodecError::Nested {
            at,
            inner: Box::new(self),
        }
    }

    /// Fold collected sibling failures into one result.
    ///
    /// No failures is success; a single failure is returned as is.
    pub fn collect(mut failures: Vec<CodecError>) -> Result<(), CodecError> {
        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(CodecError::Multiple(failures)),
        }
    }

    /// The innermost causes, in document order.
    pub fn causes(&self) -> Vec<&CodecError> {
        match self {
            CodecError::Nested { inner, .. } => inner.causes(),
            CodecError::Multiple(all) => all.iter().flat_map(|e| e.causes()).collect(),
            other => vec![other],
        }
    }
}

struct Coercion<'a>(&'a Segment);

impl fmt::Display for Coercion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Segment::Key(k) => write!(f, "Failed to decode field \"{k}\""),
            Segment::Index(i) => write!(f, "Failed to decode element [{i}]"),
        }
    }
}

fn join_messages(errors: &[CodecError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
