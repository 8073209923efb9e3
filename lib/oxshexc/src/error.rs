//! Error types for ShExC serialization.

use std::sync::Arc;
use std::{fmt, io};

/// Main error type for ShExC serialization.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShExCError {
    /// Error reported through the error handler.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Error from the underlying writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<ShExCError> for io::Error {
    #[inline]
    fn from(error: ShExCError) -> Self {
        match error {
            ShExCError::Io(error) => error,
            ShExCError::Schema(error @ SchemaError::WriteAfterClose) => {
                Self::new(io::ErrorKind::BrokenPipe, error)
            }
            ShExCError::Schema(error) => Self::new(io::ErrorKind::InvalidInput, error),
        }
    }
}

/// Error raised when the schema tree does not have the shape needed to select a printing rule,
/// or when the serializer is used after being finished.
///
/// These errors are reported through the error handler configured with
/// [`ShExCSerializer::with_error_handler`](crate::ShExCSerializer::with_error_handler).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A node lacks an expected discriminant or property.
    #[error("Structural mismatch: {message}")]
    StructuralMismatch {
        /// Description of the mismatch.
        message: String,
    },

    /// A literal is used where only an IRI or a blank node is allowed.
    #[error("A literal is not allowed as subject or predicate: {term}")]
    InvalidSubjectOrPredicate {
        /// The offending term.
        term: String,
    },

    /// A node constraint sets both a datatype and a value set.
    #[error("Found both datatype and values in node constraint: {message}")]
    ConflictingConstraint {
        /// The conflicting datatype and values.
        message: String,
    },

    /// Unexpected node kind.
    #[error("Unexpected nodeKind: {kind}")]
    UnknownNodeKind {
        /// The node kind found.
        kind: String,
    },

    /// Unexpected shape or triple expression type.
    #[error("Unexpected expression type: {tag}")]
    UnknownExprTag {
        /// The type found.
        tag: String,
    },

    /// The serializer has already been finished.
    #[error("Cannot write because the serializer has been finished")]
    WriteAfterClose,
}

impl SchemaError {
    /// Creates a structural mismatch error.
    pub fn structural_mismatch(message: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            message: message.into(),
        }
    }

    /// Creates an invalid subject or predicate error.
    pub fn invalid_subject_or_predicate(term: impl Into<String>) -> Self {
        Self::InvalidSubjectOrPredicate { term: term.into() }
    }

    /// Creates a conflicting constraint error.
    pub fn conflicting_constraint(message: impl Into<String>) -> Self {
        Self::ConflictingConstraint {
            message: message.into(),
        }
    }

    /// Creates an unknown node kind error.
    pub fn unknown_node_kind(kind: impl Into<String>) -> Self {
        Self::UnknownNodeKind { kind: kind.into() }
    }

    /// Creates an unknown expression type error.
    pub fn unknown_expr_tag(tag: impl Into<String>) -> Self {
        Self::UnknownExprTag { tag: tag.into() }
    }
}

type HandlerFn = dyn Fn(SchemaError) -> Result<(), SchemaError> + Send + Sync;

/// Channel every [`SchemaError`] goes through.
///
/// Without a user handler errors are returned as-is and abort the current operation.
#[derive(Clone, Default)]
pub(crate) struct ErrorHandler(Option<Arc<HandlerFn>>);

impl ErrorHandler {
    pub fn new(
        handler: impl Fn(SchemaError) -> Result<(), SchemaError> + Send + Sync + 'static,
    ) -> Self {
        Self(Some(Arc::new(handler)))
    }

    /// Reports an error the serializer is able to recover from.
    ///
    /// Returns `Ok(())` if the handler chose to go on.
    pub fn recoverable(&self, error: SchemaError) -> Result<(), SchemaError> {
        tracing::debug!(%error, "reporting ShExC schema error");
        match &self.0 {
            Some(handler) => handler(error),
            None => Err(error),
        }
    }

    /// Reports an error the serializer can not recover from and returns the error to propagate.
    pub fn fatal(&self, error: SchemaError) -> SchemaError {
        match self.recoverable(error.clone()) {
            Ok(()) => error,
            Err(error) => error,
        }
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorHandler")
            .field(&if self.0.is_some() { "custom" } else { "default" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handler_aborts() {
        let handler = ErrorHandler::default();
        let error = SchemaError::unknown_node_kind("foo");
        assert_eq!(handler.recoverable(error.clone()), Err(error));
    }

    #[test]
    fn test_fatal_ignores_recovery() {
        let handler = ErrorHandler::new(|_| Ok(()));
        let error = SchemaError::unknown_expr_tag("Foo");
        assert_eq!(handler.fatal(error.clone()), error);
        assert_eq!(
            handler.recoverable(SchemaError::unknown_node_kind("foo")),
            Ok(())
        );
    }

    #[test]
    fn test_io_conversion() {
        let error = io::Error::from(ShExCError::from(SchemaError::WriteAfterClose));
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        let error = io::Error::from(ShExCError::from(SchemaError::unknown_expr_tag("Foo")));
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
