//! # Error Module
//!
//! Typed failures produced while resolving and dispatching a resource chain.
//!
//! Every failure the core can raise is a [`DispatchError`] variant. The core never
//! recovers from any of them itself; the only silent paths are best-effort
//! attribute binding and parent injection, which do not produce errors at all.
//!
//! | Variant | Raised by | Surfaces as |
//! |---|---|---|
//! | `InvalidPath` | path tokenizer | bad request |
//! | `ResourceNotFound` | chain resolver | not found |
//! | `NoMatchingMethod` | method selector | not found / bad request |
//! | `TypeCoercion` / `UnsupportedParameterType` | coercion | bad request |
//! | `BodyParse` | body content parser | bad request |
//! | `Business` | handler method body | per [`BusinessErrorKind`] |
//! | `Framework` | construction / invocation plumbing | internal |
//!
//! Mapping an [`ErrorClass`] onto a wire status code is left to the transport layer.

use std::fmt;

/// Coarse classification of a failure, describing how it should surface to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The addressed resource or method does not exist
    NotFound,
    /// The client sent input that cannot be used
    BadRequest,
    /// A business rule rejected the request
    Conflict,
    /// Server-side failure unrelated to client input
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::NotFound => "not_found",
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::Conflict => "conflict",
            ErrorClass::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Category of a failure raised by business code inside a handler method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessErrorKind {
    /// Input was understood but is not acceptable (missing body field, etc.)
    BadRequest,
    /// A business entity does not exist
    NotFound,
    /// A business rule was violated
    Conflict,
    /// A required precondition (typically an injected parent) is missing
    PreconditionFailed,
}

/// Domain failure returned by a handler method.
///
/// The core never reinterprets these: they travel back to the caller exactly as
/// the handler produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessError {
    pub kind: BusinessErrorKind,
    pub message: String,
}

impl BusinessError {
    pub fn new(kind: BusinessErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::Conflict, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(BusinessErrorKind::PreconditionFailed, message)
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BusinessError {}

/// Why no verb-method could be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMismatch {
    /// No method with this verb and arity is declared at all
    MissingArity,
    /// Methods of this arity exist but the arguments did not convert for any of them
    ArgumentMismatch {
        /// Coercion failure reported by the last candidate tried
        last_error: String,
    },
}

/// Plumbing stage at which a framework-level failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkErrorKind {
    /// A handler instance could not be constructed
    Construction,
    /// A selected method could not be invoked (argument plumbing or a panic)
    MethodInvocation,
}

/// Failure raised while resolving or dispatching a request.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The path produced no tokens after the context prefix was removed
    InvalidPath { path: String },
    /// No handler type resolved anywhere along the path
    ResourceNotFound { path: String },
    /// A handler exists but no verb-method matches the positional arguments
    NoMatchingMethod {
        resource: String,
        verb: String,
        arity: usize,
        reason: MethodMismatch,
    },
    /// A value could not be converted to the declared target type
    TypeCoercion {
        value: String,
        target: String,
        reason: String,
    },
    /// The declared target type has no coercion rule
    UnsupportedParameterType { target: String },
    /// The body payload is malformed
    BodyParse { target: String, reason: String },
    /// Domain failure raised by a handler method, propagated unchanged
    Business(BusinessError),
    /// Construction or invocation plumbing failure, carrying the original cause
    Framework {
        kind: FrameworkErrorKind,
        resource: String,
        cause: String,
    },
}

impl DispatchError {
    /// How this failure should surface to a client.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            DispatchError::InvalidPath { .. } => ErrorClass::BadRequest,
            DispatchError::ResourceNotFound { .. } => ErrorClass::NotFound,
            DispatchError::NoMatchingMethod { reason, .. } => match reason {
                MethodMismatch::MissingArity => ErrorClass::NotFound,
                MethodMismatch::ArgumentMismatch { .. } => ErrorClass::BadRequest,
            },
            DispatchError::TypeCoercion { .. }
            | DispatchError::UnsupportedParameterType { .. }
            | DispatchError::BodyParse { .. } => ErrorClass::BadRequest,
            DispatchError::Business(err) => match err.kind {
                BusinessErrorKind::BadRequest => ErrorClass::BadRequest,
                BusinessErrorKind::NotFound => ErrorClass::NotFound,
                BusinessErrorKind::Conflict | BusinessErrorKind::PreconditionFailed => {
                    ErrorClass::Conflict
                }
            },
            DispatchError::Framework { .. } => ErrorClass::Internal,
        }
    }

    /// Returns the business failure if this error originated in a handler body.
    #[must_use]
    pub fn as_business(&self) -> Option<&BusinessError> {
        match self {
            DispatchError::Business(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidPath { path } => {
                write!(f, "No resource tokens found in request path '{}'", path)
            }
            DispatchError::ResourceNotFound { path } => {
                write!(f, "No resource resolves along path '{}'", path)
            }
            DispatchError::NoMatchingMethod {
                resource,
                verb,
                arity,
                reason,
            } => match reason {
                MethodMismatch::MissingArity => write!(
                    f,
                    "No suitable {}(...) on {} with {} positional parameters",
                    verb.to_lowercase(),
                    resource,
                    arity
                ),
                MethodMismatch::ArgumentMismatch { last_error } => write!(
                    f,
                    "No {}(...) on {} accepts the {} positional parameters given: {}",
                    verb.to_lowercase(),
                    resource,
                    arity,
                    last_error
                ),
            },
            DispatchError::TypeCoercion {
                value,
                target,
                reason,
            } => write!(
                f,
                "Failed to convert value '{}' to type {}: {}",
                value, target, reason
            ),
            DispatchError::UnsupportedParameterType { target } => {
                write!(f, "Unsupported parameter type: {}", target)
            }
            DispatchError::BodyParse { target, reason } => write!(
                f,
                "Failed to map body content into instance of {}: {}",
                target, reason
            ),
            DispatchError::Business(err) => write!(f, "{}", err),
            DispatchError::Framework {
                kind,
                resource,
                cause,
            } => {
                let stage = match kind {
                    FrameworkErrorKind::Construction => "construct",
                    FrameworkErrorKind::MethodInvocation => "invoke method on",
                };
                write!(f, "Framework error: failed to {} {}: {}", stage, resource, cause)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Business(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BusinessError> for DispatchError {
    fn from(err: BusinessError) -> Self {
        DispatchError::Business(err)
    }
}
