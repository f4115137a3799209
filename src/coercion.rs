//! # Coercion Module
//!
//! String-to-value conversion shared by positional dispatch, query binding and
//! body binding. A single function, [`coerce`], backs all three so that a value
//! accepted for dispatch is accepted for binding and vice versa.
//!
//! ## Rules
//!
//! | Target | Rule |
//! |---|---|
//! | `Text` | passed through unchanged |
//! | `Int`, `Long`, `Double`, `Float` | `str::parse` for the Rust type |
//! | `Bool` | `str::parse::<bool>`: only `true` / `false` |
//! | `Enum` | exact, case-sensitive variant name |
//! | `Other` | always [`DispatchError::UnsupportedParameterType`] |
//!
//! Types usable as verb-method arguments or scalar binding slots implement
//! [`Param`]. Enumerations get an implementation from [`param_enum!`](crate::param_enum).

use crate::error::DispatchError;
use std::fmt;

/// Declared type of a verb-method parameter or a scalar binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Text,
    Int,
    Long,
    Bool,
    Double,
    Float,
    Enum(EnumType),
    /// A type with no coercion rule; named for diagnostics
    Other(&'static str),
}

/// Name and variant list of an enumerated parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl ParamType {
    /// Human-readable name used in signatures and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Text => "String",
            ParamType::Int => "i32",
            ParamType::Long => "i64",
            ParamType::Bool => "bool",
            ParamType::Double => "f64",
            ParamType::Float => "f32",
            ParamType::Enum(e) => e.name,
            ParamType::Other(name) => *name,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successfully converted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Double(f64),
    Float(f32),
    /// Name of the matched enumerant
    Enum(&'static str),
}

/// Convert `value` to `target`.
///
/// # Errors
///
/// - [`DispatchError::TypeCoercion`] when the text is malformed for the target type
/// - [`DispatchError::UnsupportedParameterType`] when the target has no rule
pub fn coerce(value: &str, target: &ParamType) -> Result<Coerced, DispatchError> {
    fn failed(value: &str, target: &ParamType, reason: impl fmt::Display) -> DispatchError {
        DispatchError::TypeCoercion {
            value: value.to_string(),
            target: target.name().to_string(),
            reason: reason.to_string(),
        }
    }

    match target {
        ParamType::Text => Ok(Coerced::Text(value.to_string())),
        ParamType::Int => value
            .parse::<i32>()
            .map(Coerced::Int)
            .map_err(|e| failed(value, target, e)),
        ParamType::Long => value
            .parse::<i64>()
            .map(Coerced::Long)
            .map_err(|e| failed(value, target, e)),
        ParamType::Bool => value
            .parse::<bool>()
            .map(Coerced::Bool)
            .map_err(|e| failed(value, target, e)),
        ParamType::Double => value
            .parse::<f64>()
            .map(Coerced::Double)
            .map_err(|e| failed(value, target, e)),
        ParamType::Float => value
            .parse::<f32>()
            .map(Coerced::Float)
            .map_err(|e| failed(value, target, e)),
        ParamType::Enum(e) => e
            .variants
            .iter()
            .find(|v| **v == value)
            .map(|v| Coerced::Enum(*v))
            .ok_or_else(|| failed(value, target, format!("no enumerant named '{}'", value))),
        ParamType::Other(name) => Err(DispatchError::UnsupportedParameterType {
            target: (*name).to_string(),
        }),
    }
}

/// A Rust type that can be produced from a path segment or attribute value.
pub trait Param: Sized + Send + 'static {
    /// Declared type used for coercion.
    fn param_type() -> ParamType;

    /// Extract the Rust value from a coerced value of [`Param::param_type`].
    ///
    /// Returns `None` only when handed a value of a different type, which is a
    /// plumbing mismatch rather than a client error.
    fn from_coerced(value: Coerced) -> Option<Self>;
}

macro_rules! scalar_param {
    ($ty:ty, $variant:ident) => {
        impl Param for $ty {
            fn param_type() -> ParamType {
                ParamType::$variant
            }

            fn from_coerced(value: Coerced) -> Option<Self> {
                match value {
                    Coerced::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

scalar_param!(String, Text);
scalar_param!(i32, Int);
scalar_param!(i64, Long);
scalar_param!(bool, Bool);
scalar_param!(f64, Double);
scalar_param!(f32, Float);

/// Declare a fieldless enum usable as a [`Param`].
///
/// Enumerants are matched by their exact identifier.
///
/// ```rust
/// use cakerouter::param_enum;
/// use cakerouter::coercion::{coerce, Param};
///
/// param_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Status { Pending, Approved }
/// }
///
/// let value = coerce("Approved", &Status::param_type()).unwrap();
/// assert_eq!(Status::from_coerced(value), Some(Status::Approved));
/// assert!(coerce("approved", &Status::param_type()).is_err());
/// ```
#[macro_export]
macro_rules! param_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        $vis enum $name { $($variant),+ }

        impl $crate::coercion::Param for $name {
            fn param_type() -> $crate::coercion::ParamType {
                $crate::coercion::ParamType::Enum($crate::coercion::EnumType {
                    name: stringify!($name),
                    variants: &[$(stringify!($variant)),+],
                })
            }

            fn from_coerced(value: $crate::coercion::Coerced) -> ::core::option::Option<Self> {
                match value {
                    $(
                        $crate::coercion::Coerced::Enum(stringify!($variant)) => {
                            ::core::option::Option::Some($name::$variant)
                        }
                    )+
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let name = match self {
                    $($name::$variant => stringify!($variant)),+
                };
                f.write_str(name)
            }
        }
    };
}
