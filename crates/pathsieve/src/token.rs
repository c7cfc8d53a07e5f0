//! The token vocabulary shared by producers, filters and sinks.
//!
//! A document is delivered as a sequence of structural tokens: container
//! starts and ends, field names, and scalars. Anything that accepts that
//! sequence implements [`TokenWriter`].

use std::fmt;

use serde_json::Value;

use crate::error::Result;

/// The two kinds of container a document can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// A set of named fields.
    Object,
    /// An ordered list of elements.
    Array,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("object"),
            Self::Array => f.write_str("array"),
        }
    }
}

/// A leaf value.
///
/// All scalar flavours share one inclusion test in the filters, so they are
/// modelled as one type and told apart by [`Scalar::kind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// An arbitrary-precision number, already encoded as JSON number text.
    ///
    /// [`JsonWriter`](crate::JsonWriter) writes any valid number verbatim;
    /// [`ValueBuilder`](crate::ValueBuilder) only accepts numbers that fit a
    /// `serde_json::Number` (`i64`, `u64` or finite `f64`).
    Decimal(&'a str),
    /// A string.
    String(&'a str),
    /// Binary data.
    Binary(&'a [u8]),
    /// An opaque embedded value, written as a whole by the sink.
    Embedded(&'a Value),
}

/// Kind tag of a [`Scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// See [`Scalar::Null`].
    Null,
    /// See [`Scalar::Bool`].
    Bool,
    /// See [`Scalar::Int`].
    Int,
    /// See [`Scalar::UInt`].
    UInt,
    /// See [`Scalar::Float`].
    Float,
    /// See [`Scalar::Decimal`].
    Decimal,
    /// See [`Scalar::String`].
    String,
    /// See [`Scalar::Binary`].
    Binary,
    /// See [`Scalar::Embedded`].
    Embedded,
}

impl Scalar<'_> {
    /// The kind tag of this scalar.
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Null => ScalarKind::Null,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Int,
            Self::UInt(_) => ScalarKind::UInt,
            Self::Float(_) => ScalarKind::Float,
            Self::Decimal(_) => ScalarKind::Decimal,
            Self::String(_) => ScalarKind::String,
            Self::Binary(_) => ScalarKind::Binary,
            Self::Embedded(_) => ScalarKind::Embedded,
        }
    }
}

/// A consumer of document tokens.
///
/// Producers must call these methods in well-formed nesting order: every
/// start is matched by an end of the same kind, and inside an object every
/// value is preceded by exactly one field name.
pub trait TokenWriter {
    /// Open an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_start_object(&mut self) -> Result<()>;

    /// Close the innermost object.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_end_object(&mut self) -> Result<()>;

    /// Open an array.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_start_array(&mut self) -> Result<()>;

    /// Close the innermost array.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_end_array(&mut self) -> Result<()>;

    /// Name the next value of the innermost object.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_field_name(&mut self, name: &str) -> Result<()>;

    /// Write a leaf value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<()>;

    /// Write pre-serialized text verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept raw content.
    fn write_raw(&mut self, raw: &str) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Open a container of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_start(&mut self, kind: ContainerKind) -> Result<()> {
        match kind {
            ContainerKind::Object => self.write_start_object(),
            ContainerKind::Array => self.write_start_array(),
        }
    }

    /// Close a container of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the sink fails.
    fn write_end(&mut self, kind: ContainerKind) -> Result<()> {
        match kind {
            ContainerKind::Object => self.write_end_object(),
            ContainerKind::Array => self.write_end_array(),
        }
    }
}

impl<W: TokenWriter + ?Sized> TokenWriter for &mut W {
    fn write_start_object(&mut self) -> Result<()> {
        (**self).write_start_object()
    }

    fn write_end_object(&mut self) -> Result<()> {
        (**self).write_end_object()
    }

    fn write_start_array(&mut self) -> Result<()> {
        (**self).write_start_array()
    }

    fn write_end_array(&mut self) -> Result<()> {
        (**self).write_end_array()
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        (**self).write_field_name(name)
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<()> {
        (**self).write_scalar(scalar)
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        (**self).write_raw(raw)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Produce the tokens of an in-memory document, in document order.
///
/// Object fields are emitted in the order the map iterates them, which is
/// insertion order for values parsed by `serde_json`.
///
/// # Errors
///
/// Returns the first error reported by `out`.
pub fn emit_value<W: TokenWriter + ?Sized>(value: &Value, out: &mut W) -> Result<()> {
    match value {
        Value::Null => out.write_scalar(Scalar::Null),
        Value::Bool(b) => out.write_scalar(Scalar::Bool(*b)),
        Value::Number(n) => {
            let scalar = if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else if let Some(u) = n.as_u64() {
                Scalar::UInt(u)
            } else {
                Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
            };
            out.write_scalar(scalar)
        }
        Value::String(s) => out.write_scalar(Scalar::String(s)),
        Value::Array(items) => {
            out.write_start_array()?;
            for item in items {
                emit_value(item, out)?;
            }
            out.write_end_array()
        }
        Value::Object(map) => {
            out.write_start_object()?;
            for (name, field) in map {
                out.write_field_name(name)?;
                emit_value(field, out)?;
            }
            out.write_end_object()
        }
    }
}
