//! Token sinks: compact JSON text and in-memory values.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::value::RawValue;
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::token::{ContainerKind, Scalar, TokenWriter};

/// Check that `text` is a single JSON number, of any magnitude.
fn check_decimal(text: &str) -> Result<()> {
    let numeric = text.starts_with(|c: char| c == '-' || c.is_ascii_digit())
        && text.ends_with(|c: char| c.is_ascii_digit());
    if !numeric || RawValue::from_string(text.to_owned()).is_err() {
        return Err(Error::invalid_decimal(text, "not a JSON number"));
    }
    Ok(())
}

/// Writes tokens as compact JSON text.
///
/// Multiple root values are separated by a newline. Binary scalars are
/// written as standard base64 strings.
#[derive(Debug)]
pub struct JsonWriter<W> {
    out: W,
    /// One entry per open container: whether it already holds a value.
    open: Vec<bool>,
    after_field_name: bool,
    roots: usize,
}

impl<W: Write> JsonWriter<W> {
    /// Write JSON text to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            open: Vec::new(),
            after_field_name: false,
            roots: 0,
        }
    }

    /// The underlying output.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Return the underlying output.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Number of root values written so far.
    #[must_use]
    pub fn roots(&self) -> usize {
        self.roots
    }

    /// Write the separator due before the next value or field name.
    fn separate(&mut self) -> Result<()> {
        if self.after_field_name {
            self.after_field_name = false;
            return Ok(());
        }
        match self.open.last_mut() {
            Some(has_values) => {
                if *has_values {
                    self.out.write_all(b",")?;
                }
                *has_values = true;
            }
            None => {
                if self.roots > 0 {
                    self.out.write_all(b"\n")?;
                }
                self.roots += 1;
            }
        }
        Ok(())
    }

    fn open(&mut self, bracket: &[u8]) -> Result<()> {
        self.separate()?;
        self.out.write_all(bracket)?;
        self.open.push(false);
        Ok(())
    }

    fn close(&mut self, bracket: &[u8]) -> Result<()> {
        self.open.pop();
        self.out.write_all(bracket)?;
        Ok(())
    }
}

impl<W: Write> TokenWriter for JsonWriter<W> {
    fn write_start_object(&mut self) -> Result<()> {
        self.open(b"{")
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.close(b"}")
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.open(b"[")
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.close(b"]")
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        self.separate()?;
        serde_json::to_writer(&mut self.out, name)?;
        self.out.write_all(b":")?;
        self.after_field_name = true;
        Ok(())
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<()> {
        if let Scalar::Decimal(text) = scalar {
            check_decimal(text)?;
        }
        self.separate()?;
        match scalar {
            Scalar::Null => self.out.write_all(b"null")?,
            Scalar::Bool(b) => serde_json::to_writer(&mut self.out, &b)?,
            Scalar::Int(i) => serde_json::to_writer(&mut self.out, &i)?,
            Scalar::UInt(u) => serde_json::to_writer(&mut self.out, &u)?,
            Scalar::Float(f) => serde_json::to_writer(&mut self.out, &f)?,
            Scalar::Decimal(text) => self.out.write_all(text.as_bytes())?,
            Scalar::String(s) => serde_json::to_writer(&mut self.out, s)?,
            Scalar::Binary(bytes) => serde_json::to_writer(&mut self.out, &STANDARD.encode(bytes))?,
            Scalar::Embedded(value) => serde_json::to_writer(&mut self.out, value)?,
        }
        Ok(())
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        self.out.write_all(raw.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
enum Partial {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl Partial {
    fn kind(&self) -> ContainerKind {
        match self {
            Self::Object(_) => ContainerKind::Object,
            Self::Array(_) => ContainerKind::Array,
        }
    }
}

/// Assembles tokens into a [`serde_json::Value`].
#[derive(Debug, Default)]
pub struct ValueBuilder {
    /// Open containers, each with the field name it will be stored under.
    stack: Vec<(Option<String>, Partial)>,
    field_name: Option<String>,
    roots: Vec<Value>,
}

impl ValueBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the assembled value.
    ///
    /// No root value yields `null`; several root values yield an array of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnclosedContainers`] if containers are still open.
    pub fn finish(mut self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedContainers {
                open: self.stack.len(),
            });
        }
        Ok(match self.roots.len() {
            0 => Value::Null,
            1 => self.roots.remove(0),
            _ => Value::Array(self.roots),
        })
    }

    fn push_value(&mut self, name: Option<String>, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            Some((_, Partial::Object(map))) => {
                let name = name.ok_or(Error::MissingFieldName)?;
                map.insert(name, value);
            }
            Some((_, Partial::Array(items))) => items.push(value),
            None => self.roots.push(value),
        }
        Ok(())
    }

    fn start(&mut self, partial: Partial) {
        let name = self.field_name.take();
        self.stack.push((name, partial));
    }

    fn end(&mut self, kind: ContainerKind) -> Result<()> {
        let (name, partial) = self.stack.pop().ok_or(Error::UnexpectedEnd { found: kind })?;
        let value = match (partial, kind) {
            (Partial::Object(map), ContainerKind::Object) => Value::Object(map),
            (Partial::Array(items), ContainerKind::Array) => Value::Array(items),
            (partial, found) => {
                return Err(Error::UnbalancedEnd {
                    expected: partial.kind(),
                    found,
                })
            }
        };
        self.push_value(name, value)
    }
}

impl TokenWriter for ValueBuilder {
    fn write_start_object(&mut self) -> Result<()> {
        self.start(Partial::Object(Map::new()));
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.end(ContainerKind::Object)
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.start(Partial::Array(Vec::new()));
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.end(ContainerKind::Array)
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        self.field_name = Some(name.to_string());
        Ok(())
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<()> {
        let value = match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::from(i),
            Scalar::UInt(u) => Value::from(u),
            Scalar::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Scalar::Decimal(text) => {
                check_decimal(text)?;
                let number = text.parse::<Number>().map_err(|_| {
                    Error::invalid_decimal(text, "out of range for an in-memory value")
                })?;
                Value::Number(number)
            }
            Scalar::String(s) => Value::String(s.to_string()),
            Scalar::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
            Scalar::Embedded(value) => value.clone(),
        };
        let name = self.field_name.take();
        self.push_value(name, value)
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        let value: Value = serde_json::from_str(raw)?;
        let name = self.field_name.take();
        self.push_value(name, value)
    }
}
