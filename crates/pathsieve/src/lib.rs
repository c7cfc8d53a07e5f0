//! `pathsieve` - Streaming include/exclude path filtering for JSON documents
//!
//! This library filters a stream of document tokens so that only the fields
//! and elements selected by include/exclude path rules reach the underlying
//! writer. [`FilteringWriter`] works token by token and never builds the
//! document; the [`filter_value`], [`to_filtered_value`] and
//! [`to_filtered_string`] helpers start from an in-memory value instead.
//!
//! - [`RuleSet`] holds the rules; [`matcher::matches`] is the path test.
//! - [`RuleFilter`], [`PointerFilter`] and [`CompoundFilter`] decide per token.
//! - [`FilteringWriter`] enforces well-formed input and forwards kept tokens.
//! - [`JsonWriter`] and [`ValueBuilder`] are ready-made sinks.
//!
//! # Example
//!
//! ```
//! use pathsieve::{filter_value, RuleFilter, RuleSet};
//! use serde_json::json;
//!
//! let rules = RuleSet::including(["a.b.c"]).unwrap();
//! let document = json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}});
//!
//! let filtered = filter_value(&document, RuleFilter::new(rules)).unwrap();
//! assert_eq!(filtered, json!({"a": {"b": {"c": 1}}}));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod logging;
pub mod matcher;
pub mod path;
pub mod rules;
pub mod sink;
pub mod token;

use serde::Serialize;
use serde_json::Value;

pub use config::Config;
pub use engine::FilteringWriter;
pub use error::{Error, Result};
pub use filter::{
    CompoundFilter, Disposition, IntersectFilter, PointerFilter, RuleFilter, TokenFilter,
};
pub use logging::init_logging;
pub use rules::RuleSet;
pub use sink::{JsonWriter, ValueBuilder};
pub use token::{emit_value, ContainerKind, Scalar, ScalarKind, TokenWriter};

/// Filter an in-memory document into a new value.
///
/// A document the filter drops entirely becomes `null`.
///
/// # Errors
///
/// Returns an error if the filter rejects the token stream.
pub fn filter_value<F: TokenFilter>(value: &Value, filter: F) -> Result<Value> {
    let mut writer = FilteringWriter::new(ValueBuilder::new(), filter);
    emit_value(value, &mut writer)?;
    writer.finish()?.finish()
}

/// Serialize `value` and keep only what `filter` keeps.
///
/// `value` is converted to a whole [`serde_json::Value`] first, so memory use
/// grows with the document; feed a [`FilteringWriter`] directly to avoid that.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_filtered_value<T, F>(value: &T, filter: F) -> Result<Value>
where
    T: Serialize + ?Sized,
    F: TokenFilter,
{
    filter_value(&serde_json::to_value(value)?, filter)
}

/// Serialize `value` to compact JSON text, keeping only what `filter` keeps.
///
/// Like [`to_filtered_value`], this converts `value` to a
/// [`serde_json::Value`] before filtering.
///
/// A document the filter drops entirely becomes the empty string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_filtered_string<T, F>(value: &T, filter: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: TokenFilter,
{
    let document = serde_json::to_value(value)?;
    let mut writer = FilteringWriter::new(JsonWriter::new(Vec::new()), filter);
    emit_value(&document, &mut writer)?;
    let bytes = writer.finish()?.into_inner();
    String::from_utf8(bytes).map_err(|e| Error::internal(e.to_string()))
}
