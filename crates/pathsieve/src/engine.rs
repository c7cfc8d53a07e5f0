//! The filtering writer: forwards the tokens a filter keeps to a delegate.
//!
//! [`FilteringWriter`] sits between a producer and a sink. It checks that the
//! token stream is well formed, asks its [`TokenFilter`] about every token,
//! and forwards kept tokens to the delegate in their original order. An end
//! token is forwarded exactly when its start token was, so the delegate
//! always sees balanced containers. A field name is held back until its value
//! is kept, and nothing is forwarded inside a dropped container, so the output
//! stays well formed whatever the filter answers.
//!
//! # Example
//!
//! ```
//! use pathsieve::{emit_value, FilteringWriter, JsonWriter, RuleFilter, RuleSet};
//!
//! let rules = RuleSet::excluding(["b"]).unwrap();
//! let mut writer = FilteringWriter::new(JsonWriter::new(Vec::new()), RuleFilter::new(rules));
//!
//! let document = serde_json::json!({"a": 1, "b": [1, 2, 3, 4], "c": "x"});
//! emit_value(&document, &mut writer).unwrap();
//!
//! let output = writer.finish().unwrap().into_inner();
//! assert_eq!(String::from_utf8(output).unwrap(), r#"{"a":1,"c":"x"}"#);
//! ```

use tracing::warn;

use crate::error::{Error, Result};
use crate::filter::TokenFilter;
use crate::token::{ContainerKind, Scalar, TokenWriter};

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    forwarded: bool,
}

/// A field name waiting for its value. It is forwarded together with the
/// value, so a kept name never reaches the delegate without one.
#[derive(Debug)]
struct PendingField {
    name: String,
    kept: bool,
}

/// Where the next value lands in the delegate's output.
enum Slot {
    /// Its container was dropped, or its field name was.
    Dropped,
    /// An array element or a root value.
    Bare,
    /// An object member, written after this name.
    Field(String),
}

/// A [`TokenWriter`] forwarding only the tokens its filter keeps.
///
/// One instance serves one document pass; it is mutable state and must not
/// be shared between traversals.
#[derive(Debug)]
pub struct FilteringWriter<W, F> {
    delegate: W,
    filter: F,
    frames: Vec<Frame>,
    field: Option<PendingField>,
}

impl<W: TokenWriter, F: TokenFilter> FilteringWriter<W, F> {
    /// Wrap `delegate`, forwarding what `filter` keeps.
    #[must_use]
    pub fn new(delegate: W, filter: F) -> Self {
        Self {
            delegate,
            filter,
            frames: Vec::new(),
            field: None,
        }
    }

    /// The delegate receiving kept tokens.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.delegate
    }

    /// Mutable access to the delegate.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.delegate
    }

    /// The filter consulted for every token.
    #[must_use]
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Number of open containers, kept or not.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Return the delegate without checking the pass is complete.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.delegate
    }

    /// Check the pass is complete, flush and return the delegate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnclosedContainers`] if containers are still open,
    /// [`Error::DanglingFieldName`] if a field name never got its value, or
    /// the delegate's flush error.
    pub fn finish(mut self) -> Result<W> {
        if !self.frames.is_empty() {
            return Err(Error::UnclosedContainers {
                open: self.frames.len(),
            });
        }
        if self.field.is_some() {
            return Err(Error::DanglingFieldName);
        }
        self.delegate.flush()?;
        Ok(self.delegate)
    }

    /// Consume the pending field name for the next value; every value inside
    /// an object must have one.
    fn slot(&mut self) -> Result<Slot> {
        let Some(parent) = self.frames.last() else {
            return Ok(Slot::Bare);
        };
        let forwarded = parent.forwarded;
        Ok(match parent.kind {
            ContainerKind::Array if forwarded => Slot::Bare,
            ContainerKind::Array => Slot::Dropped,
            ContainerKind::Object => {
                let field = self.field.take().ok_or(Error::MissingFieldName)?;
                if forwarded && field.kept {
                    Slot::Field(field.name)
                } else {
                    Slot::Dropped
                }
            }
        })
    }

    /// Write what precedes a kept value; false if the value cannot be written.
    fn open_slot(&mut self, slot: Slot) -> Result<bool> {
        match slot {
            Slot::Dropped => Ok(false),
            Slot::Bare => Ok(true),
            Slot::Field(name) => {
                self.delegate.write_field_name(&name)?;
                Ok(true)
            }
        }
    }

    fn start(&mut self, kind: ContainerKind) -> Result<()> {
        let slot = self.slot()?;
        let forwarded = self.filter.include_container(kind) && self.open_slot(slot)?;
        self.frames.push(Frame { kind, forwarded });
        if forwarded {
            self.delegate.write_start(kind)?;
        }
        Ok(())
    }

    fn end(&mut self, kind: ContainerKind) -> Result<()> {
        if self.field.is_some() {
            return Err(Error::DanglingFieldName);
        }
        let Some(frame) = self.frames.last().copied() else {
            return Err(Error::UnexpectedEnd { found: kind });
        };
        if frame.kind != kind {
            return Err(Error::UnbalancedEnd {
                expected: frame.kind,
                found: kind,
            });
        }
        self.frames.pop();
        self.filter.close_container(kind);
        if frame.forwarded {
            self.delegate.write_end(kind)?;
        }
        Ok(())
    }
}

impl<W: TokenWriter, F: TokenFilter> TokenWriter for FilteringWriter<W, F> {
    fn write_start_object(&mut self) -> Result<()> {
        self.start(ContainerKind::Object)
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.end(ContainerKind::Object)
    }

    fn write_start_array(&mut self) -> Result<()> {
        self.start(ContainerKind::Array)
    }

    fn write_end_array(&mut self) -> Result<()> {
        self.end(ContainerKind::Array)
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        if self.frames.last().map(|frame| frame.kind) != Some(ContainerKind::Object) {
            return Err(Error::FieldNameOutsideObject {
                name: name.to_string(),
            });
        }
        if self.field.is_some() {
            return Err(Error::DanglingFieldName);
        }
        let kept = self.filter.include_field_name(name);
        self.field = Some(PendingField {
            name: name.to_owned(),
            kept,
        });
        Ok(())
    }

    fn write_scalar(&mut self, scalar: Scalar<'_>) -> Result<()> {
        let slot = self.slot()?;
        if self.filter.include_scalar(&scalar) && self.open_slot(slot)? {
            self.delegate.write_scalar(scalar)?;
        }
        Ok(())
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        warn!(len = raw.len(), "Rejected raw content written through a filter");
        Err(Error::RawContent)
    }

    fn flush(&mut self) -> Result<()> {
        self.delegate.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{IncludeAll, IncludeNothing, RuleFilter};
    use crate::rules::RuleSet;
    use crate::token::tests::{Recorder, Token};

    fn writer(includes: &[&str], excludes: &[&str]) -> FilteringWriter<Recorder, RuleFilter> {
        let rules = RuleSet::new(includes, excludes).unwrap();
        FilteringWriter::new(Recorder::default(), RuleFilter::new(rules))
    }

    #[test]
    fn test_forwards_everything_with_include_all() {
        let mut writer = FilteringWriter::new(Recorder::default(), IncludeAll);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        writer.write_scalar(Scalar::Int(1)).unwrap();
        writer.write_end_object().unwrap();

        let recorder = writer.finish().unwrap();
        assert_eq!(
            recorder.tokens,
            vec![
                Token::StartObject,
                Token::Field("a".to_string()),
                Token::Scalar("Int(1)".to_string()),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn test_include_nothing_forwards_nothing() {
        let mut writer = FilteringWriter::new(Recorder::default(), IncludeNothing);
        writer.write_start_array().unwrap();
        writer.write_scalar(Scalar::Null).unwrap();
        writer.write_end_array().unwrap();

        assert!(writer.finish().unwrap().tokens.is_empty());
    }

    #[test]
    fn test_end_forwarded_only_with_start() {
        let mut writer = writer(&[], &["b"]);
        writer.write_start_object().unwrap();
        writer.write_field_name("b").unwrap();
        writer.write_start_array().unwrap();
        writer.write_scalar(Scalar::Int(1)).unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_object().unwrap();

        assert_eq!(
            writer.finish().unwrap().tokens,
            vec![Token::StartObject, Token::EndObject]
        );
    }

    #[test]
    fn test_mismatched_end_is_fatal() {
        let mut writer = writer(&[], &[]);
        writer.write_start_object().unwrap();
        let err = writer.write_end_array().unwrap_err();
        assert!(matches!(
            err,
            Error::UnbalancedEnd {
                expected: ContainerKind::Object,
                found: ContainerKind::Array
            }
        ));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_extra_end_is_fatal() {
        let mut writer = writer(&[], &[]);
        let err = writer.write_end_object().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEnd {
                found: ContainerKind::Object
            }
        ));
    }

    #[test]
    fn test_second_field_name_is_fatal() {
        let mut writer = writer(&[], &[]);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        assert!(matches!(
            writer.write_field_name("b").unwrap_err(),
            Error::DanglingFieldName
        ));
    }

    #[test]
    fn test_field_name_outside_object_is_fatal() {
        let mut writer = writer(&[], &[]);
        assert!(writer.write_field_name("a").is_err());
        writer.write_start_array().unwrap();
        assert!(matches!(
            writer.write_field_name("a").unwrap_err(),
            Error::FieldNameOutsideObject { .. }
        ));
    }

    #[test]
    fn test_end_after_field_name_is_fatal() {
        let mut writer = writer(&[], &[]);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        assert!(matches!(
            writer.write_end_object().unwrap_err(),
            Error::DanglingFieldName
        ));
    }

    #[test]
    fn test_value_without_field_name_is_fatal() {
        let mut writer = writer(&[], &[]);
        writer.write_start_object().unwrap();
        assert!(matches!(
            writer.write_scalar(Scalar::Int(1)).unwrap_err(),
            Error::MissingFieldName
        ));
        assert!(matches!(
            writer.write_start_array().unwrap_err(),
            Error::MissingFieldName
        ));
        assert_eq!(writer.get_ref().tokens, vec![Token::StartObject]);
    }

    #[test]
    fn test_values_in_arrays_need_no_field_name() {
        let mut writer = writer(&[], &[]);
        writer.write_start_array().unwrap();
        writer.write_scalar(Scalar::Int(1)).unwrap();
        writer.write_start_object().unwrap();
        writer.write_end_object().unwrap();
        writer.write_end_array().unwrap();
        assert_eq!(writer.finish().unwrap().tokens.len(), 5);
    }

    /// Keeps names and scalars but no container.
    #[derive(Debug)]
    struct NoContainers;

    impl TokenFilter for NoContainers {
        fn include_field_name(&mut self, _name: &str) -> bool {
            true
        }
        fn include_container(&mut self, _kind: ContainerKind) -> bool {
            false
        }
        fn close_container(&mut self, _kind: ContainerKind) {}
        fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
            true
        }
    }

    /// Drops every field name but keeps every value.
    #[derive(Debug)]
    struct NoNames;

    impl TokenFilter for NoNames {
        fn include_field_name(&mut self, _name: &str) -> bool {
            false
        }
        fn include_container(&mut self, _kind: ContainerKind) -> bool {
            true
        }
        fn close_container(&mut self, _kind: ContainerKind) {}
        fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
            true
        }
    }

    #[test]
    fn test_nothing_forwarded_inside_dropped_container() {
        let mut writer = FilteringWriter::new(Recorder::default(), NoContainers);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        writer.write_scalar(Scalar::Int(1)).unwrap();
        writer.write_end_object().unwrap();
        writer.write_scalar(Scalar::Int(2)).unwrap();

        assert_eq!(
            writer.finish().unwrap().tokens,
            vec![Token::Scalar("Int(2)".to_string())]
        );
    }

    #[test]
    fn test_value_under_dropped_name_is_dropped() {
        let mut writer = FilteringWriter::new(Recorder::default(), NoNames);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        writer.write_scalar(Scalar::Int(1)).unwrap();
        writer.write_field_name("b").unwrap();
        writer.write_start_array().unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_object().unwrap();

        assert_eq!(
            writer.finish().unwrap().tokens,
            vec![Token::StartObject, Token::EndObject]
        );
    }

    #[test]
    fn test_name_held_until_value_is_kept() {
        let mut writer = writer(&[], &["a.b"]);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        assert_eq!(writer.get_ref().tokens, vec![Token::StartObject]);
        writer.write_start_object().unwrap();
        assert_eq!(
            writer.get_ref().tokens,
            vec![
                Token::StartObject,
                Token::Field("a".to_string()),
                Token::StartObject
            ]
        );
    }

    #[test]
    fn test_raw_content_rejected() {
        crate::logging::init_test_logging();
        let mut writer = writer(&[], &[]);
        let err = writer.write_raw("{\"a\":1}").unwrap_err();
        assert!(err.is_unsupported());
        assert!(writer.get_ref().tokens.is_empty());
    }

    #[test]
    fn test_finish_with_open_containers() {
        let mut writer = writer(&[], &[]);
        writer.write_start_object().unwrap();
        writer.write_field_name("a").unwrap();
        writer.write_start_array().unwrap();
        assert_eq!(writer.depth(), 2);
        assert!(matches!(
            writer.finish().unwrap_err(),
            Error::UnclosedContainers { open: 2 }
        ));
    }

    #[test]
    fn test_root_scalar() {
        let mut writer = writer(&["a"], &[]);
        writer.write_scalar(Scalar::String("root")).unwrap();
        assert_eq!(writer.finish().unwrap().tokens.len(), 1);
    }

    #[test]
    fn test_delegate_error_propagates() {
        #[derive(Debug)]
        struct Broken;

        impl TokenWriter for Broken {
            fn write_start_object(&mut self) -> Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into())
            }
            fn write_end_object(&mut self) -> Result<()> {
                Ok(())
            }
            fn write_start_array(&mut self) -> Result<()> {
                Ok(())
            }
            fn write_end_array(&mut self) -> Result<()> {
                Ok(())
            }
            fn write_field_name(&mut self, _name: &str) -> Result<()> {
                Ok(())
            }
            fn write_scalar(&mut self, _scalar: Scalar<'_>) -> Result<()> {
                Ok(())
            }
            fn write_raw(&mut self, _raw: &str) -> Result<()> {
                Ok(())
            }
        }

        let mut writer = FilteringWriter::new(Broken, IncludeAll);
        assert!(matches!(
            writer.write_start_object().unwrap_err(),
            Error::Io(_)
        ));
    }
}
