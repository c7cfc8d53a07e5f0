//! Dropping the single location named by a JSON pointer.

use super::{Disposition, TokenFilter};
use crate::error::{Error, Result};
use crate::token::{ContainerKind, Scalar};

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    /// The container sits on the pointer's path, above its target.
    on_path: bool,
    /// The container is the target or lies inside it.
    excluded: bool,
    next_index: usize,
}

/// Filter keeping everything except the value a JSON pointer (RFC 6901)
/// points at.
///
/// The pointed-at value is dropped with its whole subtree, and so is the field
/// name it sits under. The empty pointer addresses the whole document.
#[derive(Debug, Clone)]
pub struct PointerFilter {
    pointer: String,
    tokens: Vec<String>,
    frames: Vec<Frame>,
    field_name: Option<String>,
}

impl PointerFilter {
    /// Parse `pointer` and create a filter for one pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPointer`] if the pointer is neither empty nor
    /// starts with `/`, or contains an invalid `~` escape.
    pub fn new(pointer: &str) -> Result<Self> {
        Ok(Self {
            pointer: pointer.to_string(),
            tokens: parse_pointer(pointer)?,
            frames: Vec::new(),
            field_name: None,
        })
    }

    /// The pointer this filter excludes.
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Locate the next value: returns `(on_path, excluded)`.
    fn step(&mut self) -> (bool, bool) {
        let depth = self.frames.len();
        let field_name = self.field_name.take();
        let Some(parent) = self.frames.last_mut() else {
            return (true, self.tokens.is_empty());
        };

        let token = self.tokens.get(depth - 1);
        let on_path = match parent.kind {
            ContainerKind::Array => {
                let index = parent.next_index;
                parent.next_index += 1;
                parent.on_path && token.is_some_and(|t| matches_index(t, index))
            }
            ContainerKind::Object => {
                parent.on_path && token.is_some() && token.map(String::as_str) == field_name.as_deref()
            }
        };
        if parent.excluded {
            return (false, true);
        }
        (on_path, on_path && depth == self.tokens.len())
    }
}

impl TokenFilter for PointerFilter {
    fn disposition(&self) -> Disposition {
        if self.tokens.is_empty() {
            Disposition::IncludeNothing
        } else {
            Disposition::Selective
        }
    }

    fn include_field_name(&mut self, name: &str) -> bool {
        self.field_name = Some(name.to_owned());
        let depth = self.frames.len();
        match self.frames.last() {
            Some(parent) if parent.excluded => false,
            Some(parent) => {
                let target = parent.on_path
                    && depth == self.tokens.len()
                    && self.tokens.get(depth - 1).is_some_and(|t| t == name);
                !target
            }
            None => !self.tokens.is_empty(),
        }
    }

    fn include_container(&mut self, kind: ContainerKind) -> bool {
        let (on_path, excluded) = self.step();
        self.frames.push(Frame {
            kind,
            on_path: on_path && !excluded,
            excluded,
            next_index: 0,
        });
        !excluded
    }

    fn close_container(&mut self, kind: ContainerKind) {
        let frame = self.frames.pop();
        debug_assert_eq!(frame.map(|f| f.kind), Some(kind));
        self.field_name = None;
    }

    fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
        let (_, excluded) = self.step();
        !excluded
    }
}

fn parse_pointer(pointer: &str) -> Result<Vec<String>> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(body) = pointer.strip_prefix('/') else {
        return Err(Error::invalid_pointer(pointer, "must be empty or start with '/'"));
    };
    body.split('/')
        .map(|token| unescape(pointer, token))
        .collect()
}

fn unescape(pointer: &str, token: &str) -> Result<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(Error::invalid_pointer(pointer, "'~' must be followed by '0' or '1'")),
        }
    }
    Ok(out)
}

/// Array index tokens are decimal without leading zeros.
fn matches_index(token: &str, index: usize) -> bool {
    let canonical = token == "0" || !token.starts_with('0');
    canonical
        && !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && token.parse::<usize>().is_ok_and(|i| i == index)
}
