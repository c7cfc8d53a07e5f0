//! Rule-driven filtering with per-container decision caching.

use std::sync::Arc;

use tracing::trace;

use super::{Disposition, TokenFilter};
use crate::path::{ARRAY_MARKER, ROOT, SEPARATOR};
use crate::rules::RuleSet;
use crate::token::{ContainerKind, Scalar};

/// One open container.
#[derive(Debug, Clone)]
struct Context {
    kind: ContainerKind,
    /// Field the container was opened under; `None` for array elements and the root.
    name: Option<String>,
    /// `Some(false)` once the container is excluded. Never set to `Some(true)`:
    /// an included container may still hold excluded content.
    cached: Option<bool>,
}

impl Context {
    fn append_to(&self, path: &mut String) {
        match self.kind {
            ContainerKind::Array => {
                path.push(SEPARATOR);
                if let Some(name) = &self.name {
                    path.push_str(name);
                }
                path.push_str(ARRAY_MARKER);
            }
            ContainerKind::Object => {
                if let Some(name) = &self.name {
                    path.push(SEPARATOR);
                    path.push_str(name);
                }
            }
        }
    }
}

/// Filter applying a [`RuleSet`] to one document.
///
/// Keeps an explicit stack of open containers. Once a container is excluded,
/// everything below it is dropped without consulting the rules again, so an
/// excluded subtree costs nothing beyond its depth.
#[derive(Debug, Clone)]
pub struct RuleFilter {
    rules: Arc<RuleSet>,
    contexts: Vec<Context>,
    field_name: Option<String>,
    evaluations: usize,
}

impl RuleFilter {
    /// Create a filter for one pass over a document.
    #[must_use]
    pub fn new(rules: impl Into<Arc<RuleSet>>) -> Self {
        Self {
            rules: rules.into(),
            contexts: Vec::new(),
            field_name: None,
            evaluations: 0,
        }
    }

    /// The rules this filter applies.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Number of open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    /// Number of paths tested against the rules so far in this pass.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Path of the current position, including a pending field name.
    #[must_use]
    pub fn current_path(&self) -> String {
        let mut path = String::new();
        for context in &self.contexts {
            context.append_to(&mut path);
        }
        if let Some(name) = &self.field_name {
            path.push(SEPARATOR);
            path.push_str(name);
        }
        if path.is_empty() {
            path.push_str(ROOT);
        }
        path
    }

    fn test(&mut self, event: &'static str) -> bool {
        // Excluded containers push Some(false), so the innermost one is enough.
        if let Some(cached) = self.contexts.last().and_then(|context| context.cached) {
            return cached;
        }
        if self.rules.is_empty() {
            return true;
        }

        let path = self.current_path();
        let decision = self.rules.decide(&path);
        self.evaluations += 1;
        trace!(path = %path, event, decision, "Path tested");
        decision
    }
}

impl TokenFilter for RuleFilter {
    fn disposition(&self) -> Disposition {
        if self.rules.is_empty() {
            Disposition::IncludeAll
        } else {
            Disposition::Selective
        }
    }

    fn include_field_name(&mut self, name: &str) -> bool {
        self.field_name = Some(name.to_owned());
        self.test("field_name")
    }

    fn include_container(&mut self, kind: ContainerKind) -> bool {
        let decision = self.test(match kind {
            ContainerKind::Object => "start_object",
            ContainerKind::Array => "start_array",
        });
        self.contexts.push(Context {
            kind,
            name: self.field_name.take(),
            cached: if decision { None } else { Some(false) },
        });
        decision
    }

    fn close_container(&mut self, kind: ContainerKind) {
        let context = self.contexts.pop();
        debug_assert_eq!(context.map(|c| c.kind), Some(kind));
        self.field_name = None;
    }

    fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
        let decision = self.test("scalar");
        self.field_name = None;
        decision
    }
}
