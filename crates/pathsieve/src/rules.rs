//! Include/exclude rule sets.

use tracing::debug;

use crate::error::Result;
use crate::matcher::{matches, RuleKind};
use crate::path::normalize_rule;

/// An immutable pair of exclude and include rules.
///
/// Excludes are always evaluated first. An empty include set means
/// "everything not excluded". A rule set holds no traversal state and can be
/// shared by any number of concurrent filtering passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    excludes: Vec<String>,
    includes: Vec<String>,
}

impl RuleSet {
    /// Build a rule set from caller-supplied rule strings.
    ///
    /// Each rule is normalized once here (see [`crate::path::normalize_rule`]);
    /// duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule is malformed.
    pub fn new<I, E>(includes: I, excludes: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let rules = Self {
            excludes: normalize_all(excludes)?,
            includes: normalize_all(includes)?,
        };
        debug!(
            includes = rules.includes.len(),
            excludes = rules.excludes.len(),
            "Rule set built"
        );
        Ok(rules)
    }

    /// Build a rule set that only excludes.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule is malformed.
    pub fn excluding<E>(excludes: E) -> Result<Self>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::new(std::iter::empty::<&str>(), excludes)
    }

    /// Build a rule set that only includes.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule is malformed.
    pub fn including<I>(includes: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::new(includes, std::iter::empty::<&str>())
    }

    /// Normalized include rules.
    #[must_use]
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Normalized exclude rules.
    #[must_use]
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Whether this rule set keeps everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Decide whether the content at `path` is kept.
    #[must_use]
    pub fn decide(&self, path: &str) -> bool {
        if self.matching_exclude(path).is_some() {
            return false;
        }
        if self.includes.is_empty() {
            return true;
        }
        self.includes
            .iter()
            .any(|include| matches(path, include, RuleKind::Include))
    }

    /// The first exclude rule that applies at `path`, if any.
    #[must_use]
    pub fn matching_exclude(&self, path: &str) -> Option<&str> {
        self.excludes
            .iter()
            .find(|exclude| matches(path, exclude, RuleKind::Exclude))
            .map(String::as_str)
    }
}

fn normalize_all<R>(raw: R) -> Result<Vec<String>>
where
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let mut rules: Vec<String> = Vec::new();
    for rule in raw {
        let normalized = normalize_rule(rule.as_ref())?;
        if !rules.contains(&normalized) {
            rules.push(normalized);
        }
    }
    Ok(rules)
}
