//! Token filters: the per-pass predicates consulted by the engine.
//!
//! A [`TokenFilter`] sees every token of one document, in order, and answers
//! whether each one is kept. Filters own their traversal state, so a filter
//! value serves exactly one pass.
//!
//! - [`RuleFilter`] applies a [`crate::RuleSet`] of include/exclude paths.
//! - [`PointerFilter`] drops the single location named by a JSON pointer.
//! - [`CompoundFilter`] keeps whatever any of its constituents keeps.
//! - [`IntersectFilter`] keeps only what all of its constituents keep.
//! - [`IncludeAll`] and [`IncludeNothing`] are the trivial cases.
//!
//! # Example
//!
//! ```
//! use pathsieve::filter::{CompoundFilter, RuleFilter, TokenFilter};
//! use pathsieve::RuleSet;
//!
//! let ids = RuleFilter::new(RuleSet::including(["ids"]).unwrap());
//! let emails = RuleFilter::new(RuleSet::including(["emails"]).unwrap());
//! let filter = CompoundFilter::of(vec![Box::new(ids), Box::new(emails)]);
//!
//! let value = serde_json::json!({"ids": [1], "emails": ["a@b"], "address": {}});
//! let filtered = pathsieve::filter_value(&value, filter).unwrap();
//! assert_eq!(filtered, serde_json::json!({"ids": [1], "emails": ["a@b"]}));
//! ```

mod compound;
mod intersect;
mod pointer;
mod rules;

use crate::token::{ContainerKind, Scalar};

pub use compound::CompoundFilter;
pub use intersect::IntersectFilter;
pub use pointer::PointerFilter;
pub use rules::RuleFilter;

/// What a filter is statically known to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Every token is kept.
    IncludeAll,
    /// No token is kept.
    IncludeNothing,
    /// Tokens have to be tested one by one.
    #[default]
    Selective,
}

/// A stateful predicate over the tokens of one document.
///
/// The engine guarantees well-formed input: ends match starts, and every
/// value inside an object follows exactly one field name. Every method must be
/// called for every token, kept or not, so the filter can track where it is.
pub trait TokenFilter: std::fmt::Debug {
    /// What this filter is statically known to do.
    fn disposition(&self) -> Disposition {
        Disposition::Selective
    }

    /// Whether the field name `name` of the innermost object is kept.
    fn include_field_name(&mut self, name: &str) -> bool;

    /// Whether a container opened at the current position is kept.
    fn include_container(&mut self, kind: ContainerKind) -> bool;

    /// Leave the innermost container.
    fn close_container(&mut self, kind: ContainerKind);

    /// Whether a scalar at the current position is kept.
    fn include_scalar(&mut self, scalar: &Scalar<'_>) -> bool;
}

impl<F: TokenFilter + ?Sized> TokenFilter for Box<F> {
    fn disposition(&self) -> Disposition {
        (**self).disposition()
    }

    fn include_field_name(&mut self, name: &str) -> bool {
        (**self).include_field_name(name)
    }

    fn include_container(&mut self, kind: ContainerKind) -> bool {
        (**self).include_container(kind)
    }

    fn close_container(&mut self, kind: ContainerKind) {
        (**self).close_container(kind);
    }

    fn include_scalar(&mut self, scalar: &Scalar<'_>) -> bool {
        (**self).include_scalar(scalar)
    }
}

/// Keeps every token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeAll;

impl TokenFilter for IncludeAll {
    fn disposition(&self) -> Disposition {
        Disposition::IncludeAll
    }

    fn include_field_name(&mut self, _name: &str) -> bool {
        true
    }

    fn include_container(&mut self, _kind: ContainerKind) -> bool {
        true
    }

    fn close_container(&mut self, _kind: ContainerKind) {}

    fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
        true
    }
}

/// Drops every token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeNothing;

impl TokenFilter for IncludeNothing {
    fn disposition(&self) -> Disposition {
        Disposition::IncludeNothing
    }

    fn include_field_name(&mut self, _name: &str) -> bool {
        false
    }

    fn include_container(&mut self, _kind: ContainerKind) -> bool {
        false
    }

    fn close_container(&mut self, _kind: ContainerKind) {}

    fn include_scalar(&mut self, _scalar: &Scalar<'_>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_default() {
        assert_eq!(Disposition::default(), Disposition::Selective);
    }

    #[test]
    fn test_include_all() {
        let mut filter = IncludeAll;
        assert_eq!(filter.disposition(), Disposition::IncludeAll);
        assert!(filter.include_container(ContainerKind::Object));
        assert!(filter.include_field_name("a"));
        assert!(filter.include_scalar(&Scalar::Null));
        filter.close_container(ContainerKind::Object);
    }

    #[test]
    fn test_include_nothing() {
        let mut filter = IncludeNothing;
        assert_eq!(filter.disposition(), Disposition::IncludeNothing);
        assert!(!filter.include_container(ContainerKind::Array));
        assert!(!filter.include_scalar(&Scalar::Bool(true)));
        filter.close_container(ContainerKind::Array);
    }

    #[test]
    fn test_boxed_filter_delegates() {
        let mut filter: Box<dyn TokenFilter> = Box::new(IncludeNothing);
        assert_eq!(filter.disposition(), Disposition::IncludeNothing);
        assert!(!filter.include_field_name("a"));
    }
}
