//! AND-composition of independent filters.

use tracing::debug;

use super::{Disposition, TokenFilter};
use crate::token::{ContainerKind, Scalar};

/// A filter keeping only the tokens every constituent keeps.
///
/// This is how several exclusions hold at once: each constituent drops its
/// own part of the document and the intersection drops all of them.
#[derive(Debug, Default)]
pub struct IntersectFilter {
    filters: Vec<Box<dyn TokenFilter>>,
}

impl IntersectFilter {
    /// Compose `filters`. Constituents that keep everything are left out.
    #[must_use]
    pub fn of(filters: Vec<Box<dyn TokenFilter>>) -> Self {
        let filters: Vec<_> = filters
            .into_iter()
            .filter(|filter| filter.disposition() != Disposition::IncludeAll)
            .collect();
        let intersection = Self { filters };
        debug!(
            constituents = intersection.len(),
            disposition = ?intersection.disposition(),
            "Intersection filter built"
        );
        intersection
    }

    /// Number of constituents consulted per token.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no constituent is consulted per token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Offer a token to every constituent, without short-circuiting.
    fn all(&mut self, mut test: impl FnMut(&mut Box<dyn TokenFilter>) -> bool) -> bool {
        self.filters
            .iter_mut()
            .fold(true, |kept, filter| test(filter) & kept)
    }
}

impl TokenFilter for IntersectFilter {
    fn disposition(&self) -> Disposition {
        if self
            .filters
            .iter()
            .any(|filter| filter.disposition() == Disposition::IncludeNothing)
        {
            Disposition::IncludeNothing
        } else if self.filters.is_empty() {
            Disposition::IncludeAll
        } else {
            Disposition::Selective
        }
    }

    fn include_field_name(&mut self, name: &str) -> bool {
        self.all(|filter| filter.include_field_name(name))
    }

    fn include_container(&mut self, kind: ContainerKind) -> bool {
        self.all(|filter| filter.include_container(kind))
    }

    fn close_container(&mut self, kind: ContainerKind) {
        for filter in &mut self.filters {
            filter.close_container(kind);
        }
    }

    fn include_scalar(&mut self, scalar: &Scalar<'_>) -> bool {
        self.all(|filter| filter.include_scalar(scalar))
    }
}
