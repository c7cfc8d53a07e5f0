//! OR-composition of independent filters.

use tracing::debug;

use super::{Disposition, TokenFilter};
use crate::token::{ContainerKind, Scalar};

/// A filter keeping every token that at least one constituent keeps.
///
/// The trivial cases are resolved once, when the compound is built, so the
/// per-token code never has to inspect the constituents for them.
#[derive(Debug, Default)]
pub enum CompoundFilter {
    /// Nothing to test: every token is kept.
    #[default]
    IncludeAll,
    /// Every constituent drops everything.
    IncludeNothing,
    /// Every token goes to every constituent; kept if any keeps it.
    Any(Vec<Box<dyn TokenFilter>>),
}

impl CompoundFilter {
    /// Compose `filters`.
    ///
    /// No filters, or only filters that keep everything, collapse to
    /// [`CompoundFilter::IncludeAll`]. Only when every filter drops everything
    /// does the compound collapse to [`CompoundFilter::IncludeNothing`]; a
    /// filter that drops everything next to selective ones is still consulted.
    #[must_use]
    pub fn of(filters: Vec<Box<dyn TokenFilter>>) -> Self {
        let compound = match classify(&filters) {
            Disposition::IncludeAll => Self::IncludeAll,
            Disposition::IncludeNothing => Self::IncludeNothing,
            Disposition::Selective => Self::Any(filters),
        };
        debug!(disposition = ?compound.disposition(), "Compound filter built");
        compound
    }

    /// Number of constituents consulted per token.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::IncludeAll | Self::IncludeNothing => 0,
            Self::Any(filters) => filters.len(),
        }
    }

    /// Whether no constituent is consulted per token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offer a token to every constituent, without short-circuiting, so each
    /// one keeps its own traversal state in step.
    fn any(&mut self, mut test: impl FnMut(&mut Box<dyn TokenFilter>) -> bool) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::IncludeNothing => false,
            Self::Any(filters) => filters
                .iter_mut()
                .fold(false, |included, filter| test(filter) | included),
        }
    }
}

/// Classify a set of filters by what their OR-composition is known to do.
fn classify(filters: &[Box<dyn TokenFilter>]) -> Disposition {
    if filters
        .iter()
        .all(|filter| filter.disposition() == Disposition::IncludeAll)
    {
        Disposition::IncludeAll
    } else if filters
        .iter()
        .all(|filter| filter.disposition() == Disposition::IncludeNothing)
    {
        Disposition::IncludeNothing
    } else {
        Disposition::Selective
    }
}

impl TokenFilter for CompoundFilter {
    fn disposition(&self) -> Disposition {
        match self {
            Self::IncludeAll => Disposition::IncludeAll,
            Self::IncludeNothing => Disposition::IncludeNothing,
            Self::Any(_) => Disposition::Selective,
        }
    }

    fn include_field_name(&mut self, name: &str) -> bool {
        self.any(|filter| filter.include_field_name(name))
    }

    fn include_container(&mut self, kind: ContainerKind) -> bool {
        self.any(|filter| filter.include_container(kind))
    }

    fn close_container(&mut self, kind: ContainerKind) {
        if let Self::Any(filters) = self {
            for filter in filters {
                filter.close_container(kind);
            }
        }
    }

    fn include_scalar(&mut self, scalar: &Scalar<'_>) -> bool {
        self.any(|filter| filter.include_scalar(scalar))
    }
}
