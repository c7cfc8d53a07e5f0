//! Matching a traversal path against a rule path.

use crate::path::{is_root, ARRAY_MARKER, ROOT, SEPARATOR};

/// Which side of a rule set a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The rule selects content to keep.
    Include,
    /// The rule selects content to drop.
    Exclude,
}

/// Decide whether `rule` applies at `candidate`.
///
/// Both paths are in normalized form (see [`crate::path`]).
///
/// - Equal paths match.
/// - A candidate below the rule matches: a rule on a container covers
///   everything nested inside it.
/// - A candidate above the rule (a genuine ancestor, not just a string
///   prefix of a sibling) matches only for include rules, so the enclosing
///   containers of an included location are still written. For exclude rules
///   the outcome is not known yet and traversal has to continue.
/// - Anything else does not match.
///
/// The root is an ancestor of every rule, and a root rule covers every path.
#[must_use]
pub fn matches(candidate: &str, rule: &str, kind: RuleKind) -> bool {
    let candidate_bytes = candidate.as_bytes();
    let rule_bytes = rule.as_bytes();
    let shared = candidate_bytes.len().min(rule_bytes.len());
    if candidate_bytes[..shared] != rule_bytes[..shared] {
        return false;
    }

    match candidate_bytes.len().cmp(&rule_bytes.len()) {
        std::cmp::Ordering::Equal => true,
        std::cmp::Ordering::Greater => rule == ROOT || is_boundary(candidate_bytes, shared),
        std::cmp::Ordering::Less => {
            let ancestor = is_root(candidate) || is_boundary(rule_bytes, shared);
            ancestor && kind == RuleKind::Include
        }
    }
}

/// Whether a new segment starts at `index`.
fn is_boundary(path: &[u8], index: usize) -> bool {
    let rest = &path[index..];
    rest.first() == Some(&(SEPARATOR as u8)) || rest.starts_with(ARRAY_MARKER.as_bytes())
}
