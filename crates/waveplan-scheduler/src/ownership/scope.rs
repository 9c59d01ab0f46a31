//! Scope containment policy for modification claims.

use serde::{Deserialize, Serialize};

/// How deep scope containment reaches through delimiter levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeNesting {
    /// A scope contains every descendant at any depth:
    /// `Class` overlaps `Class.method` and `Class.method.inner`.
    Transitive,
    /// A scope contains only its direct children:
    /// `Class` overlaps `Class.method` but not `Class.method.inner`.
    Direct,
}

/// Rules for deciding whether two scoped claims on the same resource overlap.
///
/// Containment is a literal-prefix check at a delimiter boundary, so
/// `OrderService` contains `OrderService.validate` but is unrelated to
/// `OrderServiceLegacy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePolicy {
    /// Delimiter separating nesting levels inside a scope name.
    #[serde(default = "ScopePolicy::default_delimiter")]
    pub delimiter: String,
    /// Containment depth policy.
    #[serde(default = "ScopePolicy::default_nesting")]
    pub nesting: ScopeNesting,
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self {
            delimiter: Self::default_delimiter(),
            nesting: Self::default_nesting(),
        }
    }
}

impl ScopePolicy {
    fn default_delimiter() -> String {
        ".".to_owned()
    }

    fn default_nesting() -> ScopeNesting {
        ScopeNesting::Transitive
    }

    /// Whether two claims on the same resource overlap.
    ///
    /// An absent scope is a whole-resource claim and overlaps everything.
    /// Two scoped claims overlap when they are identical or one contains
    /// the other under the nesting policy.
    pub fn overlaps(&self, first: Option<&str>, second: Option<&str>) -> bool {
        match (first, second) {
            (None, _) | (_, None) => true,
            (Some(left), Some(right)) => {
                left == right || self.contains(left, right) || self.contains(right, left)
            }
        }
    }

    /// Whether `outer` contains `inner` as a nested scope.
    fn contains(&self, outer: &str, inner: &str) -> bool {
        let Some(rest) = inner.strip_prefix(outer) else {
            return false;
        };
        let Some(tail) = rest.strip_prefix(&self.delimiter) else {
            return false;
        };
        match self.nesting {
            ScopeNesting::Transitive => true,
            ScopeNesting::Direct => !tail.contains(&self.delimiter),
        }
    }
}
