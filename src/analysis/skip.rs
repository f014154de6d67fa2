//! Skip filter implementation.
//!
//! Removes tokens that belong to an explicit skip list. The default list holds
//! the `OR` connective that query construction inserts between terms; it is an
//! operator, not a content word, and must never be scored.
//!
//! # Examples
//!
//! ```
//! use feedrank::analysis::skip::SkipFilter;
//!
//! let filter = SkipFilter::default();
//! let tokens = vec!["oil".to_string(), "OR".to_string(), "gas".to_string()];
//!
//! assert_eq!(filter.filter(tokens), vec!["oil", "gas"]);
//! ```

use ahash::AHashSet;

/// Tokens skipped when no explicit list is configured.
pub const DEFAULT_SKIP_TOKENS: &[&str] = &["OR"];

/// A filter that removes skip-listed tokens from a token sequence.
///
/// Matching is exact and case-sensitive: `OR` is an operator, `or` may be a
/// real term in the collection.
#[derive(Clone, Debug)]
pub struct SkipFilter {
    skip_tokens: AHashSet<String>,
}

impl Default for SkipFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_TOKENS.iter().copied())
    }
}

impl SkipFilter {
    /// Create a filter from an explicit skip list.
    pub fn new<I, S>(skip_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SkipFilter {
            skip_tokens: skip_tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a filter that skips nothing.
    pub fn empty() -> Self {
        SkipFilter {
            skip_tokens: AHashSet::new(),
        }
    }

    /// Check whether a token is on the skip list.
    pub fn is_skipped(&self, token: &str) -> bool {
        self.skip_tokens.contains(token)
    }

    /// Remove skip-listed tokens, preserving order and duplicates.
    pub fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| !self.is_skipped(token))
            .collect()
    }

    /// Number of tokens on the skip list.
    pub fn len(&self) -> usize {
        self.skip_tokens.len()
    }

    /// Whether the skip list is empty.
    pub fn is_empty(&self) -> bool {
        self.skip_tokens.is_empty()
    }
}
