//! Dirichlet-prior smoothing for unigram document language models.
//!
//! The smoothed probability of a term in a document is the maximum a
//! posteriori estimate under a Dirichlet prior centred on the collection
//! language model:
//!
//! ```text
//! p(t|d) = (tf(t, d) + mu * p(t|C)) / (|d| + mu)
//! ```
//!
//! As long as `p(t|C) > 0` the result is strictly positive, so terms that a
//! document never mentions still contribute a non-zero factor to a query
//! likelihood product.

use serde::{Deserialize, Serialize};

use crate::error::{FeedrankError, Result};

/// Default prior strength.
pub const DEFAULT_MU: f64 = 530.0;

/// Dirichlet-smoothed term probability.
///
/// Returns 0 only when `occurrences == 0` and `collection_prob == 0`, i.e. for
/// a term the collection has never seen. Callers treat that as a data
/// integrity problem since such terms are filtered before scoring.
#[inline]
pub fn dirichlet_smoothed(occurrences: u64, doc_length: u64, collection_prob: f64, mu: f64) -> f64 {
    (occurrences as f64 + mu * collection_prob) / (doc_length as f64 + mu)
}

/// Validated Dirichlet smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirichletSmoothing {
    mu: f64,
}

impl Default for DirichletSmoothing {
    fn default() -> Self {
        DirichletSmoothing { mu: DEFAULT_MU }
    }
}

impl DirichletSmoothing {
    /// Create smoothing with the given prior strength.
    ///
    /// `mu` must be finite and strictly positive.
    pub fn new(mu: f64) -> Result<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(FeedrankError::configuration(format!(
                "mu must be a positive finite number, got {mu}"
            )));
        }
        Ok(DirichletSmoothing { mu })
    }

    /// Prior strength.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Smoothed probability of a term with `occurrences` in a document of
    /// `doc_length` tokens.
    #[inline]
    pub fn probability(&self, occurrences: u64, doc_length: u64, collection_prob: f64) -> f64 {
        dirichlet_smoothed(occurrences, doc_length, collection_prob, self.mu)
    }
}
