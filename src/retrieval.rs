//! Retrieval models and ranked results.
//!
//! - [`QueryLikelihoodModel`]: Dirichlet-smoothed query likelihood.
//! - [`PseudoFeedbackModel`]: re-ranks the query-likelihood top-K with a
//!   term distribution estimated from those same K documents.
//!
//! Both models are synchronous and keep no state between calls. Every call
//! fetches its own posting lists and builds its own pseudo-document.

pub mod feedback;
pub mod query_likelihood;

use std::cmp::Ordering;
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::skip::SkipFilter;
use crate::error::Result;
use crate::index::posting::PostingList;
use crate::index::reader::{DocRef, IndexReader};
use crate::query::Query;

pub use feedback::{PseudoDocument, PseudoFeedbackModel};
pub use query_likelihood::QueryLikelihoodModel;

/// A document and its retrieval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// The scored document.
    pub doc: DocRef,
    /// Query likelihood (or feedback-mixed likelihood) of the document.
    pub score: f64,
}

impl ScoredResult {
    /// Create a new scored result.
    pub fn new(doc: DocRef, score: f64) -> Self {
        ScoredResult { doc, score }
    }

    /// Descending-score comparison used for ranking.
    pub fn cmp_by_score(&self, other: &Self) -> Ordering {
        other.score.total_cmp(&self.score)
    }
}

/// Sort results by descending score.
///
/// The sort is stable, so equal scores keep their incoming order.
pub fn sort_by_score(results: &mut [ScoredResult]) {
    results.sort_by(ScoredResult::cmp_by_score);
}

/// A non-fatal event observed while ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The index could not answer a lookup for a document, which was
    /// dropped from the ranking.
    IndexAccess {
        /// Document number, or `#<id>` when the number itself was unavailable.
        doc_no: String,
        /// Underlying error message.
        message: String,
    },
    /// A token contributed a zero factor to a document's score, collapsing
    /// the whole product to zero.
    DegenerateScore {
        /// Affected document number.
        doc_no: String,
        /// Token whose factor was zero.
        token: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IndexAccess { doc_no, message } => {
                write!(f, "excluded document {doc_no}: {message}")
            }
            Diagnostic::DegenerateScore { doc_no, token } => {
                write!(f, "zero score for token '{token}' in document {doc_no}")
            }
        }
    }
}

/// Ranked results together with the diagnostics raised producing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Results in descending score order.
    pub results: Vec<ScoredResult>,
    /// Every non-fatal event observed during the call.
    pub diagnostics: Vec<Diagnostic>,
}

impl Ranking {
    /// Create an empty ranking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Number of ranked results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no document was ranked.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether the ranking was produced without any diagnostic.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate results in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredResult> {
        self.results.iter()
    }

    /// Document numbers in rank order.
    pub fn doc_nos(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.doc.doc_no.as_str()).collect()
    }
}

/// Query tokens that take part in scoring.
///
/// Keeps tokens that are in the index vocabulary and not on the skip list,
/// in query order. Repeated tokens are kept, each occurrence contributing its
/// own likelihood factor.
pub fn effective_tokens(query: &Query, reader: &dyn IndexReader, skip: &SkipFilter) -> Vec<String> {
    query
        .tokens()
        .iter()
        .filter(|token| !skip.is_skipped(token) && reader.contains_token(token))
        .cloned()
        .collect()
}

/// Per-token statistics fetched once per retrieval call.
#[derive(Debug, Clone)]
pub struct TermStatistics {
    /// Real posting list of the token.
    pub postings: PostingList,
    /// Collection frequency over collection length.
    pub collection_prob: f64,
}

/// Fetch posting lists and collection probabilities for each distinct token.
pub(crate) fn fetch_term_statistics(
    reader: &dyn IndexReader,
    tokens: &[String],
) -> Result<AHashMap<String, TermStatistics>> {
    let mut stats = AHashMap::with_capacity(tokens.len());
    for token in tokens {
        if stats.contains_key(token) {
            continue;
        }
        let term_stats = TermStatistics {
            postings: reader.posting_list(token)?,
            collection_prob: reader.collection_probability(token)?,
        };
        stats.insert(token.clone(), term_stats);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn result(doc_no: &str, doc_id: u64, score: f64) -> ScoredResult {
        ScoredResult::new(DocRef::new(doc_no, doc_id), score)
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut results = vec![
            result("A", 0, 0.1),
            result("B", 1, 0.5),
            result("C", 2, 0.1),
            result("D", 3, 0.5),
        ];
        sort_by_score(&mut results);

        let order: Vec<&str> = results.iter().map(|r| r.doc.doc_no.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_effective_tokens() {
        let index = MemoryIndex::builder()
            .document("D1", "oil spill OR")
            .unwrap()
            .build();
        let query = Query::new(
            "1",
            ["oil", "OR", "coal", "spill", "oil"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        let tokens = effective_tokens(&query, &index, &SkipFilter::default());
        assert_eq!(tokens, vec!["oil", "spill", "oil"]);

        let tokens = effective_tokens(&query, &index, &SkipFilter::empty());
        assert_eq!(tokens, vec!["oil", "OR", "spill", "oil"]);
    }

    #[test]
    fn test_ranking_diagnostics() {
        let mut ranking = Ranking::new();
        assert!(ranking.is_clean());

        ranking.push_diagnostic(Diagnostic::DegenerateScore {
            doc_no: "D1".to_string(),
            token: "oil".to_string(),
        });
        assert!(!ranking.is_clean());
        assert_eq!(
            ranking.diagnostics[0].to_string(),
            "zero score for token 'oil' in document D1"
        );
    }
}
