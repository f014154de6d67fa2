//! Pseudo-relevance feedback over query likelihood.
//!
//! The top-K documents of an initial query likelihood ranking are assumed
//! relevant. Their token streams are concatenated into a pseudo-document,
//! and each query token gets a feedback score: its Dirichlet-smoothed
//! probability in that pseudo-document. Every feedback document is then
//! re-scored token by token:
//!
//! ```text
//! score(d) = prod_t [ alpha * p(t|d) + (1 - alpha) * p(t|F) ]
//! ```
//!
//! Mixing happens per token, so a term that is rare in a document but
//! prominent across the feedback set can move that document disproportionately.
//! Only the K feedback documents are re-ranked; there is no second pass over
//! the index.

use std::sync::Arc;

use ahash::AHashMap;

use crate::config::{RetrievalConfig, validate_alpha, validate_top_k};
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::Query;
use crate::retrieval::query_likelihood::{Candidate, QueryLikelihoodModel};
use crate::retrieval::{
    Diagnostic, Ranking, ScoredResult, TermStatistics, effective_tokens, fetch_term_statistics,
    sort_by_score,
};
use crate::scoring::dirichlet::DirichletSmoothing;

/// Term counts of the concatenated feedback documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PseudoDocument {
    term_counts: AHashMap<String, u64>,
    length: u64,
}

impl PseudoDocument {
    /// Create an empty pseudo-document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's token stream.
    pub fn append<S: AsRef<str>>(&mut self, tokens: &[S]) {
        for token in tokens {
            *self
                .term_counts
                .entry(token.as_ref().to_string())
                .or_insert(0) += 1;
        }
        self.length += tokens.len() as u64;
    }

    /// Occurrences of `token`.
    pub fn count(&self, token: &str) -> u64 {
        self.term_counts.get(token).copied().unwrap_or(0)
    }

    /// Total token count.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Whether nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Smoothed probability of each token in the pseudo-document.
///
/// Keys are exactly the distinct entries of `tokens`; every token must have
/// an entry in `term_stats`.
pub fn feedback_term_scores(
    tokens: &[String],
    pseudo: &PseudoDocument,
    term_stats: &AHashMap<String, TermStatistics>,
    smoothing: DirichletSmoothing,
) -> AHashMap<String, f64> {
    tokens
        .iter()
        .filter_map(|token| {
            let stats = term_stats.get(token)?;
            let score =
                smoothing.probability(pseudo.count(token), pseudo.len(), stats.collection_prob);
            Some((token.clone(), score))
        })
        .collect()
}

/// Query likelihood with pseudo-relevance feedback re-ranking.
#[derive(Debug, Clone)]
pub struct PseudoFeedbackModel {
    base: QueryLikelihoodModel,
    config: RetrievalConfig,
}

impl PseudoFeedbackModel {
    /// Create a model over `reader`.
    ///
    /// The configuration is validated here; its `top_n`, `top_k` and `alpha`
    /// serve as defaults for [`retrieve`](Self::retrieve).
    pub fn new(reader: Arc<dyn IndexReader>, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        let base = QueryLikelihoodModel::from_config(reader, &config)?;
        Ok(PseudoFeedbackModel { base, config })
    }

    /// The underlying query likelihood model.
    pub fn base_model(&self) -> &QueryLikelihoodModel {
        &self.base
    }

    /// Configuration supplied at construction.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Run [`retrieve_query`](Self::retrieve_query) with the configured
    /// `top_n`, `top_k` and `alpha`.
    pub fn retrieve(&self, query: &Query) -> Result<Ranking> {
        self.retrieve_query(query, self.config.top_n, self.config.top_k, self.config.alpha)
    }

    /// Retrieve `top_k` feedback documents, re-score them with feedback and
    /// return the best `top_n`.
    ///
    /// `alpha` weights the original per-token score and must lie in
    /// `[0, 1]`; `top_k` must be at least 1. Both are checked before the
    /// index is touched. The result holds `min(top_n, top_k, |pool|)`
    /// documents, where the pool excludes documents the index failed to
    /// serve.
    pub fn retrieve_query(
        &self,
        query: &Query,
        top_n: usize,
        top_k: usize,
        alpha: f64,
    ) -> Result<Ranking> {
        validate_alpha(alpha)?;
        validate_top_k(top_k)?;

        let reader = self.base.reader().as_ref();
        let smoothing = self.base.smoothing();
        let tokens = effective_tokens(query, reader, self.base.skip_filter());
        if tokens.is_empty() {
            return Ok(Ranking::new());
        }

        // Posting lists and collection probabilities serve both passes.
        let term_stats = fetch_term_statistics(reader, &tokens)?;
        let mut ranking = Ranking::new();
        let initial = self
            .base
            .rank_with_stats(query, &tokens, &term_stats, top_k, &mut ranking);

        let mut pool = Vec::with_capacity(initial.len());
        let mut pseudo = PseudoDocument::new();
        for candidate in initial {
            match reader.document_content(&candidate.result.doc) {
                Ok(content) => {
                    pseudo.append(&content);
                    pool.push(candidate);
                }
                Err(e) => ranking.push_diagnostic(Diagnostic::IndexAccess {
                    doc_no: candidate.result.doc.doc_no,
                    message: e.to_string(),
                }),
            }
        }
        log::debug!(
            "Query {}: {} feedback documents, pseudo-document of {} tokens",
            query.topic_id(),
            pool.len(),
            pseudo.len()
        );

        let rf_scores = feedback_term_scores(&tokens, &pseudo, &term_stats, smoothing);

        let mut results: Vec<ScoredResult> = Vec::with_capacity(pool.len());
        for Candidate {
            mut result,
            doc_length,
        } in pool
        {
            let mut final_score = 1.0;
            for token in &tokens {
                let stats = &term_stats[token];
                let original = smoothing.probability(
                    stats.postings.get(result.doc.doc_id),
                    doc_length,
                    stats.collection_prob,
                );
                let mixed = alpha * original + (1.0 - alpha) * rf_scores[token];
                if mixed == 0.0 {
                    ranking.push_diagnostic(Diagnostic::DegenerateScore {
                        doc_no: result.doc.doc_no.clone(),
                        token: token.clone(),
                    });
                }
                final_score *= mixed;
            }

            result.score = final_score;
            results.push(result);
        }

        sort_by_score(&mut results);
        results.truncate(top_n);
        ranking.results = results;
        Ok(ranking)
    }
}
