//! Query likelihood retrieval.
//!
//! Ranks documents by \(P(Q|D)\), the probability that the document's
//! Dirichlet-smoothed unigram language model generated the query, computed as
//! the product of per-token smoothed probabilities.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use crate::analysis::skip::SkipFilter;
use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::index::reader::{DocRef, IndexReader};
use crate::query::Query;
use crate::retrieval::{
    Diagnostic, Ranking, ScoredResult, TermStatistics, effective_tokens, fetch_term_statistics,
};
use crate::scoring::dirichlet::DirichletSmoothing;

/// A scored document and the length it was scored with.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) result: ScoredResult,
    pub(crate) doc_length: u64,
}

/// Dirichlet-smoothed query likelihood model.
#[derive(Debug, Clone)]
pub struct QueryLikelihoodModel {
    reader: Arc<dyn IndexReader>,
    smoothing: DirichletSmoothing,
    skip: SkipFilter,
}

impl QueryLikelihoodModel {
    /// Create a model over `reader` with the default skip list.
    pub fn new(reader: Arc<dyn IndexReader>, smoothing: DirichletSmoothing) -> Self {
        QueryLikelihoodModel {
            reader,
            smoothing,
            skip: SkipFilter::default(),
        }
    }

    /// Create a model from a configuration's `mu` and skip list.
    pub fn from_config(reader: Arc<dyn IndexReader>, config: &RetrievalConfig) -> Result<Self> {
        Ok(Self::new(reader, config.smoothing()?).with_skip_filter(config.skip_filter()))
    }

    /// Replace the skip filter.
    pub fn with_skip_filter(mut self, skip: SkipFilter) -> Self {
        self.skip = skip;
        self
    }

    /// The index this model reads from.
    pub fn reader(&self) -> &Arc<dyn IndexReader> {
        &self.reader
    }

    /// Smoothing parameters.
    pub fn smoothing(&self) -> DirichletSmoothing {
        self.smoothing
    }

    /// Skip filter applied to query tokens.
    pub fn skip_filter(&self) -> &SkipFilter {
        &self.skip
    }

    /// Rank the documents matching any query token and keep the best `top_k`.
    ///
    /// Tokens outside the vocabulary are ignored. An empty effective query
    /// or `top_k == 0` yields an empty ranking. Documents whose statistics
    /// cannot be read are dropped and reported in the ranking diagnostics.
    pub fn retrieve_query(&self, query: &Query, top_k: usize) -> Result<Ranking> {
        let reader = self.reader.as_ref();
        let tokens = effective_tokens(query, reader, &self.skip);
        let mut ranking = Ranking::new();
        if tokens.is_empty() || top_k == 0 {
            return Ok(ranking);
        }

        let term_stats = fetch_term_statistics(reader, &tokens)?;
        let candidates = self.rank_with_stats(query, &tokens, &term_stats, top_k, &mut ranking);
        ranking.results = candidates.into_iter().map(|c| c.result).collect();
        Ok(ranking)
    }

    /// Score the documents matching `tokens` with statistics the caller
    /// already fetched, and keep the best `top_k`.
    ///
    /// `term_stats` must hold every entry of `tokens`. Documents that fail a
    /// lookup are reported to `ranking`.
    pub(crate) fn rank_with_stats(
        &self,
        query: &Query,
        tokens: &[String],
        term_stats: &AHashMap<String, TermStatistics>,
        top_k: usize,
        ranking: &mut Ranking,
    ) -> Vec<Candidate> {
        let reader = self.reader.as_ref();

        // Candidates in first-seen order: token order, then posting order.
        let mut seen = AHashSet::new();
        let mut doc_ids = Vec::new();
        for token in tokens {
            for posting in term_stats[token].postings.iter() {
                if seen.insert(posting.doc_id) {
                    doc_ids.push(posting.doc_id);
                }
            }
        }
        log::debug!(
            "Query {}: {} effective tokens, {} candidates",
            query.topic_id(),
            tokens.len(),
            doc_ids.len()
        );

        let mut candidates = Vec::with_capacity(doc_ids.len());
        for doc_id in doc_ids {
            let doc_no = match reader.doc_no(doc_id) {
                Ok(doc_no) => doc_no,
                Err(e) => {
                    ranking.push_diagnostic(Diagnostic::IndexAccess {
                        doc_no: format!("#{doc_id}"),
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            let doc_length = match reader.doc_length(doc_id) {
                Ok(length) => length,
                Err(e) => {
                    ranking.push_diagnostic(Diagnostic::IndexAccess {
                        doc_no,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let mut score = 1.0;
            for token in tokens {
                let stats = &term_stats[token];
                let probability = self.smoothing.probability(
                    stats.postings.get(doc_id),
                    doc_length,
                    stats.collection_prob,
                );
                if probability == 0.0 {
                    ranking.push_diagnostic(Diagnostic::DegenerateScore {
                        doc_no: doc_no.clone(),
                        token: token.clone(),
                    });
                }
                score *= probability;
            }

            candidates.push(Candidate {
                result: ScoredResult::new(DocRef::new(doc_no, doc_id), score),
                doc_length,
            });
        }

        candidates.sort_by(|a, b| a.result.cmp_by_score(&b.result));
        candidates.truncate(top_k);
        candidates
    }
}
