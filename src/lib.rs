//! # feedrank
//!
//! Document ranking by query likelihood with Dirichlet smoothing, refined by
//! pseudo-relevance feedback.
//!
//! ## Features
//!
//! - Dirichlet-smoothed unigram query likelihood
//! - Pseudo-relevance feedback re-ranking with per-token score mixing
//! - Pluggable index backends through the [`index::IndexReader`] trait
//! - In-memory index for tests and batch runs
//! - trec_eval run output from the `feedrank` binary
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use feedrank::prelude::*;
//!
//! let index = MemoryIndex::builder()
//!     .document("D1", "oil spill oil coast")?
//!     .document("D2", "oil price")?
//!     .build();
//!
//! let model = PseudoFeedbackModel::new(Arc::new(index), RetrievalConfig::default())?;
//! let query = Query::new("901", vec!["oil".to_string(), "spill".to_string()]);
//! let ranking = model.retrieve_query(&query, 10, 2, 0.4)?;
//!
//! assert_eq!(ranking.doc_nos(), vec!["D1", "D2"]);
//! # Ok::<(), feedrank::error::FeedrankError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod retrieval;
pub mod scoring;

pub mod prelude {
    pub use crate::analysis::{SkipFilter, Tokenizer, WhitespaceTokenizer};
    pub use crate::config::RetrievalConfig;
    pub use crate::error::{FeedrankError, Result};
    pub use crate::index::{DocRef, IndexReader, MemoryIndex, PostingList};
    pub use crate::query::Query;
    pub use crate::retrieval::{
        Diagnostic, PseudoFeedbackModel, QueryLikelihoodModel, Ranking, ScoredResult,
    };
    pub use crate::scoring::DirichletSmoothing;
}

/// Crate version, reported by `feedrank --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
