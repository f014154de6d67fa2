//! Query and document text analysis.
//!
//! Tokenization is deliberately minimal: text is split on whitespace and an
//! explicit skip list removes connective tokens inserted by query
//! construction. No stemming or stop-word removal takes place here; documents
//! and queries are expected to be normalized upstream.

pub mod skip;
pub mod tokenizer;

pub use skip::SkipFilter;
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};
