//! Index reader trait consumed by the retrieval models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FeedrankError, Result};
use crate::index::posting::PostingList;

/// Reference to an indexed document.
///
/// Pairs the external document number with the internal id used for
/// statistics lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocRef {
    /// External document identifier (e.g. a TREC `DOCNO`).
    pub doc_no: String,
    /// Internal numeric id.
    pub doc_id: u64,
}

impl DocRef {
    /// Create a new document reference.
    pub fn new<S: Into<String>>(doc_no: S, doc_id: u64) -> Self {
        DocRef {
            doc_no: doc_no.into(),
            doc_id,
        }
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.doc_no, self.doc_id)
    }
}

/// Read-only access to a built index.
///
/// Implementations must be safe for concurrent reads; the retrieval models
/// never call anything that mutates the index.
pub trait IndexReader: Send + Sync + fmt::Debug {
    /// Map an external document number to its internal id.
    fn doc_id(&self, doc_no: &str) -> Result<u64>;

    /// Map an internal id back to its external document number.
    fn doc_no(&self, doc_id: u64) -> Result<String>;

    /// Total token count of the document.
    fn doc_length(&self, doc_id: u64) -> Result<u64>;

    /// Total occurrences of `token` across the whole collection.
    fn collection_frequency(&self, token: &str) -> Result<u64>;

    /// Total token count across the whole collection.
    fn collection_length(&self) -> Result<u64>;

    /// Number of documents containing `token`.
    fn doc_frequency(&self, token: &str) -> Result<u64>;

    /// Number of documents in the collection.
    fn doc_count(&self) -> Result<u64>;

    /// All documents containing `token`, with occurrence counts.
    fn posting_list(&self, token: &str) -> Result<PostingList>;

    /// Vocabulary membership test.
    fn contains_token(&self, token: &str) -> bool;

    /// Full tokenized content of a document.
    fn document_content(&self, doc: &DocRef) -> Result<Vec<String>>;

    /// Resolve a document number into a full [`DocRef`].
    fn doc_ref(&self, doc_no: &str) -> Result<DocRef> {
        Ok(DocRef::new(doc_no, self.doc_id(doc_no)?))
    }

    /// Background probability of `token`: collection frequency over
    /// collection length.
    fn collection_probability(&self, token: &str) -> Result<f64> {
        let collection_length = self.collection_length()?;
        if collection_length == 0 {
            return Err(FeedrankError::index_access("collection is empty"));
        }
        Ok(self.collection_frequency(token)? as f64 / collection_length as f64)
    }
}
