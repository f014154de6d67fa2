//! In-memory index backend.
//!
//! Holds the full token stream of every document plus per-term posting
//! lists. Suitable for test fixtures and for batch runs over collections that
//! fit in memory; it has no on-disk format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::error::{FeedrankError, Result};
use crate::index::posting::PostingList;
use crate::index::reader::{DocRef, IndexReader};

#[derive(Debug, Clone)]
struct StoredDocument {
    doc_no: String,
    tokens: Vec<String>,
}

/// One line of a corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// External document number.
    pub doc_no: String,
    /// Raw document text.
    pub text: String,
}

/// An immutable in-memory index.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    documents: Vec<StoredDocument>,
    doc_ids: AHashMap<String, u64>,
    postings: AHashMap<String, PostingList>,
    collection_length: u64,
}

impl MemoryIndex {
    /// Create a new builder.
    pub fn builder() -> MemoryIndexBuilder {
        MemoryIndexBuilder::new()
    }

    /// Load a JSON Lines corpus (`{"doc_no": "...", "text": "..."}` per line).
    ///
    /// Blank lines are ignored; a malformed line or a repeated document
    /// number aborts the load.
    pub fn from_jsonl<P: AsRef<Path>>(path: P, tokenizer: &dyn Tokenizer) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut builder = MemoryIndex::builder();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: DocumentRecord = serde_json::from_str(&line).map_err(|e| {
                FeedrankError::index_access(format!(
                    "{}:{}: invalid document record: {e}",
                    path.display(),
                    line_num + 1
                ))
            })?;
            builder.add_document(record.doc_no, tokenizer.tokenize(&record.text)?)?;
        }

        let index = builder.build();
        log::info!(
            "Loaded {} documents ({} tokens) from {}",
            index.documents.len(),
            index.collection_length,
            path.display()
        );
        Ok(index)
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Iterate over the vocabulary in unspecified order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    fn stored(&self, doc_id: u64) -> Result<&StoredDocument> {
        usize::try_from(doc_id)
            .ok()
            .and_then(|idx| self.documents.get(idx))
            .ok_or_else(|| FeedrankError::not_found(format!("document id {doc_id}")))
    }
}

impl IndexReader for MemoryIndex {
    fn doc_id(&self, doc_no: &str) -> Result<u64> {
        self.doc_ids
            .get(doc_no)
            .copied()
            .ok_or_else(|| FeedrankError::not_found(format!("document {doc_no}")))
    }

    fn doc_no(&self, doc_id: u64) -> Result<String> {
        Ok(self.stored(doc_id)?.doc_no.clone())
    }

    fn doc_length(&self, doc_id: u64) -> Result<u64> {
        Ok(self.stored(doc_id)?.tokens.len() as u64)
    }

    fn collection_frequency(&self, token: &str) -> Result<u64> {
        Ok(self
            .postings
            .get(token)
            .map(PostingList::total_frequency)
            .unwrap_or(0))
    }

    fn collection_length(&self) -> Result<u64> {
        Ok(self.collection_length)
    }

    fn doc_frequency(&self, token: &str) -> Result<u64> {
        Ok(self
            .postings
            .get(token)
            .map(PostingList::doc_frequency)
            .unwrap_or(0))
    }

    fn doc_count(&self) -> Result<u64> {
        Ok(self.documents.len() as u64)
    }

    fn posting_list(&self, token: &str) -> Result<PostingList> {
        Ok(self
            .postings
            .get(token)
            .cloned()
            .unwrap_or_else(|| PostingList::new(token)))
    }

    fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    fn document_content(&self, doc: &DocRef) -> Result<Vec<String>> {
        let stored = self.stored(doc.doc_id)?;
        if stored.doc_no != doc.doc_no {
            return Err(FeedrankError::index_access(format!(
                "document id {} belongs to {}, not {}",
                doc.doc_id, stored.doc_no, doc.doc_no
            )));
        }
        Ok(stored.tokens.clone())
    }
}

/// Builder for [`MemoryIndex`].
///
/// Documents receive consecutive internal ids in insertion order.
#[derive(Debug, Default)]
pub struct MemoryIndexBuilder {
    index: MemoryIndex,
}

impl MemoryIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tokenized document and return its internal id.
    pub fn add_document<S: Into<String>>(&mut self, doc_no: S, tokens: Vec<String>) -> Result<u64> {
        let doc_no = doc_no.into();
        if self.index.doc_ids.contains_key(&doc_no) {
            return Err(FeedrankError::index_access(format!(
                "duplicate document number {doc_no}"
            )));
        }

        let doc_id = self.index.documents.len() as u64;
        let mut counts: AHashMap<&str, u64> = AHashMap::new();
        for token in &tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        for (token, count) in counts {
            self.index
                .postings
                .entry(token.to_string())
                .or_insert_with(|| PostingList::new(token))
                .add_occurrences(doc_id, count);
        }

        self.index.collection_length += tokens.len() as u64;
        self.index.doc_ids.insert(doc_no.clone(), doc_id);
        self.index.documents.push(StoredDocument { doc_no, tokens });
        Ok(doc_id)
    }

    /// Chainable variant of [`add_document`](Self::add_document) for
    /// whitespace-separated text.
    pub fn document(mut self, doc_no: &str, text: &str) -> Result<Self> {
        let tokens = text.split_whitespace().map(str::to_string).collect();
        self.add_document(doc_no, tokens)?;
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> MemoryIndex {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::analysis::tokenizer::WhitespaceTokenizer;

    fn sample_index() -> MemoryIndex {
        MemoryIndex::builder()
            .document("D1", "oil spill oil tanker")
            .unwrap()
            .document("D2", "gas pipeline")
            .unwrap()
            .document("D3", "oil price")
            .unwrap()
            .build()
    }

    #[test]
    fn test_statistics() {
        let index = sample_index();

        assert_eq!(index.doc_count().unwrap(), 3);
        assert_eq!(index.collection_length().unwrap(), 8);
        assert_eq!(index.collection_frequency("oil").unwrap(), 3);
        assert_eq!(index.doc_frequency("oil").unwrap(), 2);
        assert_eq!(index.collection_frequency("coal").unwrap(), 0);
        assert_eq!(index.doc_length(0).unwrap(), 4);
        assert_eq!(index.vocabulary_size(), 6);
        assert!((index.collection_probability("oil").unwrap() - 3.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_posting_lists() {
        let index = sample_index();
        let postings = index.posting_list("oil").unwrap();

        assert_eq!(postings.get(0), 2);
        assert_eq!(postings.get(1), 0);
        assert_eq!(postings.get(2), 1);
        assert!(index.posting_list("coal").unwrap().is_empty());
        assert!(index.contains_token("tanker"));
        assert!(!index.contains_token("coal"));
    }

    #[test]
    fn test_document_lookup() {
        let index = sample_index();
        let doc = index.doc_ref("D2").unwrap();

        assert_eq!(doc, DocRef::new("D2", 1));
        assert_eq!(index.doc_no(2).unwrap(), "D3");
        assert_eq!(index.document_content(&doc).unwrap(), vec!["gas", "pipeline"]);
        assert!(index.doc_id("D9").is_err());
        assert!(index.doc_length(42).is_err());
        assert!(index.document_content(&DocRef::new("D1", 2)).is_err());
    }

    #[test]
    fn test_duplicate_doc_no_rejected() {
        let result = MemoryIndex::builder()
            .document("D1", "a")
            .unwrap()
            .document("D1", "b");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_collection_probability_is_an_error() {
        let index = MemoryIndex::default();
        assert!(index.collection_probability("oil").is_err());
    }

    #[test]
    fn test_from_jsonl() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"doc_no": "FT1", "text": "oil spill"}}"#).unwrap();
        writeln!(file, r#"{{"doc_no": "FT2", "text": "oil"}}"#).unwrap();

        let index = MemoryIndex::from_jsonl(file.path(), &WhitespaceTokenizer::new()).unwrap();
        assert_eq!(index.doc_count().unwrap(), 2);
        assert_eq!(index.collection_frequency("oil").unwrap(), 2);
        assert_eq!(index.doc_id("FT2").unwrap(), 1);
    }
}
