//! Posting lists: per-term mappings from document id to occurrence count.

use serde::{Deserialize, Serialize};

/// A single posting in a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Document ID.
    pub doc_id: u64,
    /// Term frequency in the document.
    pub frequency: u64,
}

impl Posting {
    /// Create a posting with frequency.
    pub fn with_frequency(doc_id: u64, frequency: u64) -> Self {
        Posting { doc_id, frequency }
    }
}

/// A posting list for a specific term.
///
/// Postings are kept sorted by document id, which also fixes the order in
/// which candidate documents are first seen during retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    /// The term this posting list represents.
    pub term: String,
    /// The postings in this list.
    pub postings: Vec<Posting>,
}

impl PostingList {
    /// Create a new empty posting list.
    pub fn new<S: Into<String>>(term: S) -> Self {
        PostingList {
            term: term.into(),
            postings: Vec::new(),
        }
    }

    /// Build a posting list from `(doc_id, frequency)` pairs in any order.
    ///
    /// Pairs for the same document are merged.
    pub fn from_pairs<S, I>(term: S, pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut list = PostingList::new(term);
        for (doc_id, frequency) in pairs {
            list.add_occurrences(doc_id, frequency);
        }
        list
    }

    /// Add `frequency` occurrences of the term in `doc_id`.
    pub fn add_occurrences(&mut self, doc_id: u64, frequency: u64) {
        match self.postings.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(pos) => self.postings[pos].frequency += frequency,
            Err(pos) => self
                .postings
                .insert(pos, Posting::with_frequency(doc_id, frequency)),
        }
    }

    /// Occurrence count of the term in `doc_id`, or 0 when absent.
    pub fn get(&self, doc_id: u64) -> u64 {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .map(|pos| self.postings[pos].frequency)
            .unwrap_or(0)
    }

    /// Iterate postings in ascending document id order.
    pub fn iter(&self) -> impl Iterator<Item = &Posting> {
        self.postings.iter()
    }

    /// Number of documents containing the term.
    pub fn doc_frequency(&self) -> u64 {
        self.postings.len() as u64
    }

    /// Total occurrences of the term across the listed documents.
    pub fn total_frequency(&self) -> u64 {
        self.postings.iter().map(|p| p.frequency).sum()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
