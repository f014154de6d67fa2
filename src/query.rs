//! Tokenized queries and query-set loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::error::{FeedrankError, Result};

/// An immutable tokenized query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    topic_id: String,
    tokens: Vec<String>,
}

impl Query {
    /// Create a query from already tokenized content.
    pub fn new<S: Into<String>>(topic_id: S, tokens: Vec<String>) -> Self {
        Query {
            topic_id: topic_id.into(),
            tokens,
        }
    }

    /// Tokenize `text` and build a query from it.
    pub fn parse<S: Into<String>>(
        topic_id: S,
        text: &str,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Self> {
        Ok(Query::new(topic_id, tokenizer.tokenize(text)?))
    }

    /// Get the topic identifier.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Get the query tokens in their original order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the query carries no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One line of a query file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Topic identifier echoed in run output.
    pub topic_id: String,
    /// Raw query text.
    pub text: String,
}

/// Load a JSON Lines query file (`{"topic_id": "...", "text": "..."}` per line).
///
/// Blank lines are ignored.
pub fn load_queries<P: AsRef<Path>>(path: P, tokenizer: &dyn Tokenizer) -> Result<Vec<Query>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut queries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: QueryRecord = serde_json::from_str(&line).map_err(|e| {
            FeedrankError::query(format!(
                "{}:{}: invalid query record: {e}",
                path.display(),
                line_num + 1
            ))
        })?;
        queries.push(Query::parse(record.topic_id, &record.text, tokenizer)?);
    }

    Ok(queries)
}
