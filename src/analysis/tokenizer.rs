//! Tokenizers that turn raw text into token streams.

use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync + std::fmt::Debug {
    /// Tokenize the given text into an ordered sequence of tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens = tokenizer.tokenize("  hello\tworld \n test ").unwrap();

        assert_eq!(tokens, vec!["hello", "world", "test"]);
        assert_eq!(tokenizer.name(), "whitespace");
    }

    #[test]
    fn test_whitespace_tokenizer_keeps_case_and_duplicates() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens = tokenizer.tokenize("Oil OR oil").unwrap();

        assert_eq!(tokens, vec!["Oil", "OR", "oil"]);
    }

    #[test]
    fn test_whitespace_tokenizer_empty() {
        let tokenizer = WhitespaceTokenizer::new();
        assert!(tokenizer.tokenize("   ").unwrap().is_empty());
    }
}
