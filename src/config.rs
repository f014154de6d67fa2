//! Retrieval configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::skip::{DEFAULT_SKIP_TOKENS, SkipFilter};
use crate::error::{FeedrankError, Result};
use crate::scoring::dirichlet::{DEFAULT_MU, DirichletSmoothing};

/// Default number of results returned per query.
pub const DEFAULT_TOP_N: usize = 20;

/// Default number of feedback documents.
pub const DEFAULT_TOP_K: usize = 100;

/// Default weight of the original score in the feedback mixture.
pub const DEFAULT_ALPHA: f64 = 0.4;

/// Parameters for query-likelihood retrieval with pseudo-relevance feedback.
///
/// # Example
///
/// ```
/// use feedrank::config::RetrievalConfig;
///
/// let config = RetrievalConfig::builder()
///     .mu(1000.0)
///     .top_k(50)
///     .alpha(0.6)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.top_n, 20);
/// assert_eq!(config.skip_tokens, vec!["OR".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Dirichlet prior strength.
    pub mu: f64,

    /// Maximum number of documents returned.
    pub top_n: usize,

    /// Number of feedback documents taken from the initial ranking.
    pub top_k: usize,

    /// Weight of the original per-token score; `1 - alpha` goes to the
    /// feedback score.
    pub alpha: f64,

    /// Query tokens that are operators rather than terms.
    pub skip_tokens: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            mu: DEFAULT_MU,
            top_n: DEFAULT_TOP_N,
            top_k: DEFAULT_TOP_K,
            alpha: DEFAULT_ALPHA,
            skip_tokens: DEFAULT_SKIP_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::new()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The result is validated.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RetrievalConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<()> {
        DirichletSmoothing::new(self.mu)?;
        validate_alpha(self.alpha)?;
        validate_top_k(self.top_k)?;
        Ok(())
    }

    /// Smoothing parameters derived from `mu`.
    pub fn smoothing(&self) -> Result<DirichletSmoothing> {
        DirichletSmoothing::new(self.mu)
    }

    /// Skip filter built from `skip_tokens`.
    pub fn skip_filter(&self) -> SkipFilter {
        SkipFilter::new(self.skip_tokens.iter().cloned())
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(FeedrankError::configuration(format!(
            "alpha must lie in [0, 1], got {alpha}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_top_k(top_k: usize) -> Result<()> {
    if top_k < 1 {
        return Err(FeedrankError::configuration(
            "top_k must be at least 1 for pseudo-relevance feedback",
        ));
    }
    Ok(())
}

/// Builder for [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Dirichlet prior strength.
    pub fn mu(mut self, mu: f64) -> Self {
        self.config.mu = mu;
        self
    }

    /// Set the number of returned documents.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Set the number of feedback documents.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the original-score weight.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Replace the skip list.
    pub fn skip_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<RetrievalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
