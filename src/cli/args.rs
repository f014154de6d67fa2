//! Command line argument parsing for the feedrank CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::error::Result;

/// feedrank - query likelihood retrieval with pseudo-relevance feedback
#[derive(Parser, Debug, Clone)]
#[command(name = "feedrank")]
#[command(about = "Rank documents by query likelihood refined with pseudo-relevance feedback")]
#[command(version = crate::VERSION)]
#[command(long_about = None)]
pub struct FeedrankArgs {
    /// Log more (-v: progress, -vv: per-query detail, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the run only, with no log output (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "trec")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FeedrankArgs {
    /// Log level selected by `-q` and the `-v` count.
    ///
    /// Diagnostics are logged as warnings, so they show by default.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run every query of a query file and print a ranked run
    Search(SearchArgs),

    /// Show collection statistics
    Stats(StatsArgs),
}

/// Arguments for a batch retrieval run
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Corpus file (JSON Lines, one {"doc_no", "text"} object per line)
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: PathBuf,

    /// Query file (JSON Lines, one {"topic_id", "text"} object per line)
    #[arg(long, value_name = "QUERY_FILE")]
    pub queries: PathBuf,

    /// Retrieval configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Number of results per query
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Number of feedback documents
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Weight of the original score in the feedback mixture
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Dirichlet prior strength
    #[arg(long)]
    pub mu: Option<f64>,

    /// Run tag written in the last column
    #[arg(long, default_value = "MYRUN")]
    pub run_tag: String,

    /// Rank with query likelihood only, skipping feedback
    #[arg(long)]
    pub no_feedback: bool,
}

impl SearchArgs {
    /// Build the retrieval configuration: file values first, then flags.
    pub fn resolve_config(&self) -> Result<RetrievalConfig> {
        let mut config = match &self.config {
            Some(path) => RetrievalConfig::from_json_file(path)?,
            None => RetrievalConfig::default(),
        };
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(mu) = self.mu {
            config.mu = mu;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Arguments for collection statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Corpus file (JSON Lines, one {"doc_no", "text"} object per line)
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: PathBuf,

    /// Terms to report collection and document frequency for (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub terms: Vec<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// trec_eval run lines (plain text for stats)
    Trec,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command() {
        let args = FeedrankArgs::try_parse_from([
            "feedrank",
            "search",
            "--corpus",
            "docs.jsonl",
            "--queries",
            "topics.jsonl",
            "-n",
            "10",
            "-k",
            "50",
            "--alpha",
            "0.6",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.corpus, PathBuf::from("docs.jsonl"));
            assert_eq!(search_args.top_n, Some(10));
            assert_eq!(search_args.top_k, Some(50));
            assert_eq!(search_args.alpha, Some(0.6));
            assert_eq!(search_args.run_tag, "MYRUN");
            assert!(!search_args.no_feedback);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_resolve_config_overrides_defaults() {
        let args = FeedrankArgs::try_parse_from([
            "feedrank",
            "search",
            "--corpus",
            "docs.jsonl",
            "--queries",
            "topics.jsonl",
            "--mu",
            "1000",
            "-k",
            "10",
        ])
        .unwrap();

        let Command::Search(search_args) = args.command else {
            panic!("Expected Search command");
        };
        let config = search_args.resolve_config().unwrap();
        assert_eq!(config.mu, 1000.0);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.top_n, 20);
    }

    #[test]
    fn test_resolve_config_rejects_bad_alpha() {
        let args = FeedrankArgs::try_parse_from([
            "feedrank",
            "search",
            "--corpus",
            "docs.jsonl",
            "--queries",
            "topics.jsonl",
            "--alpha",
            "3",
        ])
        .unwrap();

        let Command::Search(search_args) = args.command else {
            panic!("Expected Search command");
        };
        assert!(search_args.resolve_config().unwrap_err().is_configuration());
    }

    #[test]
    fn test_stats_command() {
        let args = FeedrankArgs::try_parse_from([
            "feedrank",
            "stats",
            "--corpus",
            "docs.jsonl",
            "--terms",
            "oil,spill",
        ])
        .unwrap();

        if let Command::Stats(stats_args) = args.command {
            assert_eq!(stats_args.terms, vec!["oil", "spill"]);
        } else {
            panic!("Expected Stats command");
        }
    }

    #[test]
    fn test_log_levels() {
        let level = |flags: &[&str]| {
            let mut argv = vec!["feedrank"];
            argv.extend_from_slice(flags);
            argv.extend_from_slice(&["stats", "--corpus", "c"]);
            FeedrankArgs::try_parse_from(argv).unwrap().log_level()
        };

        assert_eq!(level(&[]), LevelFilter::Warn);
        assert_eq!(level(&["-v"]), LevelFilter::Info);
        assert_eq!(level(&["-vv"]), LevelFilter::Debug);
        assert_eq!(level(&["-vvvv"]), LevelFilter::Trace);
        assert_eq!(level(&["-q", "-vv"]), LevelFilter::Off);
    }

    #[test]
    fn test_output_format() {
        let args =
            FeedrankArgs::try_parse_from(["feedrank", "--format", "json", "stats", "--corpus", "c"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
