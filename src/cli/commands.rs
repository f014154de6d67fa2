//! Command implementations for the feedrank CLI.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::index::memory::MemoryIndex;
use crate::index::reader::IndexReader;
use crate::query::load_queries;
use crate::retrieval::{PseudoFeedbackModel, Ranking};

/// Execute a CLI command, writing results to stdout.
pub fn execute_command(args: FeedrankArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Search(search_args) => search_queries(search_args, &args, &mut out),
        Command::Stats(stats_args) => show_stats(stats_args, &args, &mut out),
    }
}

/// Run every query of the query file against the corpus.
pub fn search_queries<W: Write>(
    args: &SearchArgs,
    cli_args: &FeedrankArgs,
    out: &mut W,
) -> Result<()> {
    let start_time = Instant::now();
    let config = args.resolve_config()?;
    let tokenizer = WhitespaceTokenizer::new();

    let index = Arc::new(MemoryIndex::from_jsonl(&args.corpus, &tokenizer)?);
    let queries = load_queries(&args.queries, &tokenizer)?;
    log::info!("Running {} queries with {:?}", queries.len(), config);

    let model = PseudoFeedbackModel::new(index, config.clone())?;
    let mut diagnostics = 0;

    for query in &queries {
        log::info!("{}\t{}", query.topic_id(), query.tokens().join(" "));
        let ranking: Ranking = if args.no_feedback {
            let mut ranking = model.base_model().retrieve_query(query, config.top_k)?;
            ranking.results.truncate(config.top_n);
            ranking
        } else {
            model.retrieve(query)?
        };
        diagnostics += ranking.diagnostics.len();

        let lines = RunLine::from_ranking(query.topic_id(), &ranking, &args.run_tag);
        output_run(out, &lines, cli_args)?;
    }

    if diagnostics > 0 {
        log::warn!("{diagnostics} diagnostics raised during the run");
    }
    log::info!("query search time: {:?}", start_time.elapsed());
    Ok(())
}

/// Print collection statistics.
pub fn show_stats<W: Write>(args: &StatsArgs, cli_args: &FeedrankArgs, out: &mut W) -> Result<()> {
    let index = MemoryIndex::from_jsonl(&args.corpus, &WhitespaceTokenizer::new())?;

    let total_documents = index.doc_count()?;
    let collection_length = index.collection_length()?;
    let terms = args
        .terms
        .iter()
        .map(|term| {
            Ok(TermStats {
                term: term.clone(),
                collection_frequency: index.collection_frequency(term)?,
                document_frequency: index.doc_frequency(term)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let stats = CollectionStats {
        total_documents,
        collection_length,
        vocabulary_size: index.vocabulary_size(),
        average_document_length: if total_documents > 0 {
            collection_length as f64 / total_documents as f64
        } else {
            0.0
        },
        terms,
    };

    output_stats(out, &stats, cli_args)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn write_fixture(dir: &TempDir) -> (String, String) {
        let corpus = dir.path().join("corpus.jsonl");
        let queries = dir.path().join("queries.jsonl");
        fs::write(
            &corpus,
            concat!(
                r#"{"doc_no": "D1", "text": "oil spill oil coast"}"#,
                "\n",
                r#"{"doc_no": "D2", "text": "oil price market"}"#,
                "\n",
                r#"{"doc_no": "D3", "text": "market report"}"#,
                "\n",
            ),
        )
        .unwrap();
        fs::write(
            &queries,
            concat!(
                r#"{"topic_id": "901", "text": "oil OR spill"}"#,
                "\n",
                r#"{"topic_id": "902", "text": "market"}"#,
                "\n",
            ),
        )
        .unwrap();
        (
            corpus.to_string_lossy().to_string(),
            queries.to_string_lossy().to_string(),
        )
    }

    fn run(argv: &[&str]) -> String {
        let args = FeedrankArgs::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        match &args.command {
            Command::Search(search_args) => search_queries(search_args, &args, &mut out).unwrap(),
            Command::Stats(stats_args) => show_stats(stats_args, &args, &mut out).unwrap(),
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_search_writes_trec_run() {
        let dir = TempDir::new().unwrap();
        let (corpus, queries) = write_fixture(&dir);

        let output = run(&[
            "feedrank", "search", "--corpus", &corpus, "--queries", &queries, "-n", "5", "-k",
            "5",
        ]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("901 Q0 D1 1 "));
        assert!(lines[0].ends_with(" MYRUN"));
        assert!(lines[1].starts_with("901 Q0 D2 2 "));
        assert!(lines[2].starts_with("902 Q0 D"));
        assert_eq!(lines[2].split(' ').count(), 6);
    }

    #[test]
    fn test_search_without_feedback_respects_top_n() {
        let dir = TempDir::new().unwrap();
        let (corpus, queries) = write_fixture(&dir);

        let output = run(&[
            "feedrank",
            "search",
            "--corpus",
            &corpus,
            "--queries",
            &queries,
            "-n",
            "1",
            "--no-feedback",
            "--run-tag",
            "QL",
        ]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.ends_with(" QL")));
    }

    #[test]
    fn test_stats_json() {
        let dir = TempDir::new().unwrap();
        let (corpus, _) = write_fixture(&dir);

        let output = run(&[
            "feedrank", "--format", "json", "stats", "--corpus", &corpus, "--terms", "oil",
        ]);
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(value["total_documents"], 3);
        assert_eq!(value["collection_length"], 9);
        assert_eq!(value["terms"][0]["collection_frequency"], 3);
        assert_eq!(value["terms"][0]["document_frequency"], 2);
    }
}
