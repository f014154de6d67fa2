//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{FeedrankArgs, OutputFormat};
use crate::error::Result;
use crate::retrieval::Ranking;

/// One ranked document of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLine {
    pub topic_id: String,
    pub doc_no: String,
    pub rank: usize,
    pub score: f64,
    pub run_tag: String,
}

impl RunLine {
    /// Build the run lines of one query, ranks starting at 1.
    pub fn from_ranking(topic_id: &str, ranking: &Ranking, run_tag: &str) -> Vec<RunLine> {
        ranking
            .iter()
            .enumerate()
            .map(|(i, result)| RunLine {
                topic_id: topic_id.to_string(),
                doc_no: result.doc.doc_no.clone(),
                rank: i + 1,
                score: result.score,
                run_tag: run_tag.to_string(),
            })
            .collect()
    }

    /// Format as a trec_eval run line.
    pub fn to_trec(&self) -> String {
        format!(
            "{} Q0 {} {} {} {}",
            self.topic_id, self.doc_no, self.rank, self.score, self.run_tag
        )
    }
}

/// Collection-level statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total_documents: u64,
    pub collection_length: u64,
    pub vocabulary_size: usize,
    pub average_document_length: f64,
    pub terms: Vec<TermStats>,
}

/// Statistics of one requested term.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermStats {
    pub term: String,
    pub collection_frequency: u64,
    pub document_frequency: u64,
}

/// Write the run lines of one query.
pub fn output_run<W: Write>(out: &mut W, lines: &[RunLine], args: &FeedrankArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Trec => {
            for line in lines {
                writeln!(out, "{}", line.to_trec())?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            for line in lines {
                writeln!(out, "{}", serde_json::to_string(line)?)?;
            }
            Ok(())
        }
    }
}

/// Write collection statistics.
pub fn output_stats<W: Write>(
    out: &mut W,
    stats: &CollectionStats,
    args: &FeedrankArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(out, stats, args),
        OutputFormat::Trec => {
            writeln!(out, "Documents:          {}", stats.total_documents)?;
            writeln!(out, "Collection length:  {}", stats.collection_length)?;
            writeln!(out, "Vocabulary size:    {}", stats.vocabulary_size)?;
            writeln!(out, "Avg. doc length:    {:.2}", stats.average_document_length)?;
            if !stats.terms.is_empty() {
                writeln!(out)?;
                writeln!(out, "{:<20} {:>10} {:>10}", "Term", "CF", "DF")?;
                for term in &stats.terms {
                    writeln!(
                        out,
                        "{:<20} {:>10} {:>10}",
                        term.term, term.collection_frequency, term.document_frequency
                    )?;
                }
            }
            Ok(())
        }
    }
}

fn output_json<W: Write, T: Serialize>(
    out: &mut W,
    result: &T,
    args: &FeedrankArgs,
) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::index::reader::DocRef;
    use crate::retrieval::ScoredResult;

    fn args(format: &str) -> FeedrankArgs {
        FeedrankArgs::try_parse_from(["feedrank", "--format", format, "stats", "--corpus", "c"])
            .unwrap()
    }

    fn ranking() -> Ranking {
        Ranking {
            results: vec![
                ScoredResult::new(DocRef::new("FT911-1", 0), 0.5),
                ScoredResult::new(DocRef::new("FT911-7", 6), 0.25),
            ],
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_trec_run_lines() {
        let lines = RunLine::from_ranking("901", &ranking(), "MYRUN");
        let mut out = Vec::new();
        output_run(&mut out, &lines, &args("trec")).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "901 Q0 FT911-1 1 0.5 MYRUN\n901 Q0 FT911-7 2 0.25 MYRUN\n"
        );
    }

    #[test]
    fn test_json_run_lines() {
        let lines = RunLine::from_ranking("901", &ranking(), "tag");
        let mut out = Vec::new();
        output_run(&mut out, &lines, &args("json")).unwrap();

        let text = String::from_utf8(out).unwrap();
        let first: RunLine = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first, lines[0]);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_stats_plain_text() {
        let stats = CollectionStats {
            total_documents: 2,
            collection_length: 20,
            vocabulary_size: 12,
            average_document_length: 10.0,
            terms: vec![TermStats {
                term: "oil".to_string(),
                collection_frequency: 6,
                document_frequency: 2,
            }],
        };
        let mut out = Vec::new();
        output_stats(&mut out, &stats, &args("trec")).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Documents:          2"));
        assert!(text.contains("Avg. doc length:    10.00"));
        assert!(text.lines().last().unwrap().starts_with("oil"));
    }
}
