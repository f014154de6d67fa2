//! feedrank CLI binary.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;

use feedrank::VERSION;
use feedrank::cli::args::{Command, FeedrankArgs};
use feedrank::cli::commands::execute_command;

fn main() -> anyhow::Result<()> {
    let args = FeedrankArgs::parse();

    // Logs go to stderr so a run on stdout stays clean for trec_eval.
    Builder::new()
        .filter_level(args.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    log::debug!("feedrank {VERSION}");

    let action = match &args.command {
        Command::Search(search) => format!("search over {}", search.corpus.display()),
        Command::Stats(stats) => format!("stats for {}", stats.corpus.display()),
    };
    execute_command(args).with_context(|| format!("{action} failed"))
}
