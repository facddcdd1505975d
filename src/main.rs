use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tile_search::cli::Cli;
use tile_search::render::{write_outcome, write_stats};
use tile_search::SearchEngine;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = cli.config()?;
    let puzzle = cli.puzzle().context("could not load puzzle")?;

    let outcome = SearchEngine::new(config).run(puzzle);

    write_outcome(&mut io::stdout().lock(), &outcome, cli.output_style())?;

    if cli.stats {
        eprintln!("Search statistics ({}):", config.strategy);
        write_stats(&mut io::stderr().lock(), outcome.stats())?;
    }

    Ok(if outcome.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
