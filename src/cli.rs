//! Command-line arguments and puzzle loading

use crate::error::{Error, Result};
use crate::puzzle::{CostModel, TileSequence};
use crate::render::OutputStyle;
use crate::search::{SearchConfig, Strategy};
use clap::Parser;
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "tile-search")]
#[command(version, about = "Solve the black/white sliding-tile puzzle", long_about = None)]
pub struct Cli {
    /// Use the furthest-move-optimal cost weights and print per-step costs
    #[arg(long)]
    pub cost: bool,

    /// Search type: BFS, DFS, UCS, GS or A-star
    pub search_type: String,

    /// File containing the initial puzzle, e.g. "wbxw"
    #[arg(required_unless_present = "random", conflicts_with = "random")]
    pub input_file: Option<PathBuf>,

    /// Generate a random puzzle with the given tile counts instead of reading a file
    #[arg(long, value_name = "BLACKS,WHITES")]
    pub random: Option<String>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,

    /// Give up after expanding this many states (at least 1)
    #[arg(long)]
    pub max_expansions: Option<NonZeroUsize>,

    /// Give up after this many milliseconds
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Colorize the tiles in the printed path
    #[arg(long, conflicts_with = "json")]
    pub color: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Print search statistics to stderr
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// Builds the search configuration, rejecting unknown search types.
    pub fn config(&self) -> Result<SearchConfig> {
        let strategy: Strategy = self.search_type.parse()?;
        let cost_model = if self.cost {
            CostModel::Weighted
        } else {
            CostModel::Uniform
        };

        let mut config = SearchConfig::new(strategy)
            .with_cost_model(cost_model)
            .with_cost_reporting(self.cost);
        if let Some(max) = self.max_expansions {
            config = config.with_max_expansions(max);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        Ok(config)
    }

    pub fn output_style(&self) -> OutputStyle {
        if self.json {
            OutputStyle::Json
        } else if self.color {
            OutputStyle::Color
        } else {
            OutputStyle::Plain
        }
    }

    /// The validated initial state, read from the input file or generated.
    pub fn puzzle(&self) -> Result<TileSequence> {
        if let Some(counts) = &self.random {
            let (blacks, whites) = parse_tile_counts(counts)?;
            let puzzle = match self.seed {
                Some(seed) => TileSequence::random(blacks, whites, &mut StdRng::seed_from_u64(seed)),
                None => TileSequence::random(blacks, whites, &mut thread_rng()),
            };
            return Ok(puzzle);
        }

        match &self.input_file {
            Some(path) => load_puzzle(path),
            None => Err(Error::Io {
                operation: "read puzzle".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no input file given"),
            }),
        }
    }
}

/// Reads a puzzle file, trims surrounding whitespace and validates it.
pub fn load_puzzle(path: &Path) -> Result<TileSequence> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read puzzle file '{}'", path.display()),
        source,
    })?;

    TileSequence::parse(text.trim())
}

/// Parses `BLACKS,WHITES`.
pub fn parse_tile_counts(counts: &str) -> Result<(usize, usize)> {
    let invalid = || Error::InvalidTileCounts {
        counts: counts.to_string(),
    };

    let (blacks, whites) = counts.split_once(',').ok_or_else(invalid)?;
    let blacks = blacks.trim().parse().map_err(|_| invalid())?;
    let whites = whites.trim().parse().map_err(|_| invalid())?;
    Ok((blacks, whites))
}
