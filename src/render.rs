//! Text, colored and JSON output for search outcomes

use crate::error::{Error, Result};
use crate::puzzle::{Tile, TileSequence};
use crate::search::{Outcome, SearchStats, Step};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Plain,
    Color,
    Json,
}

pub fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Black => Color::DarkGrey,
        Tile::White => Color::White,
        Tile::Blank => Color::Yellow,
    }
}

fn write_error(source: std::io::Error) -> Error {
    Error::Io {
        operation: "write output".to_string(),
        source,
    }
}

fn write_tiles<W: Write>(out: &mut W, state: &TileSequence) -> std::io::Result<()> {
    for &tile in state.tiles() {
        queue!(out, SetForegroundColor(tile_color(tile)), Print(tile.as_char()))?;
    }
    queue!(out, ResetColor)
}

fn write_colored_step<W: Write>(out: &mut W, step: &Step) -> std::io::Result<()> {
    match step.move_index {
        None => queue!(out, Print(format!("Step {}: ", step.index)))?,
        Some(index) => queue!(out, Print(format!("Step {}: move {} ", step.index, index)))?,
    }
    write_tiles(out, &step.state)?;
    if let Some(cost) = step.cost {
        queue!(
            out,
            SetForegroundColor(Color::Cyan),
            Print(format!(" (c={})", cost)),
            ResetColor
        )?;
    }
    queue!(out, Print("\n"))
}

/// Writes the solution path or the failure message for `outcome`.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome, style: OutputStyle) -> Result<()> {
    match (style, outcome) {
        (OutputStyle::Json, _) => {
            serde_json::to_writer_pretty(&mut *out, outcome)?;
            writeln!(out).map_err(write_error)?;
        }
        (OutputStyle::Plain, Outcome::Solved(solution)) => {
            for step in &solution.steps {
                writeln!(out, "{}", step).map_err(write_error)?;
            }
        }
        (OutputStyle::Color, Outcome::Solved(solution)) => {
            for step in &solution.steps {
                write_colored_step(out, step).map_err(write_error)?;
            }
        }
        (OutputStyle::Plain, Outcome::Exhausted(exhaustion)) => {
            writeln!(out, "No solution found: {}", exhaustion.reason).map_err(write_error)?;
        }
        (OutputStyle::Color, Outcome::Exhausted(exhaustion)) => {
            queue!(
                out,
                SetForegroundColor(Color::Red),
                Print(format!("No solution found: {}\n", exhaustion.reason)),
                ResetColor
            )
            .map_err(write_error)?;
        }
    }

    out.flush().map_err(write_error)
}

/// Writes run statistics as aligned key/value lines.
pub fn write_stats<W: Write>(out: &mut W, stats: &SearchStats) -> Result<()> {
    let rows = [
        ("Expanded", stats.expanded.to_string()),
        ("Generated", stats.generated.to_string()),
        ("Skipped", stats.skipped.to_string()),
        ("Max frontier", stats.max_frontier.to_string()),
        ("Elapsed", format!("{:.3} ms", stats.elapsed.as_secs_f64() * 1000.0)),
    ];

    for (key, value) in rows {
        writeln!(out, "  {:20} {}", format!("{}:", key), value).map_err(write_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchConfig, SearchEngine, Strategy};

    fn render(puzzle: &str, config: SearchConfig, style: OutputStyle) -> String {
        let outcome = SearchEngine::new(config).run(puzzle.parse().unwrap());
        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome, style).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_solution() {
        let config = SearchConfig::new(Strategy::BreadthFirst).with_cost_reporting(true);
        let text = render("wbxw", config, OutputStyle::Plain);
        assert_eq!(
            text,
            "Step 0: wbxw\nStep 1: move 0 xbww (c=2)\nStep 2: move 1 bxww (c=1)\n"
        );
    }

    #[test]
    fn test_plain_exhaustion() {
        let text = render("xw", SearchConfig::new(Strategy::UniformCost), OutputStyle::Plain);
        assert_eq!(text, "No solution found: every reachable state was explored\n");
    }

    #[test]
    fn test_colored_solution_keeps_step_text() {
        let text = render("bxw", SearchConfig::new(Strategy::AStar), OutputStyle::Color);
        assert!(text.starts_with("Step 0: "));
        assert!(text.contains('\u{1b}'));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_json_outcome() {
        let text = render("xbw", SearchConfig::new(Strategy::Greedy), OutputStyle::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["outcome"], "solved");
        assert_eq!(value["strategy"], "greedy");
        assert_eq!(value["steps"][0]["state"], "xbw");
        assert_eq!(value["steps"][1]["state"], "bxw");
        assert_eq!(value["steps"][1]["move_index"], 1);
    }

    #[test]
    fn test_json_exhaustion() {
        let config = SearchConfig::new(Strategy::DepthFirst)
            .with_max_expansions(std::num::NonZeroUsize::new(2).unwrap());
        let text = render("wwbbx", config, OutputStyle::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["outcome"], "exhausted");
        assert_eq!(value["reason"]["kind"], "expansion_limit");
        assert_eq!(value["reason"]["max"], 2);
    }

    #[test]
    fn test_stats_layout() {
        let stats = SearchStats {
            expanded: 12,
            generated: 30,
            ..SearchStats::default()
        };
        let mut buf = Vec::new();
        write_stats(&mut buf, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("  Expanded:            12\n"));
        assert!(text.contains("  Generated:           30\n"));
    }
}
