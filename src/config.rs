use std::{path::PathBuf, time::Duration};

use clap::Parser;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    engine::SearchEngine,
    error::{InvalidConfiguration, Result},
    generators::get_rng,
    maze::Cell,
    solvers::{Pacing, Solver},
};

/// Generate a maze (or paint walls on a blank grid) and watch a search find its way through it.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of grid rows
    #[arg(long, default_value_t = 41)]
    pub rows: u16,
    /// Number of grid columns
    #[arg(long, default_value_t = 41)]
    pub cols: u16,
    /// Search strategy
    #[arg(long, value_enum, default_value_t = Solver::GreedyBestFirst)]
    pub solver: Solver,
    /// Start from an all-open grid instead of a generated maze
    #[arg(long)]
    pub blank: bool,
    /// Wall cell as ROW,COL. Repeatable, blank grids only
    #[arg(long = "wall", value_name = "ROW,COL", value_parser = parse_cell, requires = "blank")]
    pub walls: Vec<Cell>,
    /// Start cell as ROW,COL. A random open cell when omitted
    #[arg(long, value_name = "ROW,COL", value_parser = parse_cell)]
    pub start: Option<Cell>,
    /// End cell as ROW,COL. A random open cell when omitted
    #[arg(long, value_name = "ROW,COL", value_parser = parse_cell)]
    pub end: Option<Cell>,
    /// Seed for maze carving and endpoint selection
    #[arg(long)]
    pub seed: Option<u64>,
    /// Pause between expansion steps, in milliseconds
    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,
    /// Run the search without pausing between steps
    #[arg(long)]
    pub no_pacing: bool,
    /// How often the display polls the search, in milliseconds
    #[arg(long, default_value_t = 30)]
    pub refresh_ms: u64,
    /// File the log is written to
    #[arg(long, default_value = "mazeroute.log")]
    pub log_file: PathBuf,
    /// Maximum log level
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

/// Parses `ROW,COL`.
pub fn parse_cell(s: &str) -> std::result::Result<Cell, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid coordinate '{}': {}", v.trim(), e))
    };
    Ok((parse(row)?, parse(col)?))
}

impl Config {
    pub fn pacing(&self) -> Pacing {
        Pacing::new(Duration::from_millis(self.delay_ms), !self.no_pacing)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(1))
    }

    /// Builds the engine described by this configuration: grid, walls and endpoints.
    pub fn build_engine(&self) -> Result<SearchEngine> {
        let mut rng = get_rng(self.seed);
        let engine = if self.blank {
            let engine = SearchEngine::blank(self.rows, self.cols);
            for &wall in &self.walls {
                engine.add_wall(wall)?;
            }
            engine
        } else {
            SearchEngine::generated(self.rows, self.cols, &mut rng)?
        };

        let open = engine.grid().open_cells().collect::<Vec<_>>();
        let start = match self.start {
            Some(cell) => cell,
            None => pick_open(&open, self.end, &mut rng)?,
        };
        let end = match self.end {
            Some(cell) => cell,
            None => pick_open(&open, Some(start), &mut rng)?,
        };
        engine.set_endpoints(start, end)?;
        tracing::info!(
            rows = self.rows,
            cols = self.cols,
            blank = self.blank,
            ?start,
            ?end,
            "engine configured"
        );
        Ok(engine)
    }
}

/// A random open cell other than `exclude`.
fn pick_open<R: Rng + ?Sized>(open: &[Cell], exclude: Option<Cell>, rng: &mut R) -> Result<Cell> {
    let candidates = open
        .iter()
        .copied()
        .filter(|&c| Some(c) != exclude)
        .collect::<Vec<_>>();
    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| InvalidConfiguration::NoOpenCells.into())
}
