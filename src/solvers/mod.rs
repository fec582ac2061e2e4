use std::time::Duration;

mod bfs;
mod dfs;
mod greedy;

use crate::{
    engine::{SearchEngine, SearchState},
    error::Result,
    maze::{Cell, Grid},
};

/// The three interchangeable search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Solver {
    /// Shortest route by edge count
    #[value(name = "bfs", alias = "breadth-first")]
    BreadthFirst,
    /// Some route, not necessarily the shortest
    #[value(name = "dfs", alias = "depth-first")]
    DepthFirst,
    /// Expands the cell closest to the end by Manhattan distance first
    #[value(name = "greedy", alias = "astar")]
    GreedyBestFirst,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::BreadthFirst => write!(f, "Breadth-First Search (BFS)"),
            Solver::DepthFirst => write!(f, "Depth-First Search (DFS)"),
            Solver::GreedyBestFirst => write!(f, "Greedy Best-First Search"),
        }
    }
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The end cell was finalized and the route reconstructed.
    RouteFound,
    /// The frontier emptied without reaching the end cell.
    NoRoute,
    /// The run was stopped through [`SearchEngine::cancel`].
    Cancelled,
}

impl Outcome {
    pub fn route_found(&self) -> bool {
        matches!(self, Outcome::RouteFound)
    }
}

/// Result of expanding a single frontier cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cell was finalized and its neighbors scheduled.
    Expanded(Cell),
    /// The end cell was finalized.
    Found,
    /// Nothing left to expand.
    Exhausted,
}

/// Wall-clock pacing between expansion steps. Never affects ordering or outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub enabled: bool,
    pub delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: Duration::from_millis(20),
        }
    }
}

impl Pacing {
    pub fn new(delay: Duration, enabled: bool) -> Self {
        Self { enabled, delay }
    }

    /// No pause at all between steps.
    pub const fn none() -> Self {
        Self {
            enabled: false,
            delay: Duration::ZERO,
        }
    }

    pub fn pause(&self) {
        if self.enabled && !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl Solver {
    /// Places `start` on an empty frontier.
    pub fn seed(self, state: &mut SearchState, start: Cell) {
        state.started = true;
        match self {
            Solver::BreadthFirst => bfs::seed(state, start),
            Solver::DepthFirst => dfs::seed(state, start),
            Solver::GreedyBestFirst => greedy::seed(state, start),
        }
    }

    /// Expands one frontier cell towards `end`.
    pub fn step(self, grid: &Grid, end: Cell, state: &mut SearchState) -> Step {
        match self {
            Solver::BreadthFirst => bfs::step(grid, end, state),
            Solver::DepthFirst => dfs::step(grid, end, state),
            Solver::GreedyBestFirst => greedy::step(grid, end, state),
        }
    }

    /// Runs this search on `engine`, see [`SearchEngine::run`].
    pub fn run(self, engine: &SearchEngine, pacing: &Pacing) -> Result<Outcome> {
        engine.run(self, pacing)
    }
}
