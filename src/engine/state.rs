use std::collections::{HashMap, HashSet, VecDeque};

use crate::maze::Cell;

/// Per-run search bookkeeping shared by all solvers.
///
/// Created empty, filled by exactly one run, and cleared by [`SearchState::reset`].
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    /// Cells awaiting expansion. Queue, stack or heuristic-ordered list depending on the solver.
    pub(crate) frontier: VecDeque<Cell>,
    /// Membership shadow of `frontier`, maintained by breadth-first search only.
    pub(crate) frontier_set: HashSet<Cell>,
    pub(crate) visited: HashSet<Cell>,
    /// Cell each discovered cell was reached from. `start` never has an entry.
    pub(crate) parent: HashMap<Cell, Cell>,
    /// Edges from `start` along the best known path, maintained by greedy best-first search.
    pub(crate) cost_so_far: HashMap<Cell, u32>,
    /// End to start, empty unless a route was found.
    pub(crate) route: Vec<Cell>,
    pub(crate) route_found: bool,
    /// Set once a solver has been seeded into this state.
    pub(crate) started: bool,
}

impl SearchState {
    /// Replaces every container with a new empty one.
    pub fn reset(&mut self) {
        *self = SearchState::default();
    }

    pub fn is_fresh(&self) -> bool {
        !self.started
    }

    pub fn frontier(&self) -> impl Iterator<Item = Cell> + '_ {
        self.frontier.iter().copied()
    }

    pub fn in_frontier(&self, cell: Cell) -> bool {
        self.frontier.contains(&cell)
    }

    pub fn visited(&self) -> &HashSet<Cell> {
        &self.visited
    }

    pub fn parent_of(&self, cell: Cell) -> Option<Cell> {
        self.parent.get(&cell).copied()
    }

    pub fn route(&self) -> &[Cell] {
        &self.route
    }

    pub fn route_found(&self) -> bool {
        self.route_found
    }

    /// Marks the route as found and rebuilds it from the parent links.
    pub(crate) fn finish(&mut self, start: Cell, end: Cell) {
        self.route = self.reconstruct_route(start, end);
        self.route_found = true;
    }

    /// Walks parent links back from `end` to `start`, producing the route end first.
    ///
    /// Stops early if the chain is broken, which cannot happen once `end` was finalized.
    pub fn reconstruct_route(&self, start: Cell, end: Cell) -> Vec<Cell> {
        std::iter::successors(Some(end), |&cell| {
            if cell == start {
                None
            } else {
                self.parent_of(cell)
            }
        })
        .collect()
    }
}
