use super::state::SearchState;
use crate::{
    maze::{Cell, CellKind, Grid, Tile},
    solvers::Outcome,
};

/// Point-in-time classification of every cell, taken under one read lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    cells: Box<[CellKind]>,
    rows: u16,
    cols: u16,
    /// Whether a search was still running when the snapshot was taken
    pub running: bool,
    pub route_found: bool,
    /// How the last run ended, `None` while running or before any run
    pub outcome: Option<Outcome>,
}

impl Snapshot {
    /// Layers search state over the grid. Later layers win:
    /// wall/open, frontier, visited, route, start, end.
    pub(crate) fn capture(
        grid: &Grid,
        state: &SearchState,
        start: Option<Cell>,
        end: Option<Cell>,
        running: bool,
        outcome: Option<Outcome>,
    ) -> Self {
        let (rows, cols) = (grid.rows(), grid.cols());
        let mut cells = grid
            .cells()
            .map(|c| match grid[c] {
                Tile::Wall => CellKind::Wall,
                Tile::Open => CellKind::Open,
            })
            .collect::<Box<[_]>>();
        let idx = |(r, c): Cell| r as usize * cols as usize + c as usize;

        state
            .frontier()
            .for_each(|c| cells[idx(c)] = CellKind::Frontier);
        state
            .visited()
            .iter()
            .for_each(|&c| cells[idx(c)] = CellKind::Visited);
        state
            .route()
            .iter()
            .for_each(|&c| cells[idx(c)] = CellKind::Route);
        if let Some(c) = start {
            cells[idx(c)] = CellKind::Start;
        }
        if let Some(c) = end {
            cells[idx(c)] = CellKind::End;
        }

        Snapshot {
            cells,
            rows,
            cols,
            running,
            route_found: state.route_found(),
            outcome,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<CellKind> {
        (cell.0 < self.rows && cell.1 < self.cols)
            .then(|| self.cells[cell.0 as usize * self.cols as usize + cell.1 as usize])
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }
}
