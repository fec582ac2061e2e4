use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::SliceRandom};

use crate::maze::{Cell, Grid, Tile, get_neighbors_at};

/// Cell every carve starts from.
pub const CARVE_ORIGIN: Cell = (1, 1);

/// Carves a perfect maze into `grid` with a randomized depth-first walk over the
/// lattice of cells two steps apart, starting from [`CARVE_ORIGIN`].
///
/// Every lattice cell is scheduled at most once and gets exactly one carving parent,
/// so the open cells form a spanning tree.
pub fn randomized_dfs<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    if !grid.in_bounds(CARVE_ORIGIN) {
        return;
    }
    let (rows, cols) = (grid.rows(), grid.cols());

    // Initialize the grid with walls
    grid.fill(Tile::Wall);

    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    // Cells already scheduled for carving, marked when pushed rather than when popped
    let mut closed: HashSet<Cell> = HashSet::from([CARVE_ORIGIN]);
    let mut stack = vec![CARVE_ORIGIN];

    while let Some(cell) = stack.pop() {
        grid.set(cell, Tile::Open);
        if let Some(&parent) = parents.get(&cell) {
            // Knock down the wall between the cell and the one it was reached from
            let between = ((parent.0 + cell.0) / 2, (parent.1 + cell.1) / 2);
            grid.set(between, Tile::Open);
        }

        let mut candidates = get_neighbors_at(cell, 2, rows, cols).collect::<Vec<_>>();
        candidates.shuffle(rng);
        for neighbor in candidates {
            if closed.insert(neighbor) {
                parents.insert(neighbor, cell);
                stack.push(neighbor);
            }
        }
    }
}
