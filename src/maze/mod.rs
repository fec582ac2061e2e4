pub mod cell;
mod grid;

pub use cell::{CellKind, Tile};
pub use grid::Grid;

/// A `(row, col)` coordinate, 0-indexed.
pub type Cell = (u16, u16);

/// Get neighbors of a cell.
/// A neighbor is considered a cell that is one step away in the cardinal directions
/// (up, down, left, right) and inside a `rows` x `cols` grid.
pub fn get_neighbors(cell: Cell, rows: u16, cols: u16) -> impl Iterator<Item = Cell> {
    get_neighbors_at(cell, 1, rows, cols)
}

/// Cells `step` positions away in the cardinal directions that fall inside the grid.
pub fn get_neighbors_at(
    cell: Cell,
    step: u16,
    rows: u16,
    cols: u16,
) -> impl Iterator<Item = Cell> {
    let (r, c) = cell;
    let in_bounds = move |&(nr, nc): &Cell| nr < rows && nc < cols;
    let neighbors: Vec<Cell> = if in_bounds(&cell) {
        vec![
            // NOTE: This way of handling underflow/overflow is overflow-safe.
            // When r < step or c < step, wrap the subtraction to u16::MAX and
            // filter it out in the bounds check.
            // When r + step or c + step exceeds u16::MAX, saturate it to u16::MAX,
            // which is never a valid index (the largest index possible is u16::MAX - 1).
            (r.checked_sub(step).unwrap_or(u16::MAX), c),
            (r.saturating_add(step), c),
            (r, c.checked_sub(step).unwrap_or(u16::MAX)),
            (r, c.saturating_add(step)),
        ]
    } else {
        // No neighbors if the coordinate is out of bounds
        vec![]
    };

    neighbors.into_iter().filter(in_bounds)
}

/// Manhattan distance between two cells.
pub fn manhattan(a: Cell, b: Cell) -> u32 {
    a.0.abs_diff(b.0) as u32 + a.1.abs_diff(b.1) as u32
}
