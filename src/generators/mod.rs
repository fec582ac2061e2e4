use rand::{Rng, SeedableRng, rngs::StdRng};

mod dfs;

pub use dfs::CARVE_ORIGIN;
use dfs::randomized_dfs;

use crate::{
    error::{InvalidConfiguration, Result},
    maze::{Grid, Tile},
};

/// Smallest number of rows and columns a maze can be carved into.
pub const MIN_MAZE_SIZE: u16 = 3;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Generates a perfect maze over a `rows` x `cols` grid.
///
/// Open cells form a tree: there is exactly one simple path between any two of them.
/// The same `rng` state always produces the same maze.
pub fn generate_maze<R: Rng + ?Sized>(rows: u16, cols: u16, rng: &mut R) -> Result<Grid> {
    if rows < MIN_MAZE_SIZE || cols < MIN_MAZE_SIZE {
        return Err(InvalidConfiguration::GridTooSmall {
            rows,
            cols,
            min: MIN_MAZE_SIZE,
        }
        .into());
    }

    let mut grid = Grid::walled(rows, cols);
    randomized_dfs(&mut grid, rng);
    tracing::debug!(rows, cols, open = grid.open_cells().count(), "carved maze");
    Ok(grid)
}

/// Number of edges between horizontally or vertically adjacent cells of the given tile.
fn count_adjacent_pairs(grid: &Grid, tile: Tile) -> usize {
    grid.cells()
        .filter(|&c| grid[c] == tile)
        .map(|(r, c)| {
            [(r + 1, c), (r, c + 1)]
                .into_iter()
                .filter(|&n| grid.in_bounds(n) && grid[n] == tile)
                .count()
        })
        .sum()
}

/// Whether the open cells of `grid` form a single tree.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let open = grid.open_cells().collect::<Vec<_>>();
    let Some(&first) = open.first() else {
        return false;
    };

    // Connected
    let mut seen = std::collections::HashSet::from([first]);
    let mut stack = vec![first];
    while let Some(cell) = stack.pop() {
        for n in grid.open_neighbors(cell) {
            if seen.insert(n) {
                stack.push(n);
            }
        }
    }

    // A connected graph with n - 1 edges is acyclic
    seen.len() == open.len() && count_adjacent_pairs(grid, Tile::Open) == open.len() - 1
}
