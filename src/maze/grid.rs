use super::{Cell, Tile};

/// Wall/open classification of every cell of a `rows` x `cols` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Tile]>,
    rows: u16,
    cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16, tile: Tile) -> Self {
        let data = vec![tile; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    /// An all-open grid, the starting point for manual wall painting.
    pub fn open(rows: u16, cols: u16) -> Self {
        Grid::new(rows, cols, Tile::Open)
    }

    /// An all-wall grid, the starting point for carving.
    pub fn walled(rows: u16, cols: u16) -> Self {
        Grid::new(rows, cols, Tile::Wall)
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.rows && cell.1 < self.cols
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self[cell] == Tile::Wall
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        !self.is_wall(cell)
    }

    fn ravel_index(&self, cell: Cell) -> usize {
        cell.0 as usize * self.cols as usize + cell.1 as usize
    }

    /// Sets the tile at `cell`. Returns `false` if `cell` is out of bounds.
    pub fn set(&mut self, cell: Cell, tile: Tile) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        let idx = self.ravel_index(cell);
        self.data[idx] = tile;
        true
    }

    pub fn fill(&mut self, tile: Tile) {
        self.data.fill(tile);
    }

    /// Turns every cell into open space.
    pub fn clear_walls(&mut self) {
        self.fill(Tile::Open);
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(move |&c| self[c] == Tile::Open)
    }

    /// Axis-aligned open neighbours of `cell`, in up, down, left, right order.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        super::get_neighbors(cell, self.rows, self.cols).filter(move |&c| self[c] == Tile::Open)
    }
}

impl std::ops::Index<Cell> for Grid {
    type Output = Tile;

    fn index(&self, index: Cell) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}
