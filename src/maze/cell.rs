/// Wall/open classification of a single grid cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Open,
    Wall,
}

/// What an observer sees at a cell, at any moment of a search.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    /// Open space that no search has touched yet.
    #[default]
    Open,
    /// Discovered but not yet expanded.
    Frontier,
    /// Finalized by the running or finished search.
    Visited,
    /// Part of the reconstructed route.
    Route,
    Start,
    End,
}
