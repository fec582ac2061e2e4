use crate::maze::Cell;

/// Which of the two distinguished cells a configuration problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

/// Reasons a grid, an endpoint or a wall edit is rejected before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidConfiguration {
    #[error("a {rows}x{cols} grid is too small to carve, both dimensions must be at least {min}")]
    GridTooSmall { rows: u16, cols: u16, min: u16 },
    #[error("cell {cell:?} is outside the {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: u16, cols: u16 },
    #[error("start and end must differ, both are {0:?}")]
    SameEndpoints(Cell),
    #[error("{endpoint} cell {cell:?} is a wall")]
    EndpointOnWall { endpoint: Endpoint, cell: Cell },
    #[error("cannot place a wall on the {endpoint} cell {cell:?}")]
    WallOnEndpoint { endpoint: Endpoint, cell: Cell },
    #[error("the {0} cell has not been set")]
    MissingEndpoint(Endpoint),
    #[error("walls of a generated maze cannot be edited")]
    ImmutableTopology,
    #[error("the grid needs at least two open cells to place start and end")]
    NoOpenCells,
    #[error("search state must be reset before running another search")]
    StaleSearchState,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfiguration),
    /// A search (or an edit) was requested while another search on the same engine is running.
    #[error("a search is already running on this engine")]
    ConcurrentRunConflict,
}

pub type Result<T> = std::result::Result<T, Error>;
