pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod solvers;

pub use engine::{SearchEngine, Snapshot, Topology};
pub use error::{Error, InvalidConfiguration, Result};
pub use maze::{Cell, CellKind, Grid, Tile};
pub use solvers::{Outcome, Pacing, Solver};
