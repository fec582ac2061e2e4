mod snapshot;
mod state;

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
};

use parking_lot::RwLock;
use rand::{Rng, seq::IndexedRandom};

pub use snapshot::Snapshot;
pub use state::SearchState;

use crate::{
    error::{Endpoint, Error, InvalidConfiguration, Result},
    generators::generate_maze,
    maze::{Cell, CellKind, Grid, Tile},
    solvers::{Outcome, Pacing, Solver, Step},
};

/// Whether the walls of an engine's grid may be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Carved by the maze generator, walls are fixed.
    Generated,
    /// Painted by hand, walls may be added and removed between searches.
    Editable,
}

struct Inner {
    grid: Grid,
    topology: Topology,
    start: Option<Cell>,
    end: Option<Cell>,
    state: SearchState,
    /// How the last run ended, cleared with the search state
    outcome: Option<Outcome>,
}

impl Inner {
    fn check_in_bounds(&self, cell: Cell) -> Result<()> {
        if self.grid.in_bounds(cell) {
            Ok(())
        } else {
            Err(InvalidConfiguration::OutOfBounds {
                cell,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            }
            .into())
        }
    }

    /// `other` is the opposite endpoint the cell must differ from.
    fn check_endpoint(&self, endpoint: Endpoint, cell: Cell, other: Option<Cell>) -> Result<()> {
        self.check_in_bounds(cell)?;
        if self.grid.is_wall(cell) {
            return Err(InvalidConfiguration::EndpointOnWall { endpoint, cell }.into());
        }
        if other == Some(cell) {
            return Err(InvalidConfiguration::SameEndpoints(cell).into());
        }
        Ok(())
    }

    /// Start and end of a run, once every precondition holds.
    fn endpoints(&self) -> Result<(Cell, Cell)> {
        let start = self
            .start
            .ok_or(InvalidConfiguration::MissingEndpoint(Endpoint::Start))?;
        let end = self
            .end
            .ok_or(InvalidConfiguration::MissingEndpoint(Endpoint::End))?;
        self.check_endpoint(Endpoint::Start, start, Some(end))?;
        self.check_endpoint(Endpoint::End, end, None)?;
        if !self.state.is_fresh() {
            return Err(InvalidConfiguration::StaleSearchState.into());
        }
        Ok((start, end))
    }
}

/// Releases the running flag when a run ends, even by panic.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A grid bound to its search state.
///
/// One writer (the active run) and any number of observers: every expansion step happens
/// under a single write lock, and every observation under a single read lock, so an
/// observer never sees a half-applied step.
pub struct SearchEngine {
    inner: RwLock<Inner>,
    /// Set while a run is active
    running: AtomicBool,
    /// Checked once per expansion step
    cancel: AtomicBool,
}

impl SearchEngine {
    pub fn new(grid: Grid, topology: Topology) -> Self {
        SearchEngine {
            inner: RwLock::new(Inner {
                grid,
                topology,
                start: None,
                end: None,
                state: SearchState::default(),
                outcome: None,
            }),
            running: AtomicBool::new(false),
            cancel: AtomicBool::new(false),
        }
    }

    /// An all-open, editable grid.
    pub fn blank(rows: u16, cols: u16) -> Self {
        SearchEngine::new(Grid::open(rows, cols), Topology::Editable)
    }

    /// A freshly carved maze with fixed walls.
    pub fn generated<R: Rng + ?Sized>(rows: u16, cols: u16, rng: &mut R) -> Result<Self> {
        let grid = generate_maze(rows, cols, rng)?;
        Ok(SearchEngine::new(grid, Topology::Generated))
    }

    /// Places start and end on two distinct random open cells.
    pub fn with_random_endpoints<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Self> {
        self.randomize_endpoints(rng)?;
        Ok(self)
    }

    pub fn randomize_endpoints<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<()> {
        let mut inner = self.write_idle()?;
        let open = inner.grid.open_cells().collect::<Vec<_>>();
        let mut picked = open.choose_multiple(rng, 2).copied();
        let (Some(start), Some(end)) = (picked.next(), picked.next()) else {
            return Err(InvalidConfiguration::NoOpenCells.into());
        };
        inner.start = Some(start);
        inner.end = Some(end);
        tracing::debug!(?start, ?end, "picked random endpoints");
        Ok(())
    }

    /// Takes the write lock, refusing while a run is active.
    fn write_idle(&self) -> Result<parking_lot::RwLockWriteGuard<'_, Inner>> {
        let inner = self.inner.write();
        if self.running.load(Ordering::Acquire) {
            tracing::warn!("rejected edit while a search is running");
            return Err(Error::ConcurrentRunConflict);
        }
        Ok(inner)
    }

    pub fn rows(&self) -> u16 {
        self.inner.read().grid.rows()
    }

    pub fn cols(&self) -> u16 {
        self.inner.read().grid.cols()
    }

    pub fn topology(&self) -> Topology {
        self.inner.read().topology
    }

    /// A copy of the current wall layout.
    pub fn grid(&self) -> Grid {
        self.inner.read().grid.clone()
    }

    pub fn start(&self) -> Option<Cell> {
        self.inner.read().start
    }

    pub fn end(&self) -> Option<Cell> {
        self.inner.read().end
    }

    pub fn set_start(&self, cell: Cell) -> Result<()> {
        let mut inner = self.write_idle()?;
        let end = inner.end;
        inner.check_endpoint(Endpoint::Start, cell, end)?;
        inner.start = Some(cell);
        Ok(())
    }

    pub fn set_end(&self, cell: Cell) -> Result<()> {
        let mut inner = self.write_idle()?;
        let start = inner.start;
        inner.check_endpoint(Endpoint::End, cell, start)?;
        inner.end = Some(cell);
        Ok(())
    }

    /// Moves both endpoints at once. Nothing changes unless both are valid.
    pub fn set_endpoints(&self, start: Cell, end: Cell) -> Result<()> {
        let mut inner = self.write_idle()?;
        inner.check_endpoint(Endpoint::Start, start, Some(end))?;
        inner.check_endpoint(Endpoint::End, end, None)?;
        inner.start = Some(start);
        inner.end = Some(end);
        Ok(())
    }

    /// Turns `cell` into a wall. Only editable grids accept walls, and never on start or end.
    pub fn add_wall(&self, cell: Cell) -> Result<()> {
        let mut inner = self.write_idle()?;
        if inner.topology == Topology::Generated {
            return Err(InvalidConfiguration::ImmutableTopology.into());
        }
        inner.check_in_bounds(cell)?;
        if inner.start == Some(cell) {
            return Err(InvalidConfiguration::WallOnEndpoint {
                endpoint: Endpoint::Start,
                cell,
            }
            .into());
        }
        if inner.end == Some(cell) {
            return Err(InvalidConfiguration::WallOnEndpoint {
                endpoint: Endpoint::End,
                cell,
            }
            .into());
        }
        inner.grid.set(cell, Tile::Wall);
        Ok(())
    }

    pub fn remove_wall(&self, cell: Cell) -> Result<()> {
        let mut inner = self.write_idle()?;
        if inner.topology == Topology::Generated {
            return Err(InvalidConfiguration::ImmutableTopology.into());
        }
        inner.check_in_bounds(cell)?;
        inner.grid.set(cell, Tile::Open);
        Ok(())
    }

    /// Clears frontier, visited set, parents and route. Grid and endpoints are kept.
    pub fn reset_search_state(&self) -> Result<()> {
        let mut inner = self.write_idle()?;
        inner.state.reset();
        inner.outcome = None;
        tracing::debug!("search state reset");
        Ok(())
    }

    /// Clears search state and every wall, for reuse of a hand-painted grid.
    pub fn refresh(&self) -> Result<()> {
        let mut inner = self.write_idle()?;
        if inner.topology == Topology::Generated {
            return Err(InvalidConfiguration::ImmutableTopology.into());
        }
        inner.state.reset();
        inner.outcome = None;
        inner.grid.clear_walls();
        tracing::debug!("search state and walls cleared");
        Ok(())
    }

    /// Claims the engine for a run and seeds `solver`.
    ///
    /// On error the engine is left untouched and free.
    fn begin(&self, solver: Solver) -> Result<(Cell, Cell)> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(%solver, "rejected search while another is running");
            return Err(Error::ConcurrentRunConflict);
        }

        let mut inner = self.inner.write();
        let (start, end) = match inner.endpoints() {
            Ok(endpoints) => endpoints,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                tracing::warn!(%solver, error = %e, "rejected search");
                return Err(e);
            }
        };
        self.cancel.store(false, Ordering::Relaxed);
        solver.seed(&mut inner.state, start);
        tracing::info!(%solver, ?start, ?end, "search started");
        Ok((start, end))
    }

    /// Expands cells until the run reaches a terminal state. Requires a successful [`Self::begin`].
    fn drive(&self, solver: Solver, pacing: &Pacing, start: Cell, end: Cell) -> Outcome {
        let _guard = RunGuard(&self.running);
        let mut steps = 0usize;

        let outcome = loop {
            if self.cancel.load(Ordering::Relaxed) {
                break Outcome::Cancelled;
            }
            let step = {
                let mut inner = self.inner.write();
                let Inner { grid, state, .. } = &mut *inner;
                let step = solver.step(grid, end, state);
                if step == Step::Found {
                    state.finish(start, end);
                }
                step
            };
            match step {
                Step::Expanded(_) => {
                    steps += 1;
                    pacing.pause();
                }
                Step::Found => break Outcome::RouteFound,
                Step::Exhausted => break Outcome::NoRoute,
            }
        };

        let mut inner = self.inner.write();
        inner.outcome = Some(outcome);
        tracing::info!(
            %solver,
            ?outcome,
            steps,
            visited = inner.state.visited().len(),
            route_len = inner.state.route().len(),
            "search finished"
        );
        outcome
    }

    /// Runs `solver` from start to end on the calling thread until it finds the end,
    /// exhausts the frontier or is cancelled.
    ///
    /// Fails without touching the state if the endpoints are invalid, the state has not been
    /// reset since the previous run, or another run is active.
    pub fn run(&self, solver: Solver, pacing: &Pacing) -> Result<Outcome> {
        let (start, end) = self.begin(solver)?;
        Ok(self.drive(solver, pacing, start, end))
    }

    /// Like [`Self::run`], but on a background thread. Configuration errors and run
    /// conflicts are reported here, before the thread is spawned.
    pub fn spawn(self: &Arc<Self>, solver: Solver, pacing: Pacing) -> Result<JoinHandle<Outcome>> {
        let (start, end) = self.begin(solver)?;
        let engine = Arc::clone(self);
        Ok(std::thread::spawn(move || {
            engine.drive(solver, &pacing, start, end)
        }))
    }

    /// Asks the active run to stop after its current step.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// How the last run ended. `None` while a run is active or since the last reset.
    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.read().outcome
    }

    pub fn route_found(&self) -> bool {
        self.inner.read().state.route_found()
    }

    /// The reconstructed route, end first. Empty unless a route was found.
    pub fn route(&self) -> Vec<Cell> {
        self.inner.read().state.route().to_vec()
    }

    pub fn visited(&self) -> HashSet<Cell> {
        self.inner.read().state.visited().clone()
    }

    pub fn frontier(&self) -> Vec<Cell> {
        self.inner.read().state.frontier().collect()
    }

    /// Classifies one cell. Returns `None` outside the grid.
    pub fn classify(&self, cell: Cell) -> Option<CellKind> {
        let inner = self.inner.read();
        if !inner.grid.in_bounds(cell) {
            return None;
        }
        let state = &inner.state;
        let kind = if inner.end == Some(cell) {
            CellKind::End
        } else if inner.start == Some(cell) {
            CellKind::Start
        } else if state.route().contains(&cell) {
            CellKind::Route
        } else if state.visited().contains(&cell) {
            CellKind::Visited
        } else if state.in_frontier(cell) {
            CellKind::Frontier
        } else if inner.grid.is_wall(cell) {
            CellKind::Wall
        } else {
            CellKind::Open
        };
        Some(kind)
    }

    /// Classifies every cell at once.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        Snapshot::capture(
            &inner.grid,
            &inner.state,
            inner.start,
            inner.end,
            self.is_running(),
            inner.outcome,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generators::get_rng,
        solvers::tests::{SOLVERS, assert_valid_route, barrier_grid},
    };
    use std::time::Duration;

    fn barrier_engine() -> SearchEngine {
        let engine = SearchEngine::new(barrier_grid(), Topology::Editable);
        engine.set_start((0, 0)).unwrap();
        engine.set_end((4, 4)).unwrap();
        engine
    }

    #[test]
    fn test_run_barrier_scenario() {
        let engine = barrier_engine();
        let outcome = engine.run(Solver::BreadthFirst, &Pacing::none()).unwrap();
        assert_eq!(outcome, Outcome::RouteFound);
        assert!(engine.route_found());
        assert!(!engine.is_running());
        let route = engine.route();
        assert_eq!(route.len() - 1, 8);
        assert_valid_route(&engine.grid(), &route, (0, 0), (4, 4));
        assert_eq!(engine.outcome(), Some(Outcome::RouteFound));

        engine.reset_search_state().unwrap();
        let outcome = Solver::GreedyBestFirst.run(&engine, &Pacing::none());
        assert_eq!(outcome, Ok(Outcome::RouteFound));
        assert_eq!(engine.route().len() - 1, 8);
    }

    #[test]
    fn test_same_endpoints_rejected() {
        let engine = SearchEngine::blank(5, 5);
        engine.set_start((2, 2)).unwrap();
        let err = engine.set_end((2, 2)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidConfiguration(InvalidConfiguration::SameEndpoints((2, 2)))
        );
        assert!(engine.frontier().is_empty());
        assert_eq!(engine.snapshot().count(CellKind::Frontier), 0);
    }

    #[test]
    fn test_set_endpoints_swaps_atomically() {
        let engine = barrier_engine();
        engine.set_endpoints((4, 4), (0, 0)).unwrap();
        assert_eq!((engine.start(), engine.end()), (Some((4, 4)), Some((0, 0))));
        assert!(engine.set_endpoints((1, 1), (0, 2)).is_err());
        assert_eq!((engine.start(), engine.end()), (Some((4, 4)), Some((0, 0))));
    }

    #[test]
    fn test_endpoint_on_wall_rejected() {
        let engine = SearchEngine::blank(5, 5);
        engine.add_wall((1, 1)).unwrap();
        assert!(matches!(
            engine.set_start((1, 1)),
            Err(Error::InvalidConfiguration(
                InvalidConfiguration::EndpointOnWall { .. }
            ))
        ));
        assert!(matches!(
            engine.set_end((9, 9)),
            Err(Error::InvalidConfiguration(
                InvalidConfiguration::OutOfBounds { .. }
            ))
        ));
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let engine = SearchEngine::blank(5, 5);
        engine.set_start((0, 0)).unwrap();
        assert_eq!(
            engine.run(Solver::DepthFirst, &Pacing::none()),
            Err(Error::InvalidConfiguration(
                InvalidConfiguration::MissingEndpoint(Endpoint::End)
            ))
        );
        assert!(!engine.is_running());
    }

    #[test]
    fn test_wall_on_endpoint_rejected() {
        let engine = barrier_engine();
        assert_eq!(
            engine.add_wall((4, 4)),
            Err(Error::InvalidConfiguration(
                InvalidConfiguration::WallOnEndpoint {
                    endpoint: Endpoint::End,
                    cell: (4, 4)
                }
            ))
        );
    }

    #[test]
    fn test_generated_walls_are_fixed() {
        let engine = SearchEngine::generated(9, 9, &mut get_rng(Some(3))).unwrap();
        let err = Error::InvalidConfiguration(InvalidConfiguration::ImmutableTopology);
        assert_eq!(engine.add_wall((1, 1)), Err(err.clone()));
        assert_eq!(engine.remove_wall((0, 0)), Err(err.clone()));
        assert_eq!(engine.refresh(), Err(err));
        assert_eq!(engine.topology(), Topology::Generated);
    }

    #[test]
    fn test_random_endpoints_are_open_and_distinct() {
        for seed in 0..10 {
            let mut rng = get_rng(Some(seed));
            let engine = SearchEngine::generated(11, 11, &mut rng)
                .and_then(|e| e.with_random_endpoints(&mut rng))
                .unwrap();
            let (start, end) = (engine.start().unwrap(), engine.end().unwrap());
            assert_ne!(start, end);
            assert!(engine.grid().is_open(start));
            assert!(engine.grid().is_open(end));
            for solver in SOLVERS {
                engine.reset_search_state().unwrap();
                assert_eq!(
                    engine.run(solver, &Pacing::none()),
                    Ok(Outcome::RouteFound)
                );
            }
        }
    }

    #[test]
    fn test_random_endpoints_need_two_open_cells() {
        let engine = SearchEngine::new(Grid::walled(3, 3), Topology::Editable);
        assert_eq!(
            engine.randomize_endpoints(&mut get_rng(Some(0))),
            Err(Error::InvalidConfiguration(InvalidConfiguration::NoOpenCells))
        );
    }

    #[test]
    fn test_rerun_requires_reset() {
        let engine = barrier_engine();
        engine.run(Solver::GreedyBestFirst, &Pacing::none()).unwrap();
        assert_eq!(
            engine.run(Solver::GreedyBestFirst, &Pacing::none()),
            Err(Error::InvalidConfiguration(
                InvalidConfiguration::StaleSearchState
            ))
        );
    }

    #[test]
    fn test_reset_then_rerun_is_idempotent() {
        let mut rng = get_rng(Some(11));
        let engine = SearchEngine::generated(25, 25, &mut rng)
            .and_then(|e| e.with_random_endpoints(&mut rng))
            .unwrap();
        for solver in SOLVERS {
            engine.reset_search_state().unwrap();
            engine.run(solver, &Pacing::none()).unwrap();
            let (route, visited) = (engine.route(), engine.visited());

            engine.reset_search_state().unwrap();
            assert!(engine.route().is_empty());
            assert!(engine.visited().is_empty());
            assert!(!engine.route_found());

            engine.run(solver, &Pacing::none()).unwrap();
            assert_eq!(engine.route(), route);
            assert_eq!(engine.visited(), visited);
        }
    }

    #[test]
    fn test_no_route_outcome() {
        let engine = SearchEngine::blank(5, 5);
        engine.set_start((0, 0)).unwrap();
        engine.set_end((4, 4)).unwrap();
        for cell in [(3, 4), (4, 3)] {
            engine.add_wall(cell).unwrap();
        }
        for solver in SOLVERS {
            engine.reset_search_state().unwrap();
            assert_eq!(engine.run(solver, &Pacing::none()), Ok(Outcome::NoRoute));
            assert!(!engine.route_found());
            assert!(engine.route().is_empty());
            // 25 cells minus two walls minus the enclosed end
            assert_eq!(engine.visited().len(), 22);
        }
    }

    #[test]
    fn test_refresh_clears_walls_and_state() {
        let engine = barrier_engine();
        engine.run(Solver::BreadthFirst, &Pacing::none()).unwrap();
        engine.refresh().unwrap();
        assert_eq!(engine.grid().open_cells().count(), 25);
        assert!(!engine.route_found());
        assert_eq!(engine.start(), Some((0, 0)));
        assert_eq!(
            engine.run(Solver::BreadthFirst, &Pacing::none()),
            Ok(Outcome::RouteFound)
        );
        assert_eq!(engine.route().len() - 1, 8);
    }

    #[test]
    fn test_classify_precedence() {
        let engine = barrier_engine();
        assert_eq!(engine.classify((0, 2)), Some(CellKind::Wall));
        assert_eq!(engine.classify((1, 1)), Some(CellKind::Open));
        assert_eq!(engine.classify((0, 0)), Some(CellKind::Start));
        assert_eq!(engine.classify((4, 4)), Some(CellKind::End));
        assert_eq!(engine.classify((5, 0)), None);

        engine.run(Solver::BreadthFirst, &Pacing::none()).unwrap();
        // Start and end stay distinguished even though they are visited and on the route
        assert_eq!(engine.classify((0, 0)), Some(CellKind::Start));
        assert_eq!(engine.classify((4, 4)), Some(CellKind::End));
        assert_eq!(engine.classify((4, 2)), Some(CellKind::Route));

        let snapshot = engine.snapshot();
        for r in 0..5 {
            for c in 0..5 {
                assert_eq!(snapshot.get((r, c)), engine.classify((r, c)));
            }
        }
        assert_eq!(snapshot.count(CellKind::Route), 7);
        assert!(snapshot.route_found);
        assert!(!snapshot.running);
    }

    #[test]
    fn test_frontier_visible_mid_run() {
        let grid = Grid::open(5, 5);
        let mut state = SearchState::default();
        Solver::BreadthFirst.seed(&mut state, (2, 2));
        Solver::BreadthFirst.step(&grid, (0, 0), &mut state);
        let snapshot = Snapshot::capture(
            &grid,
            &state,
            Some((2, 2)),
            Some((0, 0)),
            true,
            None,
        );
        assert_eq!(snapshot.count(CellKind::Frontier), 4);
        assert_eq!(snapshot.get((1, 2)), Some(CellKind::Frontier));
        assert_eq!(snapshot.get((2, 2)), Some(CellKind::Start));
        assert!(snapshot.running);
    }

    #[test]
    fn test_spawn_and_poll() {
        let mut rng = get_rng(Some(5));
        let engine = Arc::new(
            SearchEngine::generated(31, 31, &mut rng)
                .and_then(|e| e.with_random_endpoints(&mut rng))
                .unwrap(),
        );
        let pacing = Pacing::new(Duration::from_micros(200), true);
        let handle = engine.spawn(Solver::DepthFirst, pacing).unwrap();

        while engine.is_running() {
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.rows(), 31);
            std::thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(handle.join().unwrap(), Outcome::RouteFound);
        assert_eq!(engine.snapshot().outcome, Some(Outcome::RouteFound));
        assert!(engine.route_found());
        assert!(!engine.is_running());
    }

    #[test]
    fn test_edits_rejected_while_running() {
        let engine = Arc::new(barrier_engine());
        let pacing = Pacing::new(Duration::from_millis(50), true);
        let handle = engine.spawn(Solver::BreadthFirst, pacing).unwrap();

        // The run needs many paced steps, so it is still active here
        assert!(engine.is_running());
        assert_eq!(engine.add_wall((1, 1)), Err(Error::ConcurrentRunConflict));
        assert_eq!(engine.reset_search_state(), Err(Error::ConcurrentRunConflict));
        assert_eq!(
            engine.spawn(Solver::DepthFirst, Pacing::none()).map(|_| ()),
            Err(Error::ConcurrentRunConflict)
        );

        engine.cancel();
        assert_eq!(handle.join().unwrap(), Outcome::Cancelled);
        assert!(!engine.is_running());
        assert!(!engine.route_found());
        assert_eq!(engine.outcome(), Some(Outcome::Cancelled));

        engine.reset_search_state().unwrap();
        assert_eq!(engine.outcome(), None);
    }
}
