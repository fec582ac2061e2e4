use super::Step;
use crate::{
    engine::SearchState,
    maze::{Cell, Grid},
};

pub(super) fn seed(state: &mut SearchState, start: Cell) {
    state.frontier.push_back(start);
    state.frontier_set.insert(start);
}

/// Dequeues the oldest frontier cell and finalizes it.
///
/// Neighbors already visited or already waiting in the queue are skipped, so cells are
/// finalized in non-decreasing distance from the start.
pub(super) fn step(grid: &Grid, end: Cell, state: &mut SearchState) -> Step {
    let Some(current) = state.frontier.pop_front() else {
        return Step::Exhausted;
    };
    state.frontier_set.remove(&current);
    state.visited.insert(current);
    if current == end {
        return Step::Found;
    }

    let neighbors = grid
        .open_neighbors(current)
        .filter(|n| !state.visited.contains(n) && !state.frontier_set.contains(n))
        .collect::<Vec<_>>();
    for neighbor in neighbors {
        state.frontier.push_back(neighbor);
        state.frontier_set.insert(neighbor);
        state.parent.insert(neighbor, current);
    }
    Step::Expanded(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::tests::grid_from;

    #[test]
    fn test_bfs_expands_in_layers() {
        let grid = grid_from(&["...", "...", "..."]);
        let mut state = SearchState::default();
        seed(&mut state, (1, 1));

        assert_eq!(step(&grid, (0, 0), &mut state), Step::Expanded((1, 1)));
        assert_eq!(
            state.frontier().collect::<Vec<_>>(),
            vec![(0, 1), (2, 1), (1, 0), (1, 2)]
        );
        // Frontier cells are never enqueued twice
        assert_eq!(step(&grid, (0, 0), &mut state), Step::Expanded((0, 1)));
        assert_eq!(
            state.frontier().collect::<Vec<_>>(),
            vec![(2, 1), (1, 0), (1, 2), (0, 0), (0, 2)]
        );
        assert_eq!(state.parent_of((0, 0)), Some((0, 1)));
    }

    #[test]
    fn test_bfs_frontier_set_shadows_queue() {
        let grid = grid_from(&["....", ".#..", "...."]);
        let mut state = SearchState::default();
        seed(&mut state, (0, 0));
        while let Step::Expanded(_) = step(&grid, (2, 3), &mut state) {
            let queued = state.frontier().collect::<std::collections::HashSet<_>>();
            assert_eq!(queued, state.frontier_set);
            assert_eq!(queued.len(), state.frontier.len());
        }
    }
}
