use super::Step;
use crate::{
    engine::SearchState,
    maze::{Cell, Grid},
};

pub(super) fn seed(state: &mut SearchState, start: Cell) {
    state.frontier.push_back(start);
}

/// Pops the most recently pushed cell and finalizes it.
///
/// A cell may sit on the stack several times. The parent recorded by its latest push is
/// the one in effect when it is first popped; later stale copies are skipped.
pub(super) fn step(grid: &Grid, end: Cell, state: &mut SearchState) -> Step {
    let current = loop {
        match state.frontier.pop_back() {
            None => return Step::Exhausted,
            Some(cell) if state.visited.contains(&cell) => continue,
            Some(cell) => break cell,
        }
    };
    state.visited.insert(current);
    if current == end {
        return Step::Found;
    }

    let neighbors = grid
        .open_neighbors(current)
        .filter(|n| !state.visited.contains(n))
        .collect::<Vec<_>>();
    for neighbor in neighbors {
        state.frontier.push_back(neighbor);
        state.parent.insert(neighbor, current);
    }
    Step::Expanded(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::tests::grid_from;

    #[test]
    fn test_dfs_commits_to_latest_branch() {
        let grid = grid_from(&["...", "...", "..."]);
        let mut state = SearchState::default();
        seed(&mut state, (0, 0));

        assert_eq!(step(&grid, (2, 2), &mut state), Step::Expanded((0, 0)));
        // Right neighbor was pushed last, so it is expanded next
        assert_eq!(step(&grid, (2, 2), &mut state), Step::Expanded((0, 1)));
        assert_eq!(step(&grid, (2, 2), &mut state), Step::Expanded((0, 2)));
        assert_eq!(state.parent_of((1, 1)), Some((0, 1)));
        assert_eq!(step(&grid, (2, 2), &mut state), Step::Expanded((1, 2)));
        // (1, 1) is pushed again from (1, 2); the latest push wins
        assert_eq!(state.parent_of((1, 1)), Some((1, 2)));
        assert_eq!(step(&grid, (2, 2), &mut state), Step::Expanded((1, 1)));
    }

    #[test]
    fn test_dfs_skips_stale_entries() {
        let grid = grid_from(&["..", ".."]);
        let mut state = SearchState::default();
        seed(&mut state, (0, 0));
        let mut expanded = Vec::new();
        while let Step::Expanded(cell) = step(&grid, (5, 5), &mut state) {
            expanded.push(cell);
        }
        assert_eq!(expanded.len(), 4);
        assert_eq!(state.visited.len(), 4);
        assert!(state.frontier.is_empty());
    }
}
