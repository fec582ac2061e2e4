use std::cmp::Reverse;

use super::Step;
use crate::{
    engine::SearchState,
    maze::{Cell, Grid, manhattan},
};

pub(super) fn seed(state: &mut SearchState, start: Cell) {
    state.frontier.push_back(start);
    state.cost_so_far.insert(start, 0);
}

/// Finalizes the frontier cell with the smallest Manhattan distance to `end`.
///
/// The frontier is stably re-sorted by descending distance before every pop and the last
/// cell taken, so ties go to the most recently inserted cell. The ordering key is the
/// heuristic alone: accumulated cost only decides which parent a frontier cell keeps,
/// and finalized cells are never reopened. Routes are therefore not always the shortest.
pub(super) fn step(grid: &Grid, end: Cell, state: &mut SearchState) -> Step {
    state
        .frontier
        .make_contiguous()
        .sort_by_key(|&cell| Reverse(manhattan(cell, end)));
    let Some(current) = state.frontier.pop_back() else {
        return Step::Exhausted;
    };
    state.visited.insert(current);
    if current == end {
        return Step::Found;
    }

    let cost = state.cost_so_far.get(&current).copied().unwrap_or_default() + 1;
    let neighbors = grid
        .open_neighbors(current)
        .filter(|n| !state.visited.contains(n))
        .collect::<Vec<_>>();
    for neighbor in neighbors {
        if state.frontier.contains(&neighbor) {
            if state
                .cost_so_far
                .get(&neighbor)
                .is_none_or(|&known| known > cost)
            {
                state.cost_so_far.insert(neighbor, cost);
                state.parent.insert(neighbor, current);
            }
        } else {
            state.frontier.push_back(neighbor);
            state.cost_so_far.insert(neighbor, cost);
            state.parent.insert(neighbor, current);
        }
    }
    Step::Expanded(current)
}
