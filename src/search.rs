//! Incremental A* over a [PathingGrid]. Unlike a classic `astar` function that loops until
//! the goal is popped, [SearchState::step] performs a single expansion and returns, leaving
//! the frontier in the grid's cells so it can be drawn between steps.
use crate::pathing_grid::PathingGrid;
use crate::EDGE_COST;
use grid_util::point::Point;
use log::{info, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SearchStatus {
    #[default]
    Idle,
    Running,
    Found,
    Unreachable,
}

impl SearchStatus {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::Unreachable)
    }
}

pub fn manhattan_distance(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[derive(Clone, Debug)]
struct SmallestCostHolder {
    estimated_cost: i32,
    heuristic: i32,
    cost: i32,
    order: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then prefers the node closest to the goal and
        // finally the node that entered the open set first
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.order.cmp(&self.order))
    }
}

fn reverse_path(grid: &PathingGrid, end: usize) -> Vec<usize> {
    let mut path: Vec<usize> =
        std::iter::successors(Some(end), |&ix| grid.cell(ix).came_from).collect();
    path.reverse();
    path
}

/// The live state of one search run. Open and closed set membership is stored on the
/// cells themselves; this struct keeps the priority queue that orders the open set.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    to_see: BinaryHeap<SmallestCostHolder>,
    /// Position at which each cell first entered the open set.
    order: Vec<usize>,
    next_order: usize,
    open_count: usize,
    current: Option<usize>,
    path: Vec<usize>,
    status: SearchStatus,
}

impl SearchState {
    pub fn new() -> SearchState {
        SearchState::default()
    }
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    /// The cell selected by the most recent step.
    pub fn current(&self) -> Option<usize> {
        self.current
    }
    /// Flat indices from start to end, empty unless the search succeeded.
    pub fn path(&self) -> &[usize] {
        &self.path
    }
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Drops all progress and returns to [SearchStatus::Idle].
    pub fn clear(&mut self) {
        self.to_see.clear();
        self.order.clear();
        self.next_order = 0;
        self.open_count = 0;
        self.current = None;
        self.path.clear();
        self.status = SearchStatus::Idle;
    }

    /// Seeds the open set with the start cell and switches to [SearchStatus::Running].
    /// Any search data left in the grid's cells is wiped.
    pub fn begin(&mut self, grid: &mut PathingGrid, start: usize, end: usize) {
        self.clear();
        grid.clear_search();
        self.order.resize(grid.len(), usize::MAX);
        let h = manhattan_distance(grid.point(start), grid.point(end));
        let cell = &mut grid.cells[start];
        cell.h = h;
        cell.f = h;
        self.open(grid, start);
        self.status = SearchStatus::Running;
    }

    fn open(&mut self, grid: &mut PathingGrid, ix: usize) {
        let cell = &mut grid.cells[ix];
        if !cell.in_open {
            cell.in_open = true;
            self.open_count += 1;
            self.order[ix] = self.next_order;
            self.next_order += 1;
        }
        self.to_see.push(SmallestCostHolder {
            estimated_cost: cell.f,
            heuristic: cell.h,
            cost: cell.g,
            order: self.order[ix],
            index: ix,
        });
    }

    fn pop_lowest(&mut self, grid: &PathingGrid) -> Option<usize> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            // A cell is pushed again every time a cheaper route to it is found; only the
            // entry matching its current cost is live.
            let cell = grid.cell(index);
            if cell.in_open && cell.g == cost {
                return Some(index);
            }
        }
        None
    }

    /// Performs one A* expansion and returns the resulting status. Does nothing unless the
    /// search is running.
    pub fn step(&mut self, grid: &mut PathingGrid, end: usize) -> SearchStatus {
        if !self.status.is_running() {
            return self.status;
        }
        let Some(current) = self.pop_lowest(grid) else {
            if self.open_count > 0 {
                warn!(
                    "Open set holds {} cells but none are queued, giving up",
                    self.open_count
                );
            }
            info!("Open set exhausted, {} is unreachable", grid.point(end));
            self.status = SearchStatus::Unreachable;
            return self.status;
        };
        self.current = Some(current);

        if current == end {
            self.path = reverse_path(grid, end);
            for &ix in &self.path {
                grid.cells[ix].on_path = true;
            }
            info!(
                "Found path of {} cells to {}",
                self.path.len(),
                grid.point(end)
            );
            self.status = SearchStatus::Found;
            return self.status;
        }

        let cell = &mut grid.cells[current];
        cell.in_open = false;
        cell.in_closed = true;
        self.open_count -= 1;

        let new_cost = cell.g + EDGE_COST;
        let goal = grid.point(end);
        for n in grid.neumann_neighbours(current) {
            let neighbour = grid.cell(n);
            if neighbour.is_wall || neighbour.in_closed {
                continue;
            }
            if !neighbour.in_open || new_cost < neighbour.g {
                let h = manhattan_distance(grid.point(n), goal);
                let neighbour = &mut grid.cells[n];
                neighbour.g = new_cost;
                neighbour.h = h;
                neighbour.f = new_cost + h;
                neighbour.came_from = Some(current);
                self.open(grid, n);
            }
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(estimated_cost: i32, heuristic: i32, order: usize) -> SmallestCostHolder {
        SmallestCostHolder {
            estimated_cost,
            heuristic,
            cost: estimated_cost - heuristic,
            order,
            index: order,
        }
    }

    #[test]
    fn frontier_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(holder(6, 4, 0));
        heap.push(holder(4, 2, 1));
        heap.push(holder(4, 1, 3));
        heap.push(holder(4, 1, 2));
        let popped: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|h| h.order)).collect();
        assert_eq!(popped, vec![2, 3, 1, 0]);
    }

    #[test]
    fn first_step_closes_start() {
        let mut grid = PathingGrid::new(3, 1);
        let mut search = SearchState::new();
        search.begin(&mut grid, 0, 2);
        assert_eq!(search.open_count(), 1);
        assert_eq!(search.step(&mut grid, 2), SearchStatus::Running);
        assert!(grid.cell(0).in_closed);
        assert!(!grid.cell(0).in_open);
        let next = grid.cell(1);
        assert!(next.in_open);
        assert_eq!((next.g, next.h, next.f), (1, 1, 2));
        assert_eq!(next.came_from, Some(0));
        assert_eq!(search.current(), Some(0));
    }

    #[test]
    fn step_requires_running() {
        let mut grid = PathingGrid::new(2, 2);
        let mut search = SearchState::new();
        assert_eq!(search.step(&mut grid, 3), SearchStatus::Idle);
        assert!(grid.cells().iter().all(|c| !c.in_open && !c.in_closed));
    }

    #[test]
    fn stale_entries_are_skipped() {
        let mut grid = PathingGrid::new(2, 1);
        let mut search = SearchState::new();
        search.begin(&mut grid, 0, 1);
        // Simulate a cheaper route being found after the first push
        grid.cells[1].g = 5;
        grid.cells[1].f = 5;
        search.open(&mut grid, 1);
        grid.cells[1].g = 1;
        grid.cells[1].f = 1;
        search.open(&mut grid, 1);
        assert_eq!(search.open_count(), 2);
        assert_eq!(search.pop_lowest(&grid), Some(1));
        assert_eq!(search.pop_lowest(&grid), Some(0));
        assert_eq!(search.pop_lowest(&grid), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut grid = PathingGrid::new(2, 1);
        let mut search = SearchState::new();
        search.begin(&mut grid, 0, 1);
        search.step(&mut grid, 1);
        search.step(&mut grid, 1);
        assert_eq!(search.status(), SearchStatus::Found);
        assert_eq!(search.path(), &[0, 1]);
        search.clear();
        assert_eq!(search.status(), SearchStatus::Idle);
        assert!(search.path().is_empty());
        assert_eq!(search.current(), None);
        assert_eq!(search.open_count(), 0);
        assert!(search.to_see.is_empty());
        assert!(search.order.is_empty());
        assert_eq!(search.next_order, 0);

        // A cleared search starts over exactly like a fresh one
        search.begin(&mut grid, 0, 1);
        assert_eq!(search.step(&mut grid, 1), SearchStatus::Running);
        assert_eq!(search.step(&mut grid, 1), SearchStatus::Found);
        assert_eq!(search.path(), &[0, 1]);
    }
}
