//! # grid_stepper
//!
//! Step-by-step [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a
//! 4-connected grid of walls, meant to be animated: every call to [Pathfinder::step]
//! expands exactly one cell and leaves the open set, closed set and (eventually) the path in
//! the grid, where a renderer can read them through [Pathfinder::snapshot].
//!
//! Around the engine the crate provides drawing tools that turn pointer input into wall
//! edits ([tools]), a cooperative [scheduler] that advances anything steppable a fixed
//! number of times per frame, a recursive-backtracker [maze] generator and a TOML [config].
//! Moves have unit cost and the heuristic is the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), so found paths are
//! shortest paths.
pub mod config;
pub mod error;
pub mod maze;
pub mod pathing_grid;
pub mod scheduler;
pub mod search;
pub mod snapshot;
pub mod tools;

use crate::config::Config;
use crate::error::EditError;
use crate::pathing_grid::{Cell, PathingGrid};
use crate::search::SearchState;
use core::fmt;
use grid_util::point::Point;
use log::{debug, info, warn};

pub use crate::search::SearchStatus;
pub use crate::snapshot::{CellRole, Snapshot};

/// Cost of moving to a 4-connected neighbour.
pub const EDGE_COST: i32 = 1;

/// The search engine. Owns the grid, the start and end markers and the state of the search
/// between them. Walls and markers can only be edited while the search is
/// [idle](SearchStatus::Idle); edits at any other time are rejected.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    grid: PathingGrid,
    search: SearchState,
    start: usize,
    end: usize,
}

impl Default for Pathfinder {
    fn default() -> Pathfinder {
        Pathfinder::from_config(&Config::default())
    }
}

impl Pathfinder {
    /// Creates a wall-free grid with the start in the top-left and the end in the
    /// bottom-right corner.
    pub fn new(width: usize, height: usize) -> Pathfinder {
        let mut pathfinder = Pathfinder {
            grid: PathingGrid::default(),
            search: SearchState::new(),
            start: 0,
            end: 0,
        };
        pathfinder.init_grid(width, height);
        pathfinder
    }

    pub fn from_config(config: &Config) -> Pathfinder {
        Pathfinder::new(config.cols, config.rows)
    }

    /// (Re)allocates the grid, discarding all walls and search progress. Zero dimensions
    /// are raised to one.
    pub fn init_grid(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            warn!("Grid of {width}x{height} requested, using at least one cell per axis");
        }
        let (width, height) = (width.max(1), height.max(1));
        self.grid = PathingGrid::new(width, height);
        self.search.clear();
        self.start = 0;
        self.end = self.grid.get_ix(width as i32 - 1, height as i32 - 1);
        debug!("Initialized {width}x{height} grid");
    }

    /// Same as [init_grid](Self::init_grid) with the current dimensions.
    pub fn reset(&mut self) {
        self.init_grid(self.width(), self.height());
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }
    pub fn height(&self) -> usize {
        self.grid.height()
    }
    pub fn start(&self) -> Point {
        self.grid.point(self.start)
    }
    pub fn end(&self) -> Point {
        self.grid.point(self.end)
    }
    pub fn status(&self) -> SearchStatus {
        self.search.status()
    }
    /// The cell expanded (or found to be the end) by the latest step.
    pub fn current(&self) -> Option<Point> {
        self.search.current().map(|ix| self.grid.point(ix))
    }
    /// The path from start to end, empty unless the status is [SearchStatus::Found].
    pub fn path(&self) -> Vec<Point> {
        self.search
            .path()
            .iter()
            .map(|&ix| self.grid.point(ix))
            .collect()
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.in_bounds(x, y)
    }
    /// Whether `(x, y)` is a wall. Positions outside the grid are not.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.grid
            .checked_ix(x, y)
            .is_some_and(|ix| self.grid.is_wall(ix))
    }
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.checked_ix(x, y).map(|ix| self.grid.cell(ix))
    }
    pub fn grid(&self) -> &PathingGrid {
        &self.grid
    }

    fn check_idle(&self) -> Result<(), EditError> {
        if self.status().is_idle() {
            Ok(())
        } else {
            Err(EditError::SearchActive)
        }
    }

    fn checked_ix(&self, x: i32, y: i32) -> Result<usize, EditError> {
        self.grid
            .checked_ix(x, y)
            .ok_or(EditError::OutOfBounds { x, y })
    }

    /// Sets or clears a wall, reporting why the edit was rejected if it was.
    pub fn try_set_wall(&mut self, x: i32, y: i32, is_wall: bool) -> Result<(), EditError> {
        self.check_idle()?;
        let ix = self.checked_ix(x, y)?;
        if is_wall && (ix == self.start || ix == self.end) {
            return Err(EditError::MarkerCell);
        }
        self.grid.set_wall(ix, is_wall);
        Ok(())
    }

    /// Sets or clears a wall. Out-of-bounds positions, the start and end cells and edits
    /// while a search is active are ignored.
    pub fn set_wall(&mut self, x: i32, y: i32, is_wall: bool) {
        if let Err(e) = self.try_set_wall(x, y, is_wall) {
            debug!("Ignored wall edit at ({x}, {y}): {e}");
        }
    }

    pub fn try_set_start(&mut self, x: i32, y: i32) -> Result<(), EditError> {
        self.check_idle()?;
        let ix = self.checked_ix(x, y)?;
        self.grid.set_wall(ix, false);
        self.start = ix;
        Ok(())
    }

    /// Moves the start marker, clearing any wall under it.
    pub fn set_start(&mut self, x: i32, y: i32) {
        if let Err(e) = self.try_set_start(x, y) {
            debug!("Ignored start move to ({x}, {y}): {e}");
        }
    }

    pub fn try_set_end(&mut self, x: i32, y: i32) -> Result<(), EditError> {
        self.check_idle()?;
        let ix = self.checked_ix(x, y)?;
        self.grid.set_wall(ix, false);
        self.end = ix;
        Ok(())
    }

    /// Moves the end marker, clearing any wall under it.
    pub fn set_end(&mut self, x: i32, y: i32) {
        if let Err(e) = self.try_set_end(x, y) {
            debug!("Ignored end move to ({x}, {y}): {e}");
        }
    }

    /// Starts a search from the start to the end marker. Only has an effect when idle; after
    /// a search has finished, call [clear_search](Self::clear_search) first.
    pub fn begin_search(&mut self) {
        if !self.status().is_idle() {
            debug!("Search not started, status is {:?}", self.status());
            return;
        }
        info!("Searching from {} to {}", self.start(), self.end());
        self.search.begin(&mut self.grid, self.start, self.end);
    }

    /// Expands one cell of the running search and returns the new status. Does nothing
    /// unless the search is running.
    pub fn step(&mut self) -> SearchStatus {
        self.search.step(&mut self.grid, self.end)
    }

    /// Begins a search if idle and steps it until it finishes.
    pub fn run_to_completion(&mut self) -> SearchStatus {
        self.begin_search();
        while self.status().is_running() {
            self.step();
        }
        self.status()
    }

    /// Throws away the search progress, keeping walls and markers, so the grid can be
    /// edited and searched again.
    pub fn clear_search(&mut self) {
        self.grid.clear_search();
        self.search.clear();
    }

    /// Whether any path connects the start and the end, judged from the connected
    /// components of open cells rather than by searching.
    pub fn reachable(&mut self) -> bool {
        self.grid.update();
        self.grid.reachable(self.start, self.end)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            width: self.width(),
            height: self.height(),
            cells: self.grid.cells(),
            start: self.start,
            end: self.end,
            current: self.search.current(),
            path: self.search.path(),
            status: self.status(),
        }
    }
}

impl fmt::Display for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let snapshot = self.snapshot();
        for y in 0..self.height() {
            let row = (y * self.width()..(y + 1) * self.width())
                .filter_map(|ix| snapshot.role_at(ix).map(CellRole::symbol))
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn assert_valid_path(pathfinder: &Pathfinder) {
        let path = pathfinder.path();
        assert_eq!(path.first(), Some(&pathfinder.start()));
        assert_eq!(path.last(), Some(&pathfinder.end()));
        for (a, b) in path.iter().tuple_windows() {
            assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1);
        }
        assert!(path.iter().all(|p| !pathfinder.is_wall(p.x, p.y)));
    }

    #[test]
    fn initial_state() {
        let pathfinder = Pathfinder::new(4, 3);
        assert_eq!(pathfinder.start(), Point::new(0, 0));
        assert_eq!(pathfinder.end(), Point::new(3, 2));
        assert_eq!(pathfinder.status(), SearchStatus::Idle);
        assert!(pathfinder.path().is_empty());
        assert_eq!(pathfinder.snapshot().open_set().count(), 0);
    }

    /// Asserts that the optimal 9 cell path is found on an open 5x5 grid.
    #[test]
    fn solve_open_grid() {
        let mut pathfinder = Pathfinder::new(5, 5);
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
        assert_eq!(pathfinder.path().len(), 9);
        assert_valid_path(&pathfinder);
    }

    #[test]
    fn solve_around_obstacle() {
        // |S  |
        // | # |
        // |  G|
        let mut pathfinder = Pathfinder::new(3, 3);
        pathfinder.set_wall(1, 1, true);
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
        assert_eq!(pathfinder.path().len(), 5);
        assert_valid_path(&pathfinder);
    }

    #[test]
    fn blocked_column_is_unreachable() {
        let mut pathfinder = Pathfinder::new(3, 3);
        for y in 0..3 {
            pathfinder.set_wall(1, y, true);
        }
        assert!(!pathfinder.reachable());
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Unreachable);
        assert_eq!(pathfinder.snapshot().open_set().count(), 0);
        assert!(pathfinder.path().is_empty());
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let mut pathfinder = Pathfinder::new(3, 3);
        pathfinder.set_end(0, 0);
        pathfinder.begin_search();
        assert_eq!(pathfinder.step(), SearchStatus::Found);
        assert_eq!(pathfinder.path(), vec![Point::new(0, 0)]);
    }

    #[test]
    fn single_cell_grid() {
        let mut pathfinder = Pathfinder::new(1, 1);
        pathfinder.begin_search();
        assert_eq!(pathfinder.step(), SearchStatus::Found);
        assert_eq!(pathfinder.path().len(), 1);
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let pathfinder = Pathfinder::new(0, 4);
        assert_eq!((pathfinder.width(), pathfinder.height()), (1, 4));
        assert_eq!(pathfinder.end(), Point::new(0, 3));
    }

    #[test]
    fn wall_on_markers_rejected() {
        let mut pathfinder = Pathfinder::new(3, 3);
        pathfinder.set_wall(0, 0, true);
        assert!(!pathfinder.is_wall(0, 0));
        assert_eq!(pathfinder.cell(0, 0).map(|c| c.is_wall), Some(false));
        assert_eq!(
            pathfinder.try_set_wall(2, 2, true),
            Err(EditError::MarkerCell)
        );
        assert!(!pathfinder.is_wall(2, 2));
    }

    #[test]
    fn out_of_bounds_edits_rejected() {
        let mut pathfinder = Pathfinder::new(3, 3);
        assert_eq!(
            pathfinder.try_set_wall(3, 0, true),
            Err(EditError::OutOfBounds { x: 3, y: 0 })
        );
        pathfinder.set_start(-1, 0);
        pathfinder.set_end(0, 7);
        assert_eq!(pathfinder.start(), Point::new(0, 0));
        assert_eq!(pathfinder.end(), Point::new(2, 2));
    }

    #[test]
    fn markers_clear_walls() {
        let mut pathfinder = Pathfinder::new(3, 3);
        pathfinder.set_wall(1, 1, true);
        pathfinder.set_wall(2, 1, true);
        pathfinder.set_start(1, 1);
        pathfinder.set_end(2, 1);
        assert!(!pathfinder.is_wall(1, 1));
        assert!(!pathfinder.is_wall(2, 1));
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
        assert_eq!(pathfinder.path().len(), 2);
    }

    #[test]
    fn edits_rejected_while_searching() {
        let mut pathfinder = Pathfinder::new(5, 5);
        pathfinder.begin_search();
        pathfinder.step();
        assert_eq!(
            pathfinder.try_set_wall(2, 2, true),
            Err(EditError::SearchActive)
        );
        pathfinder.set_start(1, 1);
        pathfinder.set_end(3, 3);
        assert!(!pathfinder.is_wall(2, 2));
        assert_eq!(pathfinder.start(), Point::new(0, 0));
        assert_eq!(pathfinder.end(), Point::new(4, 4));

        pathfinder.run_to_completion();
        assert_eq!(
            pathfinder.try_set_wall(2, 2, true),
            Err(EditError::SearchActive)
        );
    }

    #[test]
    fn begin_search_is_noop_when_running() {
        let mut pathfinder = Pathfinder::new(5, 5);
        pathfinder.begin_search();
        pathfinder.step();
        pathfinder.step();
        let closed = pathfinder.snapshot().closed_set().count();
        pathfinder.begin_search();
        assert_eq!(pathfinder.snapshot().closed_set().count(), closed);
        assert_eq!(pathfinder.status(), SearchStatus::Running);
    }

    #[test]
    fn step_after_termination_is_noop() {
        let mut pathfinder = Pathfinder::new(4, 4);
        pathfinder.run_to_completion();
        let before = format!("{pathfinder}");
        assert_eq!(pathfinder.step(), SearchStatus::Found);
        assert_eq!(format!("{pathfinder}"), before);

        let mut pathfinder = Pathfinder::new(3, 1);
        pathfinder.set_wall(1, 0, true);
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Unreachable);
        assert_eq!(pathfinder.step(), SearchStatus::Unreachable);
    }

    #[test]
    fn step_when_idle_is_noop() {
        let mut pathfinder = Pathfinder::new(3, 3);
        assert_eq!(pathfinder.step(), SearchStatus::Idle);
        assert_eq!(pathfinder.current(), None);
    }

    #[test]
    fn clear_search_allows_rerun() {
        let mut pathfinder = Pathfinder::new(5, 1);
        pathfinder.run_to_completion();
        assert_eq!(pathfinder.path().len(), 5);
        pathfinder.clear_search();
        assert_eq!(pathfinder.status(), SearchStatus::Idle);
        assert!(pathfinder.snapshot().closed_set().next().is_none());
        pathfinder.set_wall(2, 0, true);
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Unreachable);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut pathfinder = Pathfinder::new(6, 4);
        pathfinder.set_wall(2, 2, true);
        pathfinder.set_end(3, 1);
        pathfinder.run_to_completion();
        pathfinder.reset();
        let once = format!("{pathfinder}");
        let cells_once = pathfinder.snapshot().cells.to_vec();
        pathfinder.reset();
        assert_eq!(format!("{pathfinder}"), once);
        assert_eq!(pathfinder.snapshot().cells, cells_once.as_slice());
        assert_eq!(pathfinder.status(), SearchStatus::Idle);
        assert_eq!(pathfinder.end(), Point::new(5, 3));
        assert!(!pathfinder.is_wall(2, 2));
    }

    #[test]
    fn searches_are_deterministic() {
        let build = || {
            let mut pathfinder = Pathfinder::new(8, 8);
            for y in 0..6 {
                pathfinder.set_wall(3, y, true);
            }
            pathfinder.set_wall(5, 7, true);
            pathfinder
        };
        let mut first = build();
        let mut second = build();
        first.run_to_completion();
        second.run_to_completion();
        assert_eq!(first.path(), second.path());
        assert_valid_path(&first);
    }

    /// Among equally good candidates the one closest to the goal is expanded first, so on an
    /// open grid the search walks straight to the end without widening the frontier.
    #[test]
    fn ties_prefer_low_heuristic() {
        let mut pathfinder = Pathfinder::new(5, 5);
        pathfinder.begin_search();
        let mut steps = 0;
        while pathfinder.step().is_running() {
            steps += 1;
        }
        // 8 expansions plus the step that pops the end
        assert_eq!(steps, 8);
        assert_eq!(pathfinder.snapshot().closed_set().count(), 8);
    }

    #[test]
    fn display_marks_roles() {
        let mut pathfinder = Pathfinder::new(3, 2);
        pathfinder.set_wall(1, 0, true);
        assert_eq!(format!("{pathfinder}"), "S#.\n..G\n");
        pathfinder.run_to_completion();
        assert_eq!(format!("{pathfinder}"), "S#.\n**G\n");
    }
}
