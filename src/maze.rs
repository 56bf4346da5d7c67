//! Maze generation with the recursive backtracker (randomized depth-first search).
//!
//! Mazes are laid out on the same cell grid as the search: rooms sit on even coordinates,
//! the cells between two rooms are passages, and everything that is not carved stays a
//! wall. Generation is incremental like the search, so it can be animated with a
//! [Scheduler](crate::scheduler::Scheduler).
use crate::config::Config;
use crate::error::EditError;
use crate::scheduler::Steppable;
use crate::Pathfinder;
use grid_util::point::Point;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Clone, Debug)]
pub struct MazeGenerator {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    visited: Vec<bool>,
    stack: Vec<Point>,
    current: Point,
    finished: bool,
    rng: StdRng,
}

impl MazeGenerator {
    pub fn new(width: usize, height: usize, seed: u64) -> MazeGenerator {
        let (width, height) = (width.max(1), height.max(1));
        MazeGenerator {
            width,
            height,
            walls: vec![true; width * height],
            visited: vec![false; width * height],
            stack: Vec::new(),
            current: Point::new(0, 0),
            finished: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator sized to the configured grid, seeded from `maze_seed` or from entropy.
    pub fn from_config(config: &Config) -> MazeGenerator {
        let seed = config.maze_seed.unwrap_or_else(rand::random);
        MazeGenerator::new(config.cols, config.rows, seed)
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn is_finished(&self) -> bool {
        self.finished
    }
    /// The room the generator is currently standing on.
    pub fn current(&self) -> Point {
        self.current
    }

    fn ix(&self, p: Point) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Whether `(x, y)` is still uncarved. Positions outside the maze count as walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        let p = Point::new(x, y);
        !self.in_bounds(p) || self.walls[self.ix(p)]
    }

    pub fn is_visited(&self, x: i32, y: i32) -> bool {
        let p = Point::new(x, y);
        self.in_bounds(p) && self.visited[self.ix(p)]
    }

    fn unvisited_rooms(&self, p: Point) -> Vec<Point> {
        [(0, -2), (2, 0), (0, 2), (-2, 0)]
            .into_iter()
            .map(|(dx, dy)| Point::new(p.x + dx, p.y + dy))
            .filter(|&n| self.in_bounds(n) && !self.visited[self.ix(n)])
            .collect()
    }

    fn carve(&mut self, p: Point) {
        let ix = self.ix(p);
        self.walls[ix] = false;
    }

    /// Visits the current room and either moves on to a random unvisited neighbour, carving
    /// the passage between them, or backtracks. Does nothing once the maze is complete.
    pub fn step(&mut self) {
        if self.finished {
            return;
        }
        let current = self.current;
        let ix = self.ix(current);
        self.visited[ix] = true;
        self.carve(current);

        let candidates = self.unvisited_rooms(current);
        if let Some(&next) = candidates.choose(&mut self.rng) {
            self.stack.push(current);
            self.carve(Point::new((current.x + next.x) / 2, (current.y + next.y) / 2));
            self.current = next;
        } else if let Some(previous) = self.stack.pop() {
            self.current = previous;
        } else {
            info!("Finished {}x{} maze", self.width, self.height);
            self.finished = true;
        }
    }

    pub fn run_to_completion(&mut self) {
        while !self.finished {
            self.step();
        }
    }

    /// Copies the carved layout of a finished maze into an idle [Pathfinder] of the same
    /// size; a maze still being generated is rejected. Rooms only exist on even coordinates,
    /// so when the last row or column is odd a corridor is cut from the bottom-right corner
    /// to the nearest room, keeping the default end inside the maze. The start and end
    /// markers are never walled.
    pub fn apply(&self, pathfinder: &mut Pathfinder) -> Result<(), EditError> {
        if !pathfinder.status().is_idle() {
            return Err(EditError::SearchActive);
        }
        if (pathfinder.width(), pathfinder.height()) != (self.width, self.height) {
            return Err(EditError::SizeMismatch {
                expected: (self.width, self.height),
                found: (pathfinder.width(), pathfinder.height()),
            });
        }
        if !self.finished {
            return Err(EditError::UnfinishedMaze);
        }
        for (ix, &wall) in self.walls.iter().enumerate() {
            let (x, y) = ((ix % self.width) as i32, (ix / self.width) as i32);
            set_unless_marker(pathfinder, x, y, wall)?;
        }
        let (mut x, mut y) = (self.width as i32 - 1, self.height as i32 - 1);
        while x % 2 == 1 || y % 2 == 1 {
            set_unless_marker(pathfinder, x, y, false)?;
            if x % 2 == 1 {
                x -= 1;
            } else {
                y -= 1;
            }
        }
        Ok(())
    }
}

fn set_unless_marker(
    pathfinder: &mut Pathfinder,
    x: i32,
    y: i32,
    wall: bool,
) -> Result<(), EditError> {
    match pathfinder.try_set_wall(x, y, wall) {
        Ok(()) | Err(EditError::MarkerCell) => Ok(()),
        Err(e) => Err(e),
    }
}

impl Steppable for MazeGenerator {
    fn begin(&mut self) {}
    fn advance(&mut self) {
        self.step();
    }
    fn is_finished(&self) -> bool {
        self.finished
    }
}
