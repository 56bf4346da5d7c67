use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use serde::Serialize;

/// A single grid cell. Besides the wall flag it carries the bookkeeping of the
/// search currently running over the grid, so that a renderer can read the
/// whole state from one place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub is_wall: bool,
    /// Cost of the best known route from the start.
    pub g: i32,
    /// Manhattan distance to the end.
    pub h: i32,
    pub f: i32,
    /// Flat index of the predecessor on the best known route.
    pub came_from: Option<usize>,
    pub in_open: bool,
    pub in_closed: bool,
    pub on_path: bool,
}

impl Cell {
    fn clear_search(&mut self) {
        *self = Cell {
            is_wall: self.is_wall,
            ..Cell::default()
        };
    }
}

/// [PathingGrid] stores the cells of a fixed-size grid in a flat [Vec] indexed by
/// `y * width + x` and maintains information about connected components of open cells
/// using a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    width: usize,
    height: usize,
    pub(crate) cells: Vec<Cell>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid::new(1, 1)
    }
}

impl PathingGrid {
    /// Creates a grid without walls. Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize) -> PathingGrid {
        let (width, height) = (width.max(1), height.max(1));
        let mut grid = PathingGrid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn cell(&self, ix: usize) -> &Cell {
        &self.cells[ix]
    }
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
    pub fn point_in_bounds(&self, point: Point) -> bool {
        self.in_bounds(point.x, point.y)
    }
    /// Flat index of an in-bounds position.
    pub fn get_ix(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y));
        y as usize * self.width + x as usize
    }
    pub fn get_ix_point(&self, point: &Point) -> usize {
        self.get_ix(point.x, point.y)
    }
    /// Flat index of a position, or [None] if it lies outside the grid.
    pub fn checked_ix(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| self.get_ix(x, y))
    }
    pub fn point(&self, ix: usize) -> Point {
        Point::new((ix % self.width) as i32, (ix / self.width) as i32)
    }
    pub fn is_wall(&self, ix: usize) -> bool {
        self.cells[ix].is_wall
    }

    /// The in-bounds 4-connected neighbours of a cell, in the order left, right, up, down.
    /// Walls are included; callers filter them as needed.
    pub fn neumann_neighbours(&self, ix: usize) -> impl Iterator<Item = usize> {
        let (x, y) = (ix % self.width, ix / self.width);
        [
            (x > 0).then(|| ix - 1),
            (x + 1 < self.width).then(|| ix + 1),
            (y > 0).then(|| ix - self.width),
            (y + 1 < self.height).then(|| ix + self.width),
        ]
        .into_iter()
        .flatten()
    }

    /// Updates the wall flag of a cell. Joins newly connected components and flags the
    /// components as dirty if components are (potentially) broken apart into multiple.
    pub fn set_wall(&mut self, ix: usize, blocked: bool) {
        if blocked {
            if !self.cells[ix].is_wall {
                self.components_dirty = true;
            }
        } else {
            for n in self.neumann_neighbours(ix) {
                if !self.cells[n].is_wall {
                    self.components.union(ix, n);
                }
            }
        }
        self.cells[ix].is_wall = blocked;
    }

    /// Wipes the search bookkeeping of every cell, keeping walls.
    pub fn clear_search(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_search);
    }

    /// Checks if two cells are on the same component. Only accurate when the components
    /// are not dirty, see [update](Self::update).
    pub fn reachable(&self, a: usize, b: usize) -> bool {
        !self.cells[a].is_wall && !self.cells[b].is_wall && self.components.equiv(a, b)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.len());
        self.components_dirty = false;
        for ix in 0..self.len() {
            if self.cells[ix].is_wall {
                continue;
            }
            let (x, y) = (ix % self.width, ix / self.width);
            // Linking right and down covers every 4-connected pair exactly once
            if x + 1 < self.width && !self.cells[ix + 1].is_wall {
                self.components.union(ix, ix + 1);
            }
            if y + 1 < self.height && !self.cells[ix + self.width].is_wall {
                self.components.union(ix, ix + self.width);
            }
        }
    }
}
