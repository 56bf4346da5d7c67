use crate::pathing_grid::Cell;
use crate::search::SearchStatus;
use grid_util::point::Point;
use serde::Serialize;

/// What a renderer should paint a cell as. When a cell has several roles the most specific
/// one wins: end, start, path, open, closed, wall, empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CellRole {
    Empty,
    Wall,
    Closed,
    Open,
    Path,
    Start,
    End,
}

impl CellRole {
    /// Single character used by the text rendering of a grid.
    pub const fn symbol(self) -> char {
        match self {
            CellRole::Empty => '.',
            CellRole::Wall => '#',
            CellRole::Closed => 'x',
            CellRole::Open => 'o',
            CellRole::Path => '*',
            CellRole::Start => 'S',
            CellRole::End => 'G',
        }
    }
}

/// Read-only view of the engine between two steps. Cells are addressed by their flat index
/// `y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Snapshot<'a> {
    pub width: usize,
    pub height: usize,
    pub cells: &'a [Cell],
    pub start: usize,
    pub end: usize,
    pub current: Option<usize>,
    pub path: &'a [usize],
    pub status: SearchStatus,
}

impl<'a> Snapshot<'a> {
    pub fn point(&self, ix: usize) -> Point {
        Point::new((ix % self.width) as i32, (ix / self.width) as i32)
    }

    /// Role of the cell with flat index `ix`, or [None] past the last cell.
    pub fn role_at(&self, ix: usize) -> Option<CellRole> {
        let cell = self.cells.get(ix)?;
        let role = if ix == self.end {
            CellRole::End
        } else if ix == self.start {
            CellRole::Start
        } else if cell.on_path {
            CellRole::Path
        } else if cell.in_open {
            CellRole::Open
        } else if cell.in_closed {
            CellRole::Closed
        } else if cell.is_wall {
            CellRole::Wall
        } else {
            CellRole::Empty
        };
        Some(role)
    }

    /// Role of the cell at `(x, y)`, or [None] outside the grid.
    pub fn role(&self, x: i32, y: i32) -> Option<CellRole> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.role_at(y as usize * self.width + x as usize)
    }

    /// Every cell with its position and role, row by row.
    pub fn roles(&self) -> impl Iterator<Item = (Point, CellRole)> + '_ {
        (0..self.cells.len()).filter_map(move |ix| Some((self.point(ix), self.role_at(ix)?)))
    }

    pub fn open_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.points_where(|c| c.in_open)
    }

    pub fn closed_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.points_where(|c| c.in_closed)
    }

    pub fn path_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.path.iter().map(move |&ix| self.point(ix))
    }

    fn points_where(&self, predicate: fn(&Cell) -> bool) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| predicate(c))
            .map(move |(ix, _)| self.point(ix))
    }
}
