//! Pointer-driven editing of a [Pathfinder]: mapping pixels to cells, the editing tools of a
//! pathfinding sandbox and the shapes they draw.
use crate::Pathfinder;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use itertools::iproduct;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Paints walls under the pointer.
    #[default]
    Wall,
    /// Removes walls under the pointer.
    Erase,
    /// Moves the start marker.
    Start,
    /// Moves the end marker.
    End,
    /// Draws a wall line from where the drag started to the pointer.
    Line,
    /// Fills the rectangle spanned by where the drag started and the pointer with walls.
    Rectangle,
}

/// Maps between canvas pixels and grid cells for a canvas evenly divided into `cols` by
/// `rows` cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub cell_width: f32,
    pub cell_height: f32,
    pub cols: usize,
    pub rows: usize,
}

impl Viewport {
    pub fn new(canvas_width: f32, canvas_height: f32, cols: usize, rows: usize) -> Viewport {
        let (cols, rows) = (cols.max(1), rows.max(1));
        Viewport {
            cell_width: canvas_width / cols as f32,
            cell_height: canvas_height / rows as f32,
            cols,
            rows,
        }
    }

    pub fn for_pathfinder(
        canvas_width: f32,
        canvas_height: f32,
        pathfinder: &Pathfinder,
    ) -> Viewport {
        Viewport::new(
            canvas_width,
            canvas_height,
            pathfinder.width(),
            pathfinder.height(),
        )
    }

    /// The cell under a pixel position, or [None] if the position is off the grid.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<Point> {
        let x = (px / self.cell_width).floor();
        let y = (py / self.cell_height).floor();
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.cols && y < self.rows).then(|| Point::new(x as i32, y as i32))
    }

    /// Pixel rectangle `(left, top, width, height)` covered by a cell.
    pub fn cell_rect(&self, cell: Point) -> (f32, f32, f32, f32) {
        (
            cell.x as f32 * self.cell_width,
            cell.y as f32 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// Cells on the line from `a` to `b`, both included, using Bresenham's algorithm. Consecutive
/// cells touch by edge or corner. The error term is kept in `i64` so any two points can be
/// joined without overflow.
pub fn bresenham(a: Point, b: Point) -> Vec<Point> {
    let (mut x, mut y) = (i64::from(a.x), i64::from(a.y));
    let (x1, y1) = (i64::from(b.x), i64::from(b.y));
    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let mut line = Vec::new();
    loop {
        // x and y never leave the span between the endpoints
        line.push(Point::new(x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    line
}

/// Cells of the filled rectangle with corners `a` and `b` that lie on a `width` by `height`
/// grid, row by row. Empty when the rectangle misses the grid.
pub fn rectangle(a: Point, b: Point, width: usize, height: usize) -> impl Iterator<Item = Point> {
    let (max_x, max_y) = (width as i32 - 1, height as i32 - 1);
    let (x0, x1) = (a.x.min(b.x).max(0), a.x.max(b.x).min(max_x));
    let (y0, y1) = (a.y.min(b.y).max(0), a.y.max(b.y).min(max_y));
    iproduct!(y0..=y1, x0..=x1).map(|(y, x)| Point::new(x, y))
}

/// One drag gesture with a [Tool]: starts on pointer down, continues on every pointer move.
/// All edits go through the [Pathfinder]'s mutators, so they obey the same rules as any other
/// edit; the stroke records which cells actually changed.
#[derive(Clone, Debug)]
pub struct Stroke {
    tool: Tool,
    anchor: Point,
    touched: FxIndexSet<Point>,
}

impl Stroke {
    /// Starts a gesture at `cell` and applies the tool there.
    pub fn begin(tool: Tool, cell: Point, pathfinder: &mut Pathfinder) -> Stroke {
        let mut stroke = Stroke {
            tool,
            anchor: cell,
            touched: FxIndexSet::default(),
        };
        stroke.apply(cell, pathfinder);
        stroke
    }

    /// Continues the gesture with the pointer over `cell`.
    pub fn drag(&mut self, cell: Point, pathfinder: &mut Pathfinder) {
        self.apply(cell, pathfinder);
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Cell where the gesture started.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Distinct cells changed by the gesture, in the order they were first changed.
    pub fn touched(&self) -> impl Iterator<Item = Point> + '_ {
        self.touched.iter().copied()
    }

    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    fn apply(&mut self, cell: Point, pathfinder: &mut Pathfinder) {
        match self.tool {
            Tool::Wall => self.paint(cell, true, pathfinder),
            Tool::Erase => self.paint(cell, false, pathfinder),
            Tool::Start => {
                let before = pathfinder.start();
                pathfinder.set_start(cell.x, cell.y);
                if pathfinder.start() != before {
                    self.touched.insert(cell);
                }
            }
            Tool::End => {
                let before = pathfinder.end();
                pathfinder.set_end(cell.x, cell.y);
                if pathfinder.end() != before {
                    self.touched.insert(cell);
                }
            }
            Tool::Line => {
                let (a, b) = (self.anchor, cell);
                if !(pathfinder.in_bounds(a.x, a.y) && pathfinder.in_bounds(b.x, b.y)) {
                    return;
                }
                for p in bresenham(a, b) {
                    self.paint(p, true, pathfinder);
                }
            }
            Tool::Rectangle => {
                let (width, height) = (pathfinder.width(), pathfinder.height());
                for p in rectangle(self.anchor, cell, width, height) {
                    self.paint(p, true, pathfinder);
                }
            }
        }
    }

    fn paint(&mut self, cell: Point, wall: bool, pathfinder: &mut Pathfinder) {
        let before = pathfinder.is_wall(cell.x, cell.y);
        pathfinder.set_wall(cell.x, cell.y, wall);
        if pathfinder.is_wall(cell.x, cell.y) != before {
            self.touched.insert(cell);
        }
    }
}
