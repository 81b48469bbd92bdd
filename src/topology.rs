use crate::error::{LifeError, Result};

#[derive(Hash, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Default)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    pub const fn new(row: u32, col: u32) -> Self {
        Coord { row, col }
    }
}

impl From<(u32, u32)> for Coord {
    fn from((row, col): (u32, u32)) -> Self {
        Coord { row, col }
    }
}

impl From<Coord> for (u32, u32) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

#[derive(Hash, Copy, Clone, Eq, PartialEq, Debug)]
pub struct Dimensions {
    rows: u32,
    cols: u32,
}

impl Dimensions {
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimensions { rows, cols });
        }
        Ok(Dimensions { rows, cols })
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    pub const fn area(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    pub fn check(&self, coord: Coord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(LifeError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Row-major linear index. The coordinate must be inside the grid.
    #[inline]
    pub const fn index(&self, coord: Coord) -> usize {
        coord.row as usize * self.cols as usize + coord.col as usize
    }

    #[inline]
    pub const fn coord(&self, index: usize) -> Coord {
        Coord {
            row: (index / self.cols as usize) as u32,
            col: (index % self.cols as usize) as u32,
        }
    }

    /// Maps an arbitrary signed position onto the torus.
    pub fn wrap(&self, row: i64, col: i64) -> Coord {
        Coord {
            row: row.rem_euclid(self.rows as i64) as u32,
            col: col.rem_euclid(self.cols as i64) as u32,
        }
    }

    #[inline]
    pub(crate) const fn up(&self, row: u32) -> u32 {
        if row == 0 {
            self.rows - 1
        } else {
            row - 1
        }
    }

    #[inline]
    pub(crate) const fn down(&self, row: u32) -> u32 {
        if row + 1 == self.rows {
            0
        } else {
            row + 1
        }
    }

    #[inline]
    pub(crate) const fn left(&self, col: u32) -> u32 {
        if col == 0 {
            self.cols - 1
        } else {
            col - 1
        }
    }

    #[inline]
    pub(crate) const fn right(&self, col: u32) -> u32 {
        if col + 1 == self.cols {
            0
        } else {
            col + 1
        }
    }
}

/// The 8 toroidal neighbours of `coord`, in the order NW, N, NE, W, E, SW,
/// S, SE.
///
/// On grids with fewer than 3 rows or columns several slots name the same
/// cell (possibly `coord` itself). They are returned as-is; callers count
/// every slot.
pub fn neighbors(coord: Coord, dims: Dimensions) -> [Coord; 8] {
    let (up, down) = (dims.up(coord.row), dims.down(coord.row));
    let (left, right) = (dims.left(coord.col), dims.right(coord.col));
    [
        Coord::new(up, left),
        Coord::new(up, coord.col),
        Coord::new(up, right),
        Coord::new(coord.row, left),
        Coord::new(coord.row, right),
        Coord::new(down, left),
        Coord::new(down, coord.col),
        Coord::new(down, right),
    ]
}

pub fn neighbor_indices(index: usize, dims: Dimensions) -> [usize; 8] {
    let mut out = [0; 8];
    for (slot, coord) in out.iter_mut().zip(neighbors(dims.coord(index), dims)) {
        *slot = dims.index(coord);
    }
    out
}
