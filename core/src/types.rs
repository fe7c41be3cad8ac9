use ndarray::Array2;

use crate::{GameError, Result};

/// Single coordinate axis used for the board side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Converts untrusted integer coordinates into board coordinates for a `size × size` grid.
pub fn to_coords(size: Coord, x: i64, y: i64) -> Result<Coord2> {
    let in_range = |v: i64| -> Option<Coord> {
        let v = Coord::try_from(v).ok()?;
        (v < size).then_some(v)
    };

    match (in_range(x), in_range(y)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(GameError::OutOfBounds),
    }
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let bounds = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Shifts `coords` by `offset`, yielding a value only when it stays on the grid.
fn shift(coords: Coord2, offset: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(offset.0)?;
    let y = coords.1.checked_add_signed(offset.1)?;
    (x < bounds.0 && y < bounds.1).then_some((x, y))
}

/// In-bounds neighbors of a cell, at most 8.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&offset) = OFFSETS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(next) = shift(self.center, offset, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}
