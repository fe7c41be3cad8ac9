use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square minefield with write-once reveal semantics.
///
/// Every position holds exactly one [`Cell`]. Mines are placed while the board is being built and never move;
/// safe cells go from [`Cell::Hidden`] to a revealed state once and stay there. A flagged cell is exempt from
/// revealing until the flag is removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    hidden_count: CellCount,
    #[serde(default)]
    flag_count: CellCount,
    active: bool,
}

impl Board {
    /// A `size × size` board with every cell hidden and no mines.
    pub fn new(size: Coord) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }

        Ok(Self {
            cells: Array2::default((size, size).to_nd_index()),
            mine_count: 0,
            hidden_count: mult(size, size),
            flag_count: 0,
            active: true,
        })
    }

    /// Builds a board with mines at exactly the given positions, duplicates are ignored.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(size)?;
        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            board.place_mine(coords);
        }
        Ok(board)
    }

    pub fn size(&self) -> Coord {
        // both axes are always equal
        Coord::try_from(self.cells.nrows()).unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    /// Number of cells that are still hidden and hold no mine.
    pub fn hidden_safe_count(&self) -> CellCount {
        self.hidden_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    /// Positions that are not revealed yet and hold no mine, flagged or not.
    pub fn hidden_safe_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter()
            .filter(|(_, cell)| cell.is_unrevealed_safe())
            .map(|(coords, _)| coords)
    }

    /// All cells in row-major order, rows indexed by `x`.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((x, y), &cell)| ((x as Coord, y as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        count_adjacent_mines(self, coords)
    }

    /// Reveals a hidden safe cell with its adjacent mine count.
    ///
    /// Fails with [`GameError::InvalidTransition`] unless the cell is [`Cell::Hidden`]. The same error covers a
    /// board restored with a hidden count that is already exhausted.
    pub fn stamp(&mut self, coords: Coord2, count: u8) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        let hidden_count = self
            .hidden_count
            .checked_sub(1)
            .ok_or(GameError::InvalidTransition)?;
        let slot = &mut self.cells[coords.to_nd_index()];
        if !slot.is_hidden() {
            return Err(GameError::InvalidTransition);
        }

        *slot = Cell::revealed(count);
        self.hidden_count = hidden_count;
        Ok(*slot)
    }

    /// Puts a flag on an unrevealed cell or takes it off, returns whether the cell is flagged afterwards.
    ///
    /// Fails with [`GameError::InvalidTransition`] on revealed cells.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let slot = &mut self.cells[coords.to_nd_index()];
        let toggled = slot.toggled_flag().ok_or(GameError::InvalidTransition)?;

        *slot = toggled;
        if toggled.is_flagged() {
            self.flag_count = self.flag_count.saturating_add(1);
        } else {
            self.flag_count = self.flag_count.saturating_sub(1);
        }
        Ok(toggled.is_flagged())
    }

    /// Places a mine on a hidden cell, returns `false` when the cell is taken.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        let Some(hidden_count) = self.hidden_count.checked_sub(1) else {
            return false;
        };
        let slot = &mut self.cells[coords.to_nd_index()];
        match slot {
            Cell::Hidden => {
                *slot = Cell::Mine;
                self.mine_count += 1;
                self.hidden_count = hidden_count;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn retire(&mut self) {
        self.active = false;
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
