use alloc::collections::{BTreeMap, VecDeque};

use crate::*;

/// Cells uncovered by one chain clear, with their adjacent mine counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealedRegion {
    cells: BTreeMap<Coord2, u8>,
}

impl RevealedRegion {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains_key(&coords)
    }

    pub fn count_at(&self, coords: Coord2) -> Option<u8> {
        self.cells.get(&coords).copied()
    }

    /// `(coords, count)` pairs ordered by `x`, then `y`.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, u8)> + '_ {
        self.cells.iter().map(|(&coords, &count)| (coords, count))
    }

    /// Cells that will become [`Cell::Empty`].
    pub fn zero_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter().filter(|&(_, count)| count == 0).map(|(coords, _)| coords)
    }

    /// Numbered cells on the edge of the region.
    pub fn boundary_cells(&self) -> impl Iterator<Item = (Coord2, u8)> + '_ {
        self.iter().filter(|&(_, count)| count > 0)
    }

    /// Stamps every cell of the region onto `board`.
    pub fn apply(&self, board: &mut Board) -> Result<()> {
        for (coords, count) in self.iter() {
            board.stamp(coords, count)?;
        }
        Ok(())
    }
}

/// Finds the maximal zero-count region around `start` plus its numbered boundary.
///
/// Only hidden cells are collected, so the result can be stamped as-is. The board is not modified; a start cell
/// with a non-zero count yields a region holding just that cell.
pub fn flood_fill(board: &Board, start: Coord2) -> Result<RevealedRegion> {
    let start = board.validate_coords(start)?;
    if !board[start].is_hidden() {
        return Err(GameError::InvalidTransition);
    }

    let mut region = RevealedRegion::default();
    let start_count = count_adjacent_mines(board, start);
    region.cells.insert(start, start_count);
    if start_count > 0 {
        return Ok(region);
    }

    let mut frontier = VecDeque::from([start]);
    while let Some(coords) = frontier.pop_front() {
        for neighbor in board.iter_neighbors(coords) {
            if region.contains(neighbor) || !board[neighbor].is_hidden() {
                continue;
            }

            let count = count_adjacent_mines(board, neighbor);
            region.cells.insert(neighbor, count);
            log::trace!("Flood reached {:?}, mine count: {}", neighbor, count);

            if count == 0 {
                frontier.push_back(neighbor);
            }
        }
    }

    log::debug!("Flood fill from {:?} uncovered {} cells", start, region.len());
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn single_mine_corner_region_covers_all_safe_cells() {
        let board = board(3, &[(2, 2)]);

        let region = flood_fill(&board, (0, 0)).unwrap();

        assert_eq!(region.len(), 8);
        assert!(!region.contains((2, 2)));
        assert_eq!(region.count_at((1, 1)), Some(1));
        assert_eq!(region.count_at((1, 2)), Some(1));
        assert_eq!(region.count_at((2, 1)), Some(1));
        assert_eq!(region.zero_cells().count(), 5);
    }

    #[test]
    fn wall_of_mines_stops_the_region() {
        // column y = 2 is fully mined, cells with y >= 3 stay out of reach
        let wall: [Coord2; 5] = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let board = board(5, &wall);

        let region = flood_fill(&board, (0, 0)).unwrap();

        assert_eq!(region.len(), 10);
        assert!(region.iter().all(|((_, y), _)| y < 2));
        assert_eq!(region.boundary_cells().count(), 5);
        assert!(region.boundary_cells().all(|((_, y), _)| y == 1));
    }

    #[test]
    fn region_is_maximal_and_independent_of_start() {
        let board = board(6, &[(0, 5), (5, 0)]);

        let from_corner = flood_fill(&board, (0, 0)).unwrap();
        let from_other_zero = flood_fill(&board, (5, 5)).unwrap();

        assert_eq!(from_corner, from_other_zero);
        assert_eq!(from_corner.len(), 34);
        for (coords, count) in from_corner.iter() {
            if count == 0 {
                for neighbor in board.iter_neighbors(coords) {
                    assert!(from_corner.contains(neighbor) || board.contains_mine(neighbor));
                }
            }
        }
    }

    #[test]
    fn already_revealed_cells_are_not_collected() {
        let mut board = board(4, &[(3, 3)]);
        board.stamp((0, 3), 0).unwrap();

        let region = flood_fill(&board, (0, 0)).unwrap();

        assert!(!region.contains((0, 3)));
        assert_eq!(region.len(), 14);
        region.apply(&mut board).unwrap();
        assert_eq!(board.hidden_safe_count(), 0);
    }

    #[test]
    fn numbered_start_is_not_expanded() {
        let board = board(3, &[(2, 2)]);

        let region = flood_fill(&board, (1, 1)).unwrap();

        assert_eq!(region.len(), 1);
        assert_eq!(region.count_at((1, 1)), Some(1));
    }

    #[test]
    fn revealed_start_is_rejected() {
        let mut board = board(3, &[(2, 2)]);
        board.stamp((0, 0), 0).unwrap();

        assert_eq!(flood_fill(&board, (0, 0)), Err(GameError::InvalidTransition));
        assert_eq!(flood_fill(&board, (3, 0)), Err(GameError::OutOfBounds));
    }
}
