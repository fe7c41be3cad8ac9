use ndarray::Array2;

use crate::*;

/// Number of mines among the up-to-8 neighbors of `coords`.
///
/// Positions off the grid are skipped. The cell itself does not need to be revealed.
pub fn count_adjacent_mines(board: &Board, coords: Coord2) -> u8 {
    board.iter_neighbors(coords).filter(|&pos| board.contains_mine(pos)).count() as u8
}

/// Adjacent mine counts for every cell of the board, mines included.
pub fn adjacency_map(board: &Board) -> Array2<u8> {
    let size = board.size();
    Array2::from_shape_fn((size, size).to_nd_index(), |(x, y)| {
        count_adjacent_mines(board, (x as Coord, y as Coord))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn edge_cells_only_count_in_grid_neighbors() {
        let board = board(3, &[(0, 1), (1, 0), (1, 1)]);

        assert_eq!(count_adjacent_mines(&board, (0, 0)), 3);
        assert_eq!(count_adjacent_mines(&board, (2, 2)), 1);
        assert_eq!(count_adjacent_mines(&board, (2, 0)), 2);
    }

    #[test]
    fn surrounded_cell_counts_eight() {
        let ring = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)];
        let board = board(3, &ring);

        assert_eq!(count_adjacent_mines(&board, (1, 1)), 8);
    }

    #[test]
    fn counts_are_symmetric_under_rotation_and_reflection() {
        let size = 5;
        let mines = [(0, 1), (3, 3), (4, 0)];
        let last = size - 1;
        let rotate = |(x, y): Coord2| (y, last - x);
        let reflect = |(x, y): Coord2| (last - x, y);

        let original = board(size, &mines);
        let rotated = board(size, &mines.map(rotate));
        let reflected = board(size, &mines.map(reflect));

        for x in 0..size {
            for y in 0..size {
                let count = count_adjacent_mines(&original, (x, y));
                assert_eq!(count, count_adjacent_mines(&rotated, rotate((x, y))));
                assert_eq!(count, count_adjacent_mines(&reflected, reflect((x, y))));
            }
        }
    }

    #[test]
    fn map_matches_single_cell_counts() {
        let board = board(3, &[(2, 2)]);
        let map = adjacency_map(&board);

        assert_eq!(map[[1, 1]], 1);
        assert_eq!(map[[0, 0]], 0);
        assert_eq!(map[[2, 2]], 0);
        assert_eq!(map.iter().filter(|&&count| count == 1).count(), 3);
    }
}
