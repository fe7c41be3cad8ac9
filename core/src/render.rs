use alloc::string::String;
use alloc::vec::Vec;

use ndarray::Array2;

use crate::*;

pub const HIDDEN_GLYPH: char = 'X';
pub const MINE_GLYPH: char = 'M';
pub const FLAG_GLYPH: char = 'F';

fn count_glyph(count: u8) -> char {
    char::from_digit(count.into(), 10).unwrap_or('?')
}

/// What a player may see: revealed counts and flags, everything else hidden.
pub fn player_view(board: &Board) -> Array2<char> {
    let size = board.size();
    Array2::from_shape_fn((size, size).to_nd_index(), |(x, y)| {
        let cell = board[(x as Coord, y as Coord)];
        match cell.count() {
            Some(count) => count_glyph(count),
            None if cell.is_flagged() => FLAG_GLYPH,
            None => HIDDEN_GLYPH,
        }
    })
}

/// The whole board uncovered, used once a game has ended.
///
/// Cells that were never revealed show the count they would have had.
pub fn full_reveal(board: &Board) -> Array2<char> {
    let counts = adjacency_map(board);
    let size = board.size();
    Array2::from_shape_fn((size, size).to_nd_index(), |(x, y)| {
        if board.contains_mine((x as Coord, y as Coord)) {
            MINE_GLYPH
        } else {
            count_glyph(counts[(x, y)])
        }
    })
}

/// One string per row, rows indexed by `x`.
pub fn render_rows(matrix: &Array2<char>) -> Vec<String> {
    matrix.rows().into_iter().map(|row| row.iter().collect::<String>()).collect()
}
