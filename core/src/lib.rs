#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use adjacency::*;
pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use flood::*;
pub use generator::*;
pub use render::*;
pub use types::*;

mod adjacency;
mod board;
mod cell;
mod engine;
mod error;
mod flood;
mod generator;
mod render;
mod types;

/// Validated parameters for a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    /// Checks untrusted input, the size is checked before the mine count.
    pub fn new(size: i64, mines: i64) -> Result<Self> {
        let size = Coord::try_from(size)
            .ok()
            .filter(|&size| size > 0)
            .ok_or(GameError::InvalidSize)?;

        let total = i64::from(mult(size, size));
        if mines <= 0 || mines >= total {
            return Err(GameError::InvalidMineCount);
        }

        Ok(Self {
            size,
            mines: mines as CellCount,
        })
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Generates a fresh seeded board for `size` and `mines`.
pub fn generate(size: i64, mines: i64, seed: u64) -> Result<Board> {
    let config = GameConfig::new(size, mines)?;
    Ok(RandomBoardGenerator::new(seed)
        .with_draws_per_cell(config, DEFAULT_DRAWS_PER_CELL)
        .generate(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_bad_size_first() {
        assert_eq!(GameConfig::new(-1, 5), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(0, 5), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(256, 5), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(-8, -8), Err(GameError::InvalidSize));
    }

    #[test]
    fn config_rejects_unsatisfiable_mine_counts() {
        assert_eq!(GameConfig::new(10, -8), Err(GameError::InvalidMineCount));
        assert_eq!(GameConfig::new(3, 0), Err(GameError::InvalidMineCount));
        assert_eq!(GameConfig::new(3, 9), Err(GameError::InvalidMineCount));
        assert_eq!(
            GameConfig::new(3, 8),
            Ok(GameConfig { size: 3, mines: 8 })
        );
    }

    #[test]
    fn generate_validates_before_building() {
        assert_eq!(generate(-1, 5, 0), Err(GameError::InvalidSize));

        let board = generate(8, 10, 42).unwrap();
        assert_eq!(board.size(), 8);
        assert_eq!(board.mine_count(), 10);
    }
}
