use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Draws per cell allowed before switching from rejection sampling to picking among free cells.
pub const DEFAULT_DRAWS_PER_CELL: u32 = 64;

/// Places mines by drawing uniformly random coordinates and rejecting the ones already mined.
///
/// Generation is deterministic for a given seed and config.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    max_draws: Option<u64>,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_draws: None,
        }
    }

    /// Caps the number of rejection-sampling draws, `None` means uncapped.
    pub fn with_max_draws(mut self, max_draws: Option<u64>) -> Self {
        self.max_draws = max_draws;
        self
    }

    /// Cap of `draws_per_cell` draws for every cell of the board.
    pub fn with_draws_per_cell(self, config: GameConfig, draws_per_cell: u32) -> Self {
        let max_draws = u64::from(config.total_cells()) * u64::from(draws_per_cell);
        self.with_max_draws(Some(max_draws))
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let mut board = Board::new(config.size).expect("config size is validated");
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut draws: u64 = 0;
        while board.mine_count() < config.mines {
            if self.max_draws.is_some_and(|max| draws >= max) {
                log::warn!(
                    "Gave up rejection sampling after {} draws with {} of {} mines placed",
                    draws,
                    board.mine_count(),
                    config.mines
                );
                place_on_free_cells(&mut board, &mut rng, config.mines);
                break;
            }

            draws += 1;
            let coords = (
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
            );
            board.place_mine(coords);
        }

        log::debug!(
            "Generated {}x{} board with {} mines in {} draws",
            config.size,
            config.size,
            board.mine_count(),
            draws
        );
        board
    }
}

/// Finishes placement by picking uniformly among the still-free cells, always terminates.
fn place_on_free_cells(board: &mut Board, rng: &mut SmallRng, mines: CellCount) {
    while board.mine_count() < mines {
        let free = board.hidden_safe_count();
        if free == 0 {
            break;
        }

        let pick = rng.random_range(0..free);
        let picked = board.hidden_safe_cells().nth(pick.into());
        match picked {
            Some(coords) => {
                board.place_mine(coords);
            }
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn mines_of(board: &Board) -> Vec<Coord2> {
        board
            .iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn places_exact_number_of_distinct_mines() {
        let config = GameConfig::new(8, 10).unwrap();

        for seed in 0..32 {
            let board = RandomBoardGenerator::new(seed).generate(config);

            assert_eq!(board.mine_count(), 10);
            assert_eq!(mines_of(&board).len(), 10);
            assert_eq!(board.hidden_safe_count(), 54);
            assert!(board.iter().all(|(_, cell)| cell.is_mine() || cell.is_hidden()));
            assert!(board.is_active());
        }
    }

    #[test]
    fn same_seed_gives_same_board() {
        let config = GameConfig::new(10, 20).unwrap();

        let a = RandomBoardGenerator::new(7).generate(config);
        let b = RandomBoardGenerator::new(7).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn capped_generation_still_fills_dense_boards() {
        let config = GameConfig::new(4, 15).unwrap();

        let board = RandomBoardGenerator::new(3)
            .with_max_draws(Some(0))
            .generate(config);

        assert_eq!(board.mine_count(), 15);
        assert_eq!(board.hidden_safe_count(), 1);
    }

    #[test]
    fn fallback_after_partial_sampling_places_remaining_mines() {
        let config = GameConfig::new(10, 90).unwrap();

        let board = RandomBoardGenerator::new(5)
            .with_max_draws(Some(20))
            .generate(config);

        assert_eq!(board.mine_count(), 90);
        assert_eq!(mines_of(&board).len(), 90);
        assert_eq!(board.hidden_safe_cells().count(), 10);
    }

    #[test]
    fn draws_per_cell_scales_with_board() {
        let config = GameConfig::new(5, 3).unwrap();

        let generator = RandomBoardGenerator::new(0).with_draws_per_cell(config, 4);

        assert_eq!(generator.max_draws, Some(100));
    }
}
