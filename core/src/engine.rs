use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Active
    }
}

/// Result of a single accepted mark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A mine was hit, the game is lost.
    Dead,
    /// Every safe cell is revealed, the game is won.
    Win,
    /// One cell revealed with this many adjacent mines.
    Clear(u8),
    /// A zero cell opened this region.
    SuperClear(RevealedRegion),
}

impl MarkOutcome {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Dead | Self::Win)
    }
}

/// Authoritative state of one game, mutated only through [`PlayEngine::mark`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    state: EngineState,
    triggered_mine: Option<Coord2>,
    mark_count: u32,
}

impl PlayEngine {
    pub fn new(board: Board) -> Self {
        let state = if board.is_active() {
            EngineState::Active
        } else if board.hidden_safe_count() == 0 {
            EngineState::Won
        } else {
            EngineState::Lost
        };

        Self {
            board,
            state,
            triggered_mine: None,
            mark_count: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.board.is_active()
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn flag_count(&self) -> CellCount {
        self.board.flag_count()
    }

    /// Number of marks accepted so far.
    pub fn mark_count(&self) -> u32 {
        self.mark_count
    }

    /// Plays a move at `coords`.
    ///
    /// Every check runs before the board is touched, so an error leaves the game exactly as it was. A finished
    /// game rejects every move with [`GameError::GameNotActive`], whatever the coordinates. The cell and any
    /// flood-filled region are stamped first, then the win condition is evaluated.
    pub fn mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_active()?;
        let coords = self.board.validate_coords(coords)?;

        let cell = self.board[coords];
        if cell.is_revealed() || cell.is_flagged() {
            return Err(GameError::InvalidTransition);
        }

        self.mark_count += 1;

        if cell.is_mine() {
            log::debug!("Mine hit at {:?}", coords);
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(MarkOutcome::Dead);
        }

        let count = count_adjacent_mines(&self.board, coords);
        let region = if count == 0 {
            let region = flood_fill(&self.board, coords)?;
            region.apply(&mut self.board)?;
            Some(region)
        } else {
            self.board.stamp(coords, count)?;
            None
        };
        log::debug!("Marked {:?}, mine count: {}", coords, count);

        if self.board.hidden_safe_count() == 0 {
            self.end_game(true);
            return Ok(MarkOutcome::Win);
        }

        Ok(match region {
            Some(region) => MarkOutcome::SuperClear(region),
            None => MarkOutcome::Clear(count),
        })
    }

    /// Flags or unflags an unrevealed cell, returns whether it is flagged afterwards.
    ///
    /// Flags do not count as marks and never end the game.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        self.check_active()?;
        let flagged = self.board.toggle_flag(coords)?;
        log::debug!("Flag at {:?}: {}", coords, flagged);
        Ok(flagged)
    }

    fn end_game(&mut self, won: bool) {
        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        self.board.retire();
        log::debug!("Game ended: {:?}", self.state);
    }

    pub fn check_active(&self) -> Result<()> {
        if self.board.is_active() && !self.state.is_finished() {
            Ok(())
        } else {
            Err(GameError::GameNotActive)
        }
    }
}
