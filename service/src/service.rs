use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sweeper_core::*;
use sweeper_protocol::{
    CreateGameRequest, FlagReport, FlagRequest, GameSnapshot, GameStarted, GameStatus, MarkReport,
    MarkRequest, RevealedCell,
};

use crate::{GameId, GameStore, Result, ServiceError, Settings, StoredGame};

/// Game lifecycle on top of an injected store.
///
/// Moves on the same game are serialized through a per-game lock held across load, play and save. Games never
/// share a lock, so independent games proceed in parallel. A lock lives in the map only while some caller holds
/// it.
pub struct GameService<S> {
    store: S,
    settings: Settings,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store,
            settings,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn create_game(&self, size: i64, mines: i64, owner: &str) -> Result<GameStarted> {
        let config = GameConfig::new(size, mines)?;
        let id = self.store.allocate_id()?;
        let seed = match self.settings.seed {
            Some(seed) => seed.wrapping_add(id.0),
            None => rand::random(),
        };

        let board = RandomBoardGenerator::new(seed)
            .with_draws_per_cell(config, self.settings.max_draws_per_cell)
            .generate(config);
        let game = StoredGame {
            id,
            owner: owner.to_owned(),
            engine: PlayEngine::new(board),
            created_at: Utc::now(),
            ended_at: None,
        };
        self.store.save(&game)?;
        log::info!(
            "Game {} started for {}: {}x{} with {} mines",
            id,
            owner,
            config.size,
            config.size,
            config.mines
        );

        Ok(GameStarted {
            map: render_rows(&player_view(game.engine.board())),
            game_id: id.0,
            mine_count: game.engine.total_mines(),
        })
    }

    pub fn mark(&self, id: GameId, x: i64, y: i64) -> Result<MarkReport> {
        self.with_game(id, |game| {
            let coords = to_coords(game.engine.size(), x, y)?;
            let outcome = game.engine.mark(coords)?;

            if outcome.is_terminal() {
                game.ended_at = Some(Utc::now());
                log::info!("Game {} ended: {:?}", id, game.engine.state());
            }
            Ok(report(&outcome, game.engine.board()))
        })
    }

    pub fn flag(&self, id: GameId, x: i64, y: i64) -> Result<FlagReport> {
        self.with_game(id, |game| {
            let coords = to_coords(game.engine.size(), x, y)?;
            let flagged = game.engine.toggle_flag(coords)?;

            Ok(FlagReport {
                flagged,
                flag_count: game.engine.flag_count(),
            })
        })
    }

    /// Current view of a game. Active games show the masked map, finished games the full reveal.
    pub fn game(&self, id: GameId) -> Result<GameSnapshot> {
        let game = self.load(id)?;
        let engine = &game.engine;
        let matrix = if engine.is_active() {
            player_view(engine.board())
        } else {
            full_reveal(engine.board())
        };

        Ok(GameSnapshot {
            map: render_rows(&matrix),
            mine_count: engine.total_mines(),
            flag_count: engine.flag_count(),
            mark_count: engine.mark_count(),
            status: status(engine.state()),
        })
    }

    pub fn handle_create(&self, request: &CreateGameRequest, owner: &str) -> Result<GameStarted> {
        self.create_game(request.size, request.mines, owner)
    }

    pub fn handle_mark(&self, request: &MarkRequest) -> Result<MarkReport> {
        self.mark(GameId(request.game_id), request.x, request.y)
    }

    pub fn handle_flag(&self, request: &FlagRequest) -> Result<FlagReport> {
        self.flag(GameId(request.game_id), request.x, request.y)
    }

    fn load(&self, id: GameId) -> Result<StoredGame> {
        self.store.load(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Runs `play` on an active game under its lock and saves the game when `play` succeeds.
    fn with_game<T>(
        &self,
        id: GameId,
        play: impl FnOnce(&mut StoredGame) -> Result<T>,
    ) -> Result<T> {
        let lock = self.lock_for(id)?;
        let result = lock
            .lock()
            .map_err(|_| ServiceError::LockPoisoned)
            .and_then(|_guard| {
                let mut game = self.load(id)?;
                game.engine.check_active()?;
                let value = play(&mut game)?;
                self.store.save(&game)?;
                Ok(value)
            });
        self.release_lock(id, lock)?;
        result
    }

    fn lock_for(&self, id: GameId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(locks.entry(id).or_default().clone())
    }

    fn release_lock(&self, id: GameId, lock: Arc<Mutex<()>>) -> Result<()> {
        let mut locks = self.locks.lock().map_err(|_| ServiceError::LockPoisoned)?;
        // clones are only taken under `locks`, so two owners means the map and this caller
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
        Ok(())
    }
}

fn status(state: EngineState) -> GameStatus {
    match state {
        EngineState::Active => GameStatus::Active,
        EngineState::Won => GameStatus::Won,
        EngineState::Lost => GameStatus::Lost,
    }
}

fn report(outcome: &MarkOutcome, board: &Board) -> MarkReport {
    match outcome {
        MarkOutcome::Dead => MarkReport::Dead {
            map: render_rows(&full_reveal(board)),
        },
        MarkOutcome::Win => MarkReport::Win {
            map: render_rows(&full_reveal(board)),
        },
        MarkOutcome::Clear(count) => MarkReport::Clear { num_bombs: *count },
        MarkOutcome::SuperClear(region) => MarkReport::Superclear {
            num_bombs: 0,
            empties: region
                .iter()
                .map(|((x, y), count)| RevealedCell { x, y, count })
                .collect(),
        },
    }
}
