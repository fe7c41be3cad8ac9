use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweeper_core::PlayEngine;

use crate::{Result, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything persisted for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: GameId,
    pub owner: String,
    pub engine: PlayEngine,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Durable home for games, keyed by id.
///
/// Implementations only store and fetch; move ordering is the caller's job.
pub trait GameStore: Send + Sync {
    fn allocate_id(&self) -> Result<GameId>;

    fn load(&self, id: GameId) -> Result<Option<StoredGame>>;

    fn save(&self, game: &StoredGame) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: u64,
    games: HashMap<GameId, StoredGame>,
}

/// Process-local store, used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.games.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    fn allocate_id(&self) -> Result<GameId> {
        let mut inner = self.inner.lock().map_err(|_| ServiceError::LockPoisoned)?;
        inner.next_id += 1;
        Ok(GameId(inner.next_id))
    }

    fn load(&self, id: GameId) -> Result<Option<StoredGame>> {
        let inner = self.inner.lock().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(inner.games.get(&id).cloned())
    }

    fn save(&self, game: &StoredGame) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| ServiceError::LockPoisoned)?;
        inner.games.insert(game.id, game.clone());
        Ok(())
    }
}

/// One pretty-printed JSON document per game, named `<id>.json`.
#[derive(Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
    id_lock: Mutex<()>,
}

impl JsonDirStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            id_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: GameId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn highest_id(&self) -> Result<u64> {
        let mut highest = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let id = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse::<u64>().ok());
                if let Some(id) = id {
                    highest = highest.max(id);
                }
            }
        }
        Ok(highest)
    }
}

impl GameStore for JsonDirStore {
    fn allocate_id(&self) -> Result<GameId> {
        let _guard = self.id_lock.lock().map_err(|_| ServiceError::LockPoisoned)?;
        let id = GameId(self.highest_id()? + 1);
        // reserve the id so a second allocation does not hand it out again
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(id))?;
        Ok(id)
    }

    fn load(&self, id: GameId) -> Result<Option<StoredGame>> {
        let text = match fs::read_to_string(self.path_for(id)) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            // reserved but never saved
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, game: &StoredGame) -> Result<()> {
        let path = self.path_for(game.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(game)?)?;
        fs::rename(&tmp, &path)?;
        log::trace!("Saved game {} to {}", game.id, path.display());
        Ok(())
    }
}
