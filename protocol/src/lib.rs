use serde::{Deserialize, Serialize};

/// Parameters for starting a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub size: i64,
    pub mines: i64,
}

/// A move against an existing game, coordinates start at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRequest {
    pub game_id: u64,
    pub x: i64,
    pub y: i64,
}

/// Puts a flag on a cell or takes it off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRequest {
    pub game_id: u64,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStarted {
    pub map: Vec<String>,
    pub game_id: u64,
    pub mine_count: u16,
}

/// One cell uncovered by a chain clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub x: u8,
    pub y: u8,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MarkReport {
    /// Mine hit, `map` is the fully revealed board.
    Dead { map: Vec<String> },
    /// Board cleared, `map` is the fully revealed board.
    Win { map: Vec<String> },
    Clear { num_bombs: u8 },
    Superclear {
        num_bombs: u8,
        empties: Vec<RevealedCell>,
    },
}

impl MarkReport {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dead { .. } | Self::Win { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub flagged: bool,
    pub flag_count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub map: Vec<String>,
    pub mine_count: u16,
    #[serde(default)]
    pub flag_count: u16,
    pub mark_count: u32,
    pub status: GameStatus,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub tx: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, tx: T) -> Self {
        Self {
            message: message.into(),
            tx,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidSize,
    InvalidMineCount,
    OutOfBounds,
    GameNotActive,
    InvalidTransition,
    NotFound,
    Internal,
}

/// Failed response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub messages: String,
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

pub fn from_json<'a, T: Deserialize<'a>>(text: &'a str) -> serde_json::Result<T> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mark_report_is_tagged_by_status() {
        let report = MarkReport::Superclear {
            num_bombs: 0,
            empties: vec![RevealedCell { x: 0, y: 1, count: 2 }],
        };

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({
                "status": "superclear",
                "num_bombs": 0,
                "empties": [{ "x": 0, "y": 1, "count": 2 }],
            })
        );
    }

    #[test]
    fn envelope_wraps_payload_under_tx() {
        let started = GameStarted {
            map: vec!["XX".into(), "XX".into()],
            game_id: 4,
            mine_count: 1,
        };

        let text = to_json(&Envelope::new("Game started", started.clone())).unwrap();
        let back: Envelope<GameStarted> = from_json(&text).unwrap();

        assert_eq!(back.message, "Game started");
        assert_eq!(back.tx, started);
    }

    #[test]
    fn mark_request_parses_negative_coordinates() {
        let request: MarkRequest = from_json(r#"{"game_id": 1, "x": -1, "y": 3}"#).unwrap();

        assert_eq!(request.x, -1);
    }

    #[test]
    fn snapshot_without_flag_count_defaults_to_zero() {
        let snapshot: GameSnapshot = from_json(
            r#"{"map": ["XX", "XX"], "mine_count": 1, "mark_count": 0, "status": "active"}"#,
        )
        .unwrap();

        assert_eq!(snapshot.flag_count, 0);
        assert_eq!(snapshot.status, GameStatus::Active);
    }

    #[test]
    fn error_kind_uses_snake_case() {
        let report = ErrorReport {
            kind: ErrorKind::GameNotActive,
            messages: "Game is not active".into(),
        };

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["kind"], "game_not_active");
    }
}
