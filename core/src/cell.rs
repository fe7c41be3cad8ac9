use serde::{Deserialize, Serialize};

/// State of one grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// A mine, never revealed during play.
    Mine,
    /// Revealed with no adjacent mines.
    Empty,
    /// Revealed with `1..=8` adjacent mines.
    Numbered(u8),
    /// Safe and not revealed yet.
    Hidden,
    /// Not revealed and flagged by the player, `mine` records what lies under the flag.
    Flagged { mine: bool },
}

impl Cell {
    /// The revealed state for a cell with `count` adjacent mines.
    pub const fn revealed(count: u8) -> Self {
        if count == 0 { Self::Empty } else { Self::Numbered(count) }
    }

    /// Unflagged and safe, the only state that may be revealed.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine | Self::Flagged { mine: true })
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged { .. })
    }

    /// Safe and not yet revealed, flagged or not.
    pub const fn is_unrevealed_safe(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged { mine: false })
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Empty | Self::Numbered(_))
    }

    /// Adjacent mine count, for revealed cells only.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Empty => Some(0),
            Self::Numbered(count) => Some(count),
            Self::Mine | Self::Hidden | Self::Flagged { .. } => None,
        }
    }

    /// The cell with its flag flipped, `None` for revealed cells.
    pub const fn toggled_flag(self) -> Option<Self> {
        match self {
            Self::Hidden => Some(Self::Flagged { mine: false }),
            Self::Mine => Some(Self::Flagged { mine: true }),
            Self::Flagged { mine: false } => Some(Self::Hidden),
            Self::Flagged { mine: true } => Some(Self::Mine),
            Self::Empty | Self::Numbered(_) => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
