use serde::{Deserialize, Serialize};

/// A single board cell. Mine and adjacency data are fixed when the board is
/// generated; only the revealed and flagged bits change during play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    adjacent_mines: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(mine: bool, adjacent_mines: u8) -> Self {
        Self {
            mine,
            adjacent_mines,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Safe, hidden and not flagged: a candidate for hints.
    pub const fn is_hint_candidate(self) -> bool {
        !self.mine && !self.revealed && !self.flagged
    }

    /// Whether flood fill may open this cell.
    pub(crate) const fn is_openable(self) -> bool {
        !self.revealed && !self.flagged
    }

    pub(crate) fn set_revealed(&mut self) {
        debug_assert!(!self.flagged, "revealed cells cannot carry a flag");
        self.revealed = true;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        debug_assert!(!self.revealed, "only hidden cells can be flagged");
        self.flagged = flagged;
    }

    pub(crate) fn clear_state(&mut self) {
        self.revealed = false;
        self.flagged = false;
    }
}

/// Canonical player-visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine shown at the end of the game.
    Mine,
    /// The mine that ended the game.
    Detonated,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}
