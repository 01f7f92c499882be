use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Play state of a board as plain bitmasks, detached from the mine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub revealed: Array2<bool>,
    pub flagged: Array2<bool>,
    pub detonated: Option<Coord2>,
}

impl BoardSnapshot {
    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.revealed.dim() != expected || self.flagged.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        let overlap = self
            .revealed
            .iter()
            .zip(self.flagged.iter())
            .any(|(&revealed, &flagged)| revealed && flagged);
        if overlap {
            return Err(GameError::InvalidSnapshot);
        }

        if let Some(coords) = self.detonated {
            if coords.0 >= self.size.0
                || coords.1 >= self.size.1
                || !self.revealed[coords.to_nd_index()]
            {
                return Err(GameError::InvalidSnapshot);
            }
        }

        Ok(())
    }
}

impl Board {
    pub fn snapshot(&self) -> BoardSnapshot {
        let size = self.size();
        let mut revealed = Array2::from_elem(size.to_nd_index(), false);
        let mut flagged = Array2::from_elem(size.to_nd_index(), false);

        for coords in self.iter_coords() {
            let cell = self.cell(coords);
            revealed[coords.to_nd_index()] = cell.is_revealed();
            flagged[coords.to_nd_index()] = cell.is_flagged();
        }

        BoardSnapshot {
            size,
            revealed,
            flagged,
            detonated: self.detonated(),
        }
    }

    /// Replaces the play state with `snapshot`. The board must carry the same
    /// mine layout the snapshot was taken from; counters are recomputed.
    pub fn restore(&mut self, snapshot: &BoardSnapshot) -> Result<()> {
        if snapshot.size != self.size() {
            return Err(GameError::InvalidBoardShape);
        }
        snapshot.validate()?;
        if let Some(coords) = snapshot.detonated {
            if !self.cell(coords).is_mine() {
                return Err(GameError::InvalidSnapshot);
            }
        }

        let mut revealed_count: CellCount = 0;
        let mut flagged_count: CellCount = 0;
        for coords in self.iter_coords() {
            let index = coords.to_nd_index();
            let cell = &mut self.cells_mut()[index];
            cell.clear_state();
            if snapshot.revealed[index] {
                cell.set_revealed();
                if !cell.is_mine() {
                    revealed_count += 1;
                }
            } else if snapshot.flagged[index] {
                cell.set_flagged(true);
                flagged_count += 1;
            }
        }

        self.set_counters(revealed_count, flagged_count, snapshot.detonated);
        log::debug!(
            "Restored board with {} revealed and {} flagged cells",
            revealed_count,
            flagged_count
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn layout() -> Board {
        Board::from_mine_coords((4, 4), &[(0, 0), (3, 3)]).unwrap()
    }

    fn round_trip(board: &Board) -> Board {
        let json = serde_json::to_string(&board.snapshot()).unwrap();
        let snapshot: BoardSnapshot = serde_json::from_str(&json).unwrap();
        let mut restored = layout();
        restored.restore(&snapshot).unwrap();
        restored
    }

    #[test]
    fn round_trip_keeps_ongoing_state() {
        let mut board = layout();
        board.reveal((0, 1)).unwrap();
        board.toggle_flag((3, 3)).unwrap();
        board.toggle_flag((2, 0)).unwrap();

        let restored = round_trip(&board);

        assert_eq!(restored.evaluate(), GameStatus::Ongoing);
        assert_eq!(restored.evaluate(), board.evaluate());
        assert_eq!(restored, board);
    }

    #[test]
    fn round_trip_keeps_lost_state() {
        let mut board = layout();
        board.reveal((3, 3)).unwrap();
        board.reveal_all_mines();

        let restored = round_trip(&board);

        assert_eq!(restored.evaluate(), GameStatus::Lost);
        assert_eq!(restored.view_at((3, 3)), Ok(CellView::Detonated));
        assert_eq!(restored.view_at((0, 0)), Ok(CellView::Mine));
    }

    #[test]
    fn round_trip_keeps_won_state() {
        let mut board = layout();
        board.reveal((0, 3)).unwrap();
        assert_eq!(board.evaluate(), GameStatus::Won);
        board.reveal_all_mines();

        let restored = round_trip(&board);

        assert_eq!(restored.evaluate(), GameStatus::Won);
        assert_eq!(restored.revealed_count(), 14);
    }

    #[test]
    fn round_trip_on_random_board() {
        let mut rng = SmallRng::seed_from_u64(77);
        let mut board = Board::generate(Difficulty::Easy.config(), &mut rng).unwrap();
        for _ in 0..5 {
            if let Some(coords) = board.select_hint(&mut rng) {
                board.reveal(coords).unwrap();
            }
        }
        let snapshot = board.snapshot();

        let mut restored = board.clone();
        restored.restore(&snapshot).unwrap();

        assert_eq!(restored.evaluate(), board.evaluate());
        assert_eq!(restored.revealed_count(), board.revealed_count());
    }

    #[test]
    fn restore_rejects_shape_mismatch() {
        let mut snapshot = layout().snapshot();
        snapshot.flagged = Array2::from_elem([1, 4], false);

        assert_eq!(
            layout().restore(&snapshot),
            Err(GameError::InvalidBoardShape)
        );

        let other = Board::from_mine_coords((3, 3), &[]).unwrap().snapshot();
        assert_eq!(layout().restore(&other), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn restore_rejects_revealed_and_flagged_cell() {
        let mut snapshot = layout().snapshot();
        snapshot.revealed[[1, 1]] = true;
        snapshot.flagged[[1, 1]] = true;

        assert_eq!(snapshot.validate(), Err(GameError::InvalidSnapshot));
        assert_eq!(layout().restore(&snapshot), Err(GameError::InvalidSnapshot));
    }

    #[test]
    fn restore_rejects_detonation_on_safe_cell() {
        let mut snapshot = layout().snapshot();
        snapshot.revealed[[1, 1]] = true;
        snapshot.detonated = Some((1, 1));

        assert_eq!(layout().restore(&snapshot), Err(GameError::InvalidSnapshot));
    }

    #[test]
    fn restore_recounts_from_the_bitmasks() {
        // bits set by hand, never produced by a reveal
        let mut snapshot = layout().snapshot();
        for index in [[1, 1], [1, 2], [2, 1]] {
            snapshot.revealed[index] = true;
        }
        snapshot.flagged[[0, 0]] = true;

        let mut board = layout();
        board.restore(&snapshot).unwrap();

        assert_eq!(board.revealed_count(), 3);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.evaluate(), GameStatus::Ongoing);
        assert_eq!(board.view_at((1, 2)), Ok(CellView::Revealed(0)));
    }
}
