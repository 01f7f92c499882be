use alloc::vec::Vec;

use super::*;

/// Places mines at known coordinates, for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator {
    mines: Vec<Coord2>,
}

impl FixedBoardGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl BoardGenerator for FixedBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        let board = Board::from_mine_coords(config.size, &self.mines)?;
        if board.mine_count() != config.mines {
            return Err(GameError::InvalidParameters {
                rows: config.rows(),
                cols: config.cols(),
                mines: config.mines,
            });
        }
        Ok(board)
    }
}
