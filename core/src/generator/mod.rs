use rand::Rng;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}

/// Validates the parameters and generates a board using `rng`.
pub fn generate<R: Rng + ?Sized>(
    rows: Coord,
    cols: Coord,
    mines: CellCount,
    rng: &mut R,
) -> Result<Board> {
    let config = GameConfig::new((rows, cols), mines)?;
    Board::generate(config, rng)
}
