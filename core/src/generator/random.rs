use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Purely random mine placement, reproducible from a seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        Board::generate(config, &mut rng)
    }
}

/// Chooses `config.mines` distinct cells by shuffling every position and
/// taking the prefix, so each subset of that size is equally likely. The
/// config must already be validated.
pub(crate) fn place_mines<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Array2<bool> {
    let mut positions: Vec<Coord2> = iter_coords(config.size).collect();
    let (chosen, _) = positions.partial_shuffle(rng, config.mines.into());

    let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
    for &coords in chosen.iter() {
        mines[coords.to_nd_index()] = true;
    }

    // double check mine count
    let count = mines.iter().filter(|&&mine| mine).count();
    if count != usize::from(config.mines) {
        log::warn!(
            "Generated board mine count mismatch, actual: {}, requested: {}",
            count,
            config.mines
        );
    }
    mines
}
