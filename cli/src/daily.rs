use chrono::{Datelike, NaiveDate};
use minesweeping_core::Difficulty;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Presets the daily challenge may pick; extreme is never a daily board.
const DAILY_PRESETS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DailyChallenge {
    pub difficulty: Difficulty,
    pub seed: u64,
}

/// The board of the day. Derived from the date only, so every player gets
/// the same challenge.
pub fn challenge_for(date: NaiveDate) -> DailyChallenge {
    let day = u64::from(date.num_days_from_ce().unsigned_abs());
    let mut rng = SmallRng::seed_from_u64(day.wrapping_mul(0x9E3779B97F4A7C15));
    let difficulty = DAILY_PRESETS[rng.random_range(0..DAILY_PRESETS.len())];
    let seed = rng.random();
    log::debug!("Daily challenge for {date}: {} with seed {seed}", difficulty.name());
    DailyChallenge { difficulty, seed }
}
