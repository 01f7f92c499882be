use std::fmt;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::ValueEnum;
use minesweeping_core::{Coord, CellCount, DEFAULT_HINTS, Difficulty, GameConfig};
use serde::{Deserialize, Serialize};

use crate::Args;
use crate::daily;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
            DifficultyArg::Extreme => Difficulty::Extreme,
        }
    }
}

/// Statistics bucket a game is recorded under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Preset(Difficulty),
    Custom,
    Daily(NaiveDate),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(difficulty) => f.write_str(difficulty.name()),
            Self::Custom => f.write_str("custom"),
            Self::Daily(_) => f.write_str("daily"),
        }
    }
}

/// Resolved game settings: which board to build and where randomness comes from.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub config: GameConfig,
    pub hints: u8,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_args(args: &Args, today: NaiveDate) -> anyhow::Result<Self> {
        if args.daily {
            if args.seed.is_some()
                || args.rows.is_some()
                || args.cols.is_some()
                || args.mines.is_some()
            {
                bail!("--daily picks its own board, drop --seed/--rows/--cols/--mines");
            }
            let challenge = daily::challenge_for(today);
            return Ok(Self {
                mode: Mode::Daily(today),
                config: challenge.difficulty.config(),
                hints: args.hints,
                seed: Some(challenge.seed),
            });
        }

        let (mode, config) = match (args.rows, args.cols, args.mines) {
            (None, None, None) => {
                let difficulty = Difficulty::from(args.difficulty);
                (Mode::Preset(difficulty), difficulty.config())
            }
            (Some(rows), Some(cols), Some(mines)) => {
                (Mode::Custom, custom_config(rows, cols, mines)?)
            }
            _ => bail!("custom boards need all of --rows, --cols and --mines"),
        };

        Ok(Self {
            mode,
            config,
            hints: args.hints,
            seed: args.seed,
        })
    }

    /// Seed for the `game_index`-th game of this run.
    pub fn seed_for(&self, game_index: u64) -> u64 {
        match (self.mode, self.seed) {
            (Mode::Daily(_), Some(seed)) => seed,
            (_, Some(seed)) => seed.wrapping_add(game_index),
            (_, None) => rand::random(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let difficulty = Difficulty::Easy;
        Self {
            mode: Mode::Preset(difficulty),
            config: difficulty.config(),
            hints: DEFAULT_HINTS,
            seed: None,
        }
    }
}

fn custom_config(rows: Coord, cols: Coord, mines: CellCount) -> anyhow::Result<GameConfig> {
    GameConfig::new((rows, cols), mines)
        .with_context(|| format!("invalid custom board {rows}x{cols} with {mines} mines"))
}
