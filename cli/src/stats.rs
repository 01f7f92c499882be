use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::settings::Mode;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStats {
    pub played: u32,
    pub wins: u32,
    /// Fastest win in seconds.
    pub best_time: Option<u64>,
}

/// Consecutive days with a daily-challenge win.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
    pub last: Option<NaiveDate>,
}

impl Streak {
    /// Counts at most one win per day. A gap of more than a day restarts the
    /// streak at one.
    pub fn record_win(&mut self, today: NaiveDate) {
        if self.last == Some(today) {
            return;
        }

        let continues = self.last.is_some() && self.last == today.pred_opt();
        self.current = if continues { self.current + 1 } else { 1 };
        self.best = self.best.max(self.current);
        self.last = Some(today);
    }
}

/// Results of every finished game in this run, keyed by mode name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub modes: BTreeMap<String, ModeStats>,
    pub streak: Streak,
}

impl Stats {
    pub fn record(&mut self, mode: Mode, won: bool, elapsed_secs: u64) {
        let entry = self.modes.entry(mode.to_string()).or_default();
        entry.played += 1;

        if won {
            entry.wins += 1;
            entry.best_time = Some(match entry.best_time {
                Some(best) => best.min(elapsed_secs),
                None => elapsed_secs,
            });
            if let Mode::Daily(date) = mode {
                self.streak.record_win(date);
            }
        }

        log::info!(
            "Recorded {} game ({}) in {}s",
            mode,
            if won { "won" } else { "lost" },
            elapsed_secs
        );
    }

    pub fn get(&self, mode: &str) -> ModeStats {
        self.modes.get(mode).cloned().unwrap_or_default()
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        for mode in ["easy", "medium", "hard", "extreme", "custom", "daily"] {
            let stats = self.get(mode);
            let best = stats
                .best_time
                .map_or_else(|| "-".to_string(), |secs| secs.to_string());
            out.push_str(&format!(
                "{mode}: played {}, wins {}, best time {best}\n",
                stats.played, stats.wins
            ));
        }
        out.push_str(&format!(
            "current streak: {}, best streak: {}\n",
            self.streak.current, self.streak.best
        ));
        out
    }
}
