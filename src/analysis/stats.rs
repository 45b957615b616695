//! Online statistics over benchmark episodes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::EpisodeOutcome;

/// Count, min, max and mean of a scalar sequence in constant space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStatistic {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RunningStatistic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let n = self.count as f64;
        self.mean -= self.mean / n;
        self.mean += value / n;
    }

    /// `mean(.2),min,max`
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunningStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2},{},{}", self.mean, self.min, self.max)
    }
}

/// Aggregate of terminal outcomes over a benchmark run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub games: u64,
    pub wins: u64,
    pub lives: RunningStatistic,
    pub score: RunningStatistic,
    pub collectibles: RunningStatistic,
    pub eliminations: RunningStatistic,
    /// Survival time in simulated seconds
    pub duration: RunningStatistic,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &EpisodeOutcome) {
        self.games += 1;
        if outcome.won() {
            self.wins += 1;
        }
        self.lives.report(f64::from(outcome.tally.lives));
        self.score.report(outcome.tally.score as f64);
        self.collectibles
            .report(f64::from(outcome.tally.collectibles_eaten));
        self.eliminations
            .report(f64::from(outcome.tally.pursuers_eliminated));
        self.duration.report(outcome.duration_secs);
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    /// `games,winrate,lives,score,collectibles,eliminations,duration`
    pub fn line(&self) -> String {
        format!(
            "{},{:.2},{},{},{},{},{}",
            self.games,
            self.win_rate(),
            self.lives,
            self.score,
            self.collectibles,
            self.eliminations,
            self.duration
        )
    }
}
