//! Observer implementations for training and benchmark runs

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use super::episode::EpisodeOutcome;
use crate::{Error, Result, analysis::BenchmarkReport, ports::Observer};

/// Progress bar observer - shows episodes completed and wins
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    collectibles: u64,
    checkpoints: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            collectibles: 0,
            checkpoints: 0,
        }
    }

    fn message(&self) -> String {
        format!(
            "W:{} eaten:{} saves:{}",
            self.wins, self.collectibles, self.checkpoints
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

fn template_error(e: indicatif::style::TemplateError) -> Error {
    Error::ProgressBarTemplate {
        message: e.to_string(),
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: Option<usize>) -> Result<()> {
        let pb = match total_episodes {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})",
                        )
                        .map_err(template_error)?
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("[{elapsed_precise}] {spinner} {pos} episodes ({msg})")
                        .map_err(template_error)?,
                );
                pb
            }
        };
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, outcome: &EpisodeOutcome) -> Result<()> {
        if outcome.won() {
            self.wins += 1;
        }
        self.collectibles += u64::from(outcome.tally.collectibles_eaten);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_checkpoint(&mut self, _path: &Path) -> Result<()> {
        self.checkpoints += 1;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Benchmark observer - prints one aggregate line per completed episode
///
/// Each line is `games,winrate,lives,score,collectibles,eliminations,duration`
/// where every aggregate column group is `mean,min,max`.
#[derive(Debug, Default)]
pub struct BenchmarkObserver {
    report: BenchmarkReport,
}

impl BenchmarkObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &BenchmarkReport {
        &self.report
    }
}

impl Observer for BenchmarkObserver {
    fn on_episode_end(&mut self, _episode: usize, outcome: &EpisodeOutcome) -> Result<()> {
        self.report.record(outcome);
        println!("{}", self.report.line());
        Ok(())
    }
}
