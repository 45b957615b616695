//! Multi-episode training and benchmark pipeline

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::episode::EpisodeRunner;
use crate::{
    Error, Result,
    analysis::BenchmarkReport,
    app::TrainingConfig,
    ports::{Observer, PolicyRepository, Simulation},
    q_learning::{QLearningAgent, SavedPolicy},
};

/// Result of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,
    /// Aggregated terminal outcomes
    pub report: BenchmarkReport,
    /// Value table entries at the end of the run
    pub table_size: usize,
    /// Value updates applied over the table's lifetime
    pub iterations: u64,
    pub elapsed_secs: f64,
}

impl TrainingResult {
    pub fn win_rate(&self) -> f64 {
        self.report.win_rate()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

struct Checkpoint {
    repository: Box<dyn PolicyRepository>,
    path: PathBuf,
}

/// Runs episodes back to back, saving the policy periodically
pub struct TrainingPipeline {
    config: TrainingConfig,
    runner: EpisodeRunner,
    observers: Vec<Box<dyn Observer>>,
    checkpoint: Option<Checkpoint>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig, runner: EpisodeRunner) -> Self {
        Self {
            config,
            runner,
            observers: Vec::new(),
            checkpoint: None,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Save the policy to `path` every `checkpoint_every` episodes and at the
    /// end of a training run.
    pub fn with_checkpoint<R: PolicyRepository + 'static>(
        mut self,
        repository: R,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.checkpoint = Some(Checkpoint {
            repository: Box::new(repository),
            path: path.into(),
        });
        self
    }

    pub fn run<S: Simulation + ?Sized>(
        &mut self,
        simulation: &mut S,
        agent: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let started = Instant::now();
        let mut report = BenchmarkReport::new();
        let mut episode = 0;
        let mut saved_at = None;

        while self.config.episodes.is_none_or(|total| episode < total) {
            let outcome = self
                .runner
                .run(episode, simulation, agent, &mut self.observers)?;
            report.record(&outcome);
            episode += 1;

            let every = self.config.checkpoint_every;
            if every > 0 && episode % every == 0 {
                let elapsed = started.elapsed().as_secs_f64();
                info!(
                    episodes = episode,
                    table_size = agent.q_table_size(),
                    episodes_per_sec = format!("{:.3}", episode as f64 / elapsed.max(f64::EPSILON)),
                    "progress"
                );
                if self.runner.config().training {
                    self.save(agent, episode)?;
                    saved_at = Some(episode);
                }
            }
        }

        if self.runner.config().training && saved_at != Some(episode) {
            self.save(agent, episode)?;
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult {
            episodes: episode,
            report,
            table_size: agent.q_table_size(),
            iterations: agent.iterations(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }

    fn save(&mut self, agent: &QLearningAgent, episodes: usize) -> Result<()> {
        let Some(checkpoint) = &self.checkpoint else {
            return Ok(());
        };
        let policy = SavedPolicy::from_agent(agent, Some(episodes));
        checkpoint.repository.save(&policy, &checkpoint.path)?;
        info!(path = %checkpoint.path.display(), entries = policy.q_table.len(), "policy saved");
        for observer in &mut self.observers {
            observer.on_checkpoint(&checkpoint.path)?;
        }
        Ok(())
    }
}
