//! Benchmark command - play a saved policy greedily and report statistics

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    adapters::MsgPackRepository,
    app::{AgentConfig, EpisodeConfig, TrainingConfig},
    cli::config::{WorldArgs, agent_seed},
    pipeline::{BenchmarkObserver, EpisodeRunner, TrainingPipeline},
    ports::PolicyRepository,
    q_learning::{DEFAULT_POLICY_DIR, SavedPolicy, latest_policy},
};

#[derive(Parser, Debug)]
#[command(about = "Benchmark a trained policy")]
pub struct BenchmarkArgs {
    /// Policy file (latest policy in --policy-dir when omitted)
    pub policy: Option<PathBuf>,

    /// Directory searched for the latest policy
    #[arg(long, default_value = DEFAULT_POLICY_DIR)]
    pub policy_dir: PathBuf,

    /// Number of episodes to play
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export aggregated statistics to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub world: WorldArgs,
}

/// Resolve the policy to use: the explicit path or the latest in `directory`.
pub fn resolve_policy(explicit: Option<&Path>, directory: &Path) -> crate::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => latest_policy(directory),
    }
}

pub fn load_policy(explicit: Option<&Path>, directory: &Path) -> Result<(PathBuf, SavedPolicy)> {
    let path = resolve_policy(explicit, directory)?;
    let policy = MsgPackRepository::new()
        .load(&path)
        .with_context(|| format!("Failed to load policy {}", path.display()))?;
    Ok((path, policy))
}

pub fn execute(args: BenchmarkArgs) -> Result<()> {
    let (path, policy) = load_policy(args.policy.as_deref(), &args.policy_dir)?;
    info!(
        path = %path.display(),
        iterations = policy.iterations,
        entries = policy.q_table.len(),
        "loaded policy"
    );

    let mut config = AgentConfig::frozen();
    if let Some(seed) = agent_seed(args.seed) {
        config = config.with_seed(seed);
    }
    let mut agent = policy.into_agent(config)?;
    let mut simulation = args.world.simulation(args.seed)?;

    let mut episode = EpisodeConfig::evaluation();
    if let Some(max_ticks) = args.world.max_ticks {
        episode = episode.with_max_ticks(max_ticks);
    }
    let training = TrainingConfig::new(args.games).with_checkpoint_every(0);

    let result = TrainingPipeline::new(training, EpisodeRunner::new(episode))
        .with_observer(Box::new(BenchmarkObserver::new()))
        .run(&mut simulation, &mut agent)?;

    if let Some(export) = &args.export {
        result
            .save(export)
            .with_context(|| format!("Failed to write {}", export.display()))?;
        info!(path = %export.display(), "statistics exported");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_policy_wins() {
        let path = resolve_policy(Some(Path::new("mine.msgpack")), Path::new("nowhere")).unwrap();
        assert_eq!(path, PathBuf::from("mine.msgpack"));
    }

    #[test]
    fn test_missing_directory_has_no_policy() {
        assert!(resolve_policy(None, Path::new("/nonexistent_mazeq_dir")).is_err());
    }
}
