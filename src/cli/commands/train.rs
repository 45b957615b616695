//! Train command - learn a policy by playing episodes

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    adapters::MsgPackRepository,
    app::{EpisodeConfig, TrainingConfig},
    cli::{
        config::{AgentArgs, RewardArgs, WorldArgs, agent_seed},
        output::{format_number, print_kv, print_section},
    },
    pipeline::{EpisodeRunner, ProgressObserver, TrainingPipeline},
    ports::PolicyRepository,
    q_learning::{DEFAULT_POLICY_DIR, QLearningAgent, default_policy_path},
};

/// Summary file for `raw`: a directory target gets `training_summary.json`,
/// anything else is given a `.json` extension.
fn summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning policy")]
pub struct TrainArgs {
    /// Number of training episodes (runs until interrupted when omitted)
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Continue learning from an existing policy file
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Output policy file (defaults to a timestamped file under policies/)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Save the policy every N episodes (0 saves only at the end)
    #[arg(long, default_value_t = 100)]
    pub checkpoint_every: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar and the final summary
    #[arg(long, short = 'q')]
    pub quiet: bool,

    #[command(flatten)]
    pub world: WorldArgs,

    #[command(flatten)]
    pub agent: AgentArgs,

    #[command(flatten)]
    pub rewards: RewardArgs,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let repository = MsgPackRepository::new();
    let agent_config = args.agent.config(agent_seed(args.seed));
    let rewards = args.rewards.config()?;

    let mut agent = match &args.resume {
        Some(path) => {
            let saved = repository
                .load(path)
                .with_context(|| format!("Failed to load policy {}", path.display()))?;
            info!(
                path = %path.display(),
                entries = saved.q_table.len(),
                iterations = saved.iterations,
                "resuming policy"
            );
            saved.into_agent(agent_config)?
        }
        None => QLearningAgent::new(agent_config)?,
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_policy_path(DEFAULT_POLICY_DIR));
    let mut simulation = args.world.simulation(args.seed)?;

    let mut episode = EpisodeConfig::training();
    if let Some(max_ticks) = args.world.max_ticks {
        episode = episode.with_max_ticks(max_ticks);
    }
    let mut training = TrainingConfig::default().with_checkpoint_every(args.checkpoint_every);
    training.episodes = args.episodes;

    info!(
        output = %output.display(),
        episodes = ?args.episodes,
        seed = ?args.seed,
        ?rewards,
        "starting training"
    );
    let runner = EpisodeRunner::new(episode).with_rewards(rewards);
    let mut pipeline =
        TrainingPipeline::new(training, runner).with_checkpoint(repository, &output);
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let result = pipeline.run(&mut simulation, &mut agent)?;

    if !args.quiet {
        print_section("Training complete");
        print_kv("Episodes", &format_number(result.episodes));
        print_kv("Win rate", &format!("{:.2}", result.win_rate()));
        print_kv("Table entries", &format_number(result.table_size));
        print_kv("Iterations", &result.iterations.to_string());
        print_kv("Policy", &output.display().to_string());
    }

    if let Some(raw) = &args.summary {
        let path = summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        result
            .save(&path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        if !args.quiet {
            println!("\nSummary written to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path_normalization() {
        assert_eq!(summary_path(Path::new("run.json")), PathBuf::from("run.json"));
        assert_eq!(summary_path(Path::new("run.JSON")), PathBuf::from("run.JSON"));
        assert_eq!(summary_path(Path::new("run")), PathBuf::from("run.json"));
        assert_eq!(summary_path(Path::new("run.txt")), PathBuf::from("run.json"));
        assert_eq!(
            summary_path(Path::new("out/")),
            PathBuf::from("out/training_summary.json")
        );
    }
}
