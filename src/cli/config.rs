//! Shared argument groups for CLI commands

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    app::{AgentConfig, RewardConfig},
    maze::{MazeLayout, MazeSimulation, SimulationConfig},
};

/// World the agent plays in
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct WorldArgs {
    /// ASCII maze layout (built-in maze when omitted)
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Lives per episode
    #[arg(long, default_value_t = 3)]
    pub lives: u32,

    /// Use at most this many pursuers from the layout
    #[arg(long)]
    pub pursuers: Option<usize>,

    /// Truncate episodes after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

impl WorldArgs {
    pub fn layout(&self) -> Result<MazeLayout> {
        match &self.layout {
            Some(path) => MazeLayout::load(path),
            None => MazeLayout::builtin(),
        }
    }

    pub fn simulation(&self, seed: Option<u64>) -> Result<MazeSimulation> {
        let mut config = SimulationConfig::default().with_lives(self.lives);
        if let Some(max) = self.pursuers {
            config = config.with_max_pursuers(max);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        MazeSimulation::new(self.layout()?, config)
    }
}

/// Q-learning hyper-parameters
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct AgentArgs {
    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.2)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.75)]
    pub discount: f64,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Multiplicative ε decay per episode
    #[arg(long, default_value_t = 1.0)]
    pub epsilon_decay: f64,

    /// Minimum ε after decay
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,
}

impl AgentArgs {
    pub fn config(&self, seed: Option<u64>) -> AgentConfig {
        let config = AgentConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount)
            .with_exploration_rate(self.epsilon)
            .with_exploration_decay(self.epsilon_decay, self.min_epsilon);
        match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Reward shaping constants
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct RewardArgs {
    /// Reward per collectible eaten between decisions
    #[arg(long, default_value_t = 10.0)]
    pub collectible_reward: f64,

    /// Penalty for reversing the previous heading
    #[arg(long, default_value_t = 100.0)]
    pub reverse_penalty: f64,

    /// Penalty applied when a life is lost
    #[arg(long, default_value_t = 1000.0)]
    pub death_penalty: f64,
}

impl RewardArgs {
    pub fn config(&self) -> Result<RewardConfig> {
        let config = RewardConfig {
            collectible_reward: self.collectible_reward,
            reverse_penalty: self.reverse_penalty,
            death_penalty: self.death_penalty,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Seed for the agent, derived from a run seed so the simulation and the
/// agent draw from different streams.
pub fn agent_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|seed| seed.wrapping_add(1))
}
