//! Epsilon-greedy Q-learning policy
//!
//! The agent owns its value table and a trajectory of the decisions made in
//! the current life attempt. Each decision is later settled by exactly one
//! value update.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::debug;

use crate::{
    Error, Result,
    app::AgentConfig,
    encoding::CanonicalState,
    maze::RelativeDirection,
    q_learning::q_table::QTable,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// A decision awaiting its value update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryStep {
    pub state: CanonicalState,
    pub action: RelativeDirection,
    pub settled: bool,
}

/// Tabular Q-learning agent with epsilon-greedy exploration
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: AgentConfig,
    exploration_rate: f64,
    iterations: u64,
    trajectory: Vec<TrajectoryStep>,
    rng: StdRng,
}

impl QLearningAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_table(config, QTable::new(), 0)
    }

    /// Resume from a previously learned table and iteration counter.
    pub fn with_table(config: AgentConfig, q_table: QTable, iterations: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table,
            exploration_rate: config.exploration_rate,
            rng: build_rng(config.seed),
            config,
            iterations,
            trajectory: Vec::new(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    pub fn value(&self, state: &CanonicalState, action: RelativeDirection) -> f64 {
        self.q_table.get(state, action)
    }

    /// Greedy choice, ties to the earliest candidate.
    pub fn best_action(
        &self,
        state: &CanonicalState,
        actions: &[RelativeDirection],
    ) -> Result<RelativeDirection> {
        self.q_table
            .best_action(state, actions)
            .ok_or_else(|| Error::EmptyActionSet {
                state: state.to_string(),
            })
    }

    pub fn max_value(&self, state: &CanonicalState, actions: &[RelativeDirection]) -> f64 {
        self.q_table.max_value(state, actions)
    }

    /// ε-greedy action selection. The choice is appended to the trajectory.
    pub fn choose_action(
        &mut self,
        state: &CanonicalState,
        actions: &[RelativeDirection],
    ) -> Result<RelativeDirection> {
        let greedy = self.best_action(state, actions)?;
        let action = if self.rng.random::<f64>() < self.exploration_rate {
            actions.choose(&mut self.rng).copied().unwrap_or(greedy)
        } else {
            greedy
        };
        self.trajectory.push(TrajectoryStep {
            state: *state,
            action,
            settled: false,
        });
        Ok(action)
    }

    /// Apply the TD update to one state-action pair.
    pub fn update(
        &mut self,
        state: CanonicalState,
        action: RelativeDirection,
        reward: f64,
        next_max: f64,
    ) -> f64 {
        let value = self.q_table.update(
            state,
            action,
            reward,
            next_max,
            self.config.learning_rate,
            self.config.discount_factor,
        );
        self.iterations += 1;
        debug!(%state, %action, reward, next_max, value, "value updated");
        value
    }

    /// Settle the most recent unsettled decision with `reward`.
    ///
    /// Returns false if every decision in the trajectory is already settled.
    pub fn reinforce_last(&mut self, reward: f64, next_max: f64) -> bool {
        let Some(step) = self.trajectory.last_mut().filter(|step| !step.settled) else {
            return false;
        };
        step.settled = true;
        let (state, action) = (step.state, step.action);
        self.update(state, action, reward, next_max);
        true
    }

    /// Terminal update for the most recent decision, applied even if that
    /// decision was already settled by an earlier decision point.
    ///
    /// Returns false if no decision was made since the last trajectory reset.
    pub fn reinforce_terminal(&mut self, reward: f64) -> bool {
        let Some(step) = self.trajectory.last_mut() else {
            return false;
        };
        step.settled = true;
        let (state, action) = (step.state, step.action);
        self.update(state, action, reward, 0.0);
        true
    }

    /// Forget the current life attempt's decisions.
    pub fn reset_trajectory(&mut self) {
        self.trajectory.clear();
    }

    pub fn trajectory(&self) -> &[TrajectoryStep] {
        &self.trajectory
    }

    /// Decay ε after a completed episode.
    pub fn end_episode(&mut self) {
        let decayed = self.exploration_rate * self.config.exploration_decay;
        self.exploration_rate = decayed.max(self.config.min_exploration);
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Number of value updates applied over the table's lifetime
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.len()
    }
}
