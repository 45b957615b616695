//! Configuration types for agents, rewards and episode runs.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyper-parameters of the Q-learning policy.
///
/// # Examples
///
/// ```
/// use mazeq::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.3)
///     .with_exploration_rate(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// α
    pub learning_rate: f64,
    /// γ
    pub discount_factor: f64,
    /// ε, the probability of picking a random action
    pub exploration_rate: f64,
    /// Multiplicative ε decay applied after each completed episode
    pub exploration_decay: f64,
    /// Floor for ε after decay
    pub min_exploration: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Greedy, non-learning configuration for evaluation runs.
    pub fn frozen() -> Self {
        Self {
            learning_rate: 0.0,
            exploration_rate: 0.0,
            ..Self::default()
        }
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn with_discount_factor(mut self, factor: f64) -> Self {
        self.discount_factor = factor;
        self
    }

    pub fn with_exploration_rate(mut self, rate: f64) -> Self {
        self.exploration_rate = rate;
        self
    }

    pub fn with_exploration_decay(mut self, decay: f64, min_exploration: f64) -> Self {
        self.exploration_decay = decay;
        self.min_exploration = min_exploration;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("learning rate", self.learning_rate),
            ("discount factor", self.discount_factor),
            ("exploration rate", self.exploration_rate),
            ("minimum exploration", self.min_exploration),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        if !(self.exploration_decay > 0.0 && self.exploration_decay <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "exploration decay must be in (0, 1], got {}",
                    self.exploration_decay
                ),
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_factor: 0.75,
            exploration_rate: 0.1,
            exploration_decay: 1.0,
            min_exploration: 0.0,
            seed: None,
        }
    }
}

/// Reward shaping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward per collectible consumed since the previous decision
    pub collectible_reward: f64,
    /// Subtracted when the agent reverses its previous heading
    pub reverse_penalty: f64,
    /// Subtracted on death (terminal update)
    pub death_penalty: f64,
}

impl RewardConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("collectible reward", self.collectible_reward),
            ("reverse penalty", self.reverse_penalty),
            ("death penalty", self.death_penalty),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            collectible_reward: 10.0,
            reverse_penalty: 100.0,
            death_penalty: 1000.0,
        }
    }
}

/// Per-episode settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Apply value updates while playing
    pub training: bool,
    /// Stop a runaway episode after this many ticks
    pub max_ticks: Option<u64>,
}

impl EpisodeConfig {
    pub fn training() -> Self {
        Self {
            training: true,
            max_ticks: None,
        }
    }

    pub fn evaluation() -> Self {
        Self::default()
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}

/// Multi-episode training run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes; `None` runs until interrupted
    pub episodes: Option<usize>,
    /// Save the policy every this many completed episodes (0 disables)
    pub checkpoint_every: usize,
}

impl TrainingConfig {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes: Some(episodes),
            ..Self::default()
        }
    }

    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every;
        self
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: None,
            checkpoint_every: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 0.2);
        assert_eq!(config.discount_factor, 0.75);
        assert_eq!(config.exploration_rate, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_frozen_is_greedy() {
        let config = AgentConfig::frozen();
        assert_eq!(config.exploration_rate, 0.0);
        assert_eq!(config.learning_rate, 0.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(AgentConfig::default().with_learning_rate(1.5).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_exploration_decay(0.0, 0.0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_reward_validation() {
        assert!(RewardConfig::default().validate().is_ok());
        let negative = RewardConfig {
            death_penalty: -1.0,
            ..RewardConfig::default()
        };
        assert!(negative.validate().is_err());
        let nan = RewardConfig {
            collectible_reward: f64::NAN,
            ..RewardConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_training_config_builder() {
        let config = TrainingConfig::new(50).with_checkpoint_every(10);
        assert_eq!(config.episodes, Some(50));
        assert_eq!(config.checkpoint_every, 10);
    }
}
