//! One game, from start to level won or all lives lost
//!
//! The runner reads the world once per tick and makes a decision whenever
//! the agent sits on a node or the encoded state has changed since the
//! previous decision. Between decisions the chosen heading is held.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::reward::{death_reward, is_reversal, shaped_reward};
use crate::{
    Result,
    app::{EpisodeConfig, RewardConfig},
    encoding::{CanonicalState, encode},
    maze::{Direction, Tally},
    ports::{Decision, Observer, Simulation},
    q_learning::QLearningAgent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Won,
    Lost,
    /// Stopped after the configured tick limit
    Truncated,
}

/// Terminal result of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub termination: Termination,
    pub tally: Tally,
    pub ticks: u64,
    /// `ticks` in simulated seconds
    pub duration_secs: f64,
    pub decisions: usize,
    pub lives_lost: u32,
}

impl EpisodeOutcome {
    pub fn won(&self) -> bool {
        self.termination == Termination::Won
    }
}

/// Per-life bookkeeping, reset whenever a life is lost
#[derive(Debug)]
struct LifeAttempt {
    previous_heading: Direction,
    previous_state: Option<CanonicalState>,
    /// Whether the last chosen action reversed the agent's prior direction
    reversed: bool,
    decided: bool,
    collectibles_baseline: u32,
}

impl LifeAttempt {
    fn new(heading: Direction, collectibles_eaten: u32) -> Self {
        Self {
            previous_heading: heading,
            previous_state: None,
            reversed: false,
            decided: false,
            collectibles_baseline: collectibles_eaten,
        }
    }
}

/// Drives a single episode against a simulation
#[derive(Debug, Clone, Default)]
pub struct EpisodeRunner {
    config: EpisodeConfig,
    rewards: RewardConfig,
}

impl EpisodeRunner {
    pub fn new(config: EpisodeConfig) -> Self {
        Self {
            config,
            rewards: RewardConfig::default(),
        }
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Play one episode to completion.
    pub fn run<S: Simulation + ?Sized>(
        &self,
        episode: usize,
        simulation: &mut S,
        agent: &mut QLearningAgent,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeOutcome> {
        for observer in observers.iter_mut() {
            observer.on_episode_start(episode)?;
        }

        simulation.start();
        agent.reset_trajectory();
        let initial_heading = simulation.initial_heading();
        let mut life = LifeAttempt::new(
            initial_heading,
            simulation.view().tally.collectibles_eaten,
        );
        let mut ticks = 0u64;
        let mut decisions = 0usize;
        let mut lives_lost = 0u32;

        let termination = loop {
            let world = simulation.view();
            if world.level_won {
                break Termination::Won;
            }
            if world.level_lost {
                break Termination::Lost;
            }
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                warn!(episode, ticks, "episode truncated");
                break Termination::Truncated;
            }

            let state = encode(&world, life.previous_heading)?;
            let at_node = world.agent.at_node;
            let heading = world.agent.heading;
            let eaten = world.tally.collectibles_eaten;

            let mut command = None;
            if at_node || life.previous_state != Some(state) {
                let actions = world.relative_actions()?;

                if self.config.training && life.decided {
                    let reward = shaped_reward(
                        &self.rewards,
                        eaten.saturating_sub(life.collectibles_baseline),
                        life.reversed,
                    );
                    let next_max = agent.max_value(&state, &actions);
                    if agent.reinforce_last(reward, next_max) {
                        for observer in observers.iter_mut() {
                            observer.on_reward(episode, reward)?;
                        }
                    }
                    life.collectibles_baseline = eaten;
                }

                let chosen = if actions.is_empty() {
                    command = Some(Direction::Stop);
                    None
                } else {
                    let action = agent.choose_action(&state, &actions)?;
                    command = Some(action.to_absolute(heading));
                    life.reversed = is_reversal(action, state.prior_direction);
                    life.decided = true;
                    Some(action)
                };
                decisions += 1;
                debug!(episode, ticks, %state, ?chosen, "decision point");

                let decision = Decision {
                    tick: ticks,
                    state,
                    actions,
                    chosen,
                };
                for observer in observers.iter_mut() {
                    observer.on_decision(episode, &decision)?;
                }
                life.previous_state = Some(state);
            }

            if let Some(command) = command {
                simulation.command(command);
            }
            life.previous_heading = heading;
            simulation.tick();
            ticks += 1;

            let world = simulation.view();
            if world.agent.alive {
                continue;
            }
            let (level_lost, lives, eaten) = (
                world.level_lost,
                world.tally.lives,
                world.tally.collectibles_eaten,
            );

            lives_lost += 1;
            if self.config.training && life.decided {
                let reward = death_reward(&self.rewards);
                if agent.reinforce_terminal(reward) {
                    for observer in observers.iter_mut() {
                        observer.on_reward(episode, reward)?;
                    }
                }
            }
            for observer in observers.iter_mut() {
                observer.on_life_lost(episode, lives)?;
            }
            debug!(episode, ticks, lives, "life lost");

            if !level_lost {
                simulation.reset_level();
                agent.reset_trajectory();
                life = LifeAttempt::new(initial_heading, eaten);
            }
        };

        let tally = simulation.view().tally;
        let outcome = EpisodeOutcome {
            termination,
            tally,
            ticks,
            duration_secs: ticks as f64 / simulation.tick_rate(),
            decisions,
            lives_lost,
        };
        if self.config.training {
            agent.end_episode();
        }
        for observer in observers.iter_mut() {
            observer.on_episode_end(episode, &outcome)?;
        }
        Ok(outcome)
    }
}
