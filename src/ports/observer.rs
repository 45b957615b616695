//! Observer port - abstraction for episode observation and data collection
//!
//! Observers see what the episode loop does without the loop knowing about
//! progress bars, benchmark reports or test recorders.

use std::path::Path;

use crate::{
    Result,
    encoding::CanonicalState,
    maze::RelativeDirection,
    pipeline::EpisodeOutcome,
};

/// One decision point as seen by observers
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub tick: u64,
    pub state: CanonicalState,
    pub actions: Vec<RelativeDirection>,
    /// `None` when no action was legal and the agent was told to stop
    pub chosen: Option<RelativeDirection>,
}

/// Observer trait for monitoring training and benchmark runs
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_decision(..)` and `on_reward(..)` as the agent plays
///    - `on_life_lost(..)` after each death
///    - `on_episode_end(episode, outcome)`
///    - `on_checkpoint(path)` when the policy was saved
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use mazeq::{pipeline::EpisodeOutcome, ports::Observer};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         outcome: &EpisodeOutcome,
///     ) -> mazeq::Result<()> {
///         if outcome.won() {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// `total_episodes` is `None` for open-ended runs.
    fn on_training_start(&mut self, _total_episodes: Option<usize>) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    fn on_decision(&mut self, _episode: usize, _decision: &Decision) -> Result<()> {
        Ok(())
    }

    /// A value update was applied to the previous decision.
    fn on_reward(&mut self, _episode: usize, _reward: f64) -> Result<()> {
        Ok(())
    }

    fn on_life_lost(&mut self, _episode: usize, _lives_remaining: u32) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, _outcome: &EpisodeOutcome) -> Result<()> {
        Ok(())
    }

    fn on_checkpoint(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
