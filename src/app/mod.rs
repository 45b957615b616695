//! Application configuration
//!
//! Typed settings for the agent, reward shaping and episode runs. The CLI
//! builds these from its flags; library users construct them directly.
//!
//! ```
//! use mazeq::app::{AgentConfig, EpisodeConfig, TrainingConfig};
//!
//! let agent = AgentConfig::default().with_seed(42);
//! let episode = EpisodeConfig::training().with_max_ticks(20_000);
//! let training = TrainingConfig::new(500).with_checkpoint_every(50);
//! # assert!(agent.validate().is_ok());
//! # assert!(episode.training);
//! # assert_eq!(training.episodes, Some(500));
//! ```

pub mod config;

pub use config::{AgentConfig, EpisodeConfig, RewardConfig, TrainingConfig};
