//! Tabular Q-learning agent for a maze-chase game
//!
//! This crate provides:
//! - A node-graph maze world with a reference simulation of pursuers and collectibles
//! - A heading-relative canonical state encoding of the agent's surroundings
//! - A Q-learning agent with ε-greedy exploration and a persistent value table
//! - An episode loop with reward shaping, life handling and checkpointing
//! - Benchmark statistics for evaluating saved policies

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod encoding;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use encoding::{CanonicalState, RelativeFlags, encode};
pub use error::{Error, Result};
pub use maze::{Direction, RelativeDirection};
pub use pipeline::{EpisodeOutcome, EpisodeRunner, Termination, TrainingPipeline};
pub use q_learning::{QLearningAgent, QTable, SavedPolicy};
