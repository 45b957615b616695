//! Tabular Q-learning over canonical maze states
//!
//! ## Usage Example
//!
//! ```no_run
//! use mazeq::app::AgentConfig;
//! use mazeq::q_learning::QLearningAgent;
//!
//! let agent = QLearningAgent::new(
//!     AgentConfig::default()
//!         .with_learning_rate(0.2)
//!         .with_discount_factor(0.75)
//!         .with_exploration_rate(0.1),
//! )?;
//! # Ok::<(), mazeq::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{QLearningAgent, TrajectoryStep};
pub use q_table::QTable;
pub use serialization::{
    DEFAULT_POLICY_DIR, POLICY_EXTENSION, POLICY_PREFIX, PolicyMetadata, SavedPolicy,
    default_policy_path, latest_policy,
};
