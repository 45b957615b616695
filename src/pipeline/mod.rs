//! Episode loop, training pipeline and observers
//!
//! - [`EpisodeRunner`] plays a single episode and applies value updates
//! - [`TrainingPipeline`] runs episodes back to back with periodic checkpoints
//! - observers report progress and benchmark statistics

pub mod episode;
pub mod observers;
pub mod reward;
pub mod training;

pub use episode::{EpisodeOutcome, EpisodeRunner, Termination};
pub use observers::{BenchmarkObserver, ProgressObserver};
pub use reward::{death_reward, is_reversal, shaped_reward};
pub use training::{TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
