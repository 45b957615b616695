//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the learning core and implemented by the
//! reference simulation, the persistence adapters and the pipeline observers.

pub mod observer;
pub mod repository;
pub mod simulation;

pub use observer::{Decision, Observer};
pub use repository::PolicyRepository;
pub use simulation::Simulation;
