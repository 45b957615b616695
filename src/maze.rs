//! Maze world: directions, node graph, layouts and the reference simulation

pub mod direction;
pub mod graph;
pub mod layout;
pub mod simulation;
pub mod world;

pub use direction::{Direction, RelativeDirection};
pub use graph::{Node, NodeGraph, NodeId, Vec2};
pub use layout::{DEFAULT_LAYOUT, MazeLayout, TILE_SIZE};
pub use simulation::{MazeSimulation, SimulationConfig};
pub use world::{
    AgentBody, Collectible, CollectibleKind, PursuerBody, PursuerMode, Tally, WorldView,
};
