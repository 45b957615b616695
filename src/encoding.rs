//! Canonical state encoding
//!
//! Turns a [`WorldView`](crate::maze::WorldView) into a small, hashable
//! [`CanonicalState`] expressed relative to the agent's heading.

pub mod encoder;
pub mod geometry;
pub mod state;

pub use encoder::encode;
pub use geometry::{GEOMETRY_TOLERANCE, edge_has_collectible, nearest_collectible, relative_bearing};
pub use state::{CanonicalState, RelativeFlags};
