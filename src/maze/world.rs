//! Read-only view of the world at one tick
//!
//! The simulation owns its entities; the learning core only ever sees a
//! [`WorldView`] borrowed from it.

use serde::{Deserialize, Serialize};

use super::{
    direction::{Direction, RelativeDirection},
    graph::{NodeGraph, NodeId, Vec2},
};
use crate::Result;

/// The controlled entity
///
/// `node` is the node the agent last left (or sits on) and `target` the node
/// it is travelling toward. When stationary at a node both are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBody {
    pub position: Vec2,
    pub heading: Direction,
    pub node: NodeId,
    pub target: NodeId,
    pub at_node: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerMode {
    Scatter,
    Chase,
    /// Pursuers flee and the agent cannot be harmed.
    Frightened,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuerBody {
    pub position: Vec2,
    pub heading: Direction,
    pub node: NodeId,
    pub target: NodeId,
    pub mode: PursuerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Pellet,
    /// Frightens every pursuer when consumed.
    PowerPellet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub position: Vec2,
    pub kind: CollectibleKind,
}

impl Collectible {
    pub fn pellet(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            kind: CollectibleKind::Pellet,
        }
    }

    pub fn power(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            kind: CollectibleKind::PowerPellet,
        }
    }
}

/// Counters the episode loop reads for rewards and statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub lives: u32,
    pub score: u64,
    pub collectibles_eaten: u32,
    pub pursuers_eliminated: u32,
}

/// Snapshot of the world handed to the encoder and the episode loop
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub graph: &'a NodeGraph,
    pub agent: &'a AgentBody,
    pub pursuers: &'a [PursuerBody],
    pub collectibles: &'a [Collectible],
    pub tally: Tally,
    pub level_lost: bool,
    pub level_won: bool,
}

impl WorldView<'_> {
    /// Absolute directions the agent may legally take from where it is.
    ///
    /// At a node these are the node's open exits; mid-edge the agent can only
    /// keep going or turn around.
    pub fn legal_directions(&self) -> Vec<Direction> {
        let agent = self.agent;
        if agent.at_node {
            self.graph.agent_directions(agent.node)
        } else if agent.heading == Direction::Stop {
            Vec::new()
        } else {
            vec![agent.heading, agent.heading.opposite()]
        }
    }

    /// Legal directions relative to the agent's heading, in
    /// [`RelativeDirection::ALL`] order.
    pub fn relative_actions(&self) -> Result<Vec<RelativeDirection>> {
        let mut actions = self
            .legal_directions()
            .into_iter()
            .map(|direction| RelativeDirection::from_absolute(self.agent.heading, direction))
            .collect::<Result<Vec<_>>>()?;
        actions.sort();
        Ok(actions)
    }

    /// True while any pursuer is frightened.
    pub fn hazard_immunity(&self) -> bool {
        self.pursuers
            .iter()
            .any(|pursuer| pursuer.mode == PursuerMode::Frightened)
    }

    pub fn is_terminal(&self) -> bool {
        self.level_lost || self.level_won
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> (NodeGraph, AgentBody) {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::new(0.0, 0.0));
        let b = graph.add_node(Vec2::new(32.0, 0.0));
        graph.connect(a, Direction::Right, b).unwrap();
        let agent = AgentBody {
            position: Vec2::new(8.0, 0.0),
            heading: Direction::Right,
            node: a,
            target: b,
            at_node: false,
            alive: true,
        };
        (graph, agent)
    }

    #[test]
    fn test_mid_edge_actions_are_forward_and_backward() {
        let (graph, agent) = corridor();
        let view = WorldView {
            graph: &graph,
            agent: &agent,
            pursuers: &[],
            collectibles: &[],
            tally: Tally::default(),
            level_lost: false,
            level_won: false,
        };

        assert_eq!(
            view.relative_actions().unwrap(),
            vec![RelativeDirection::Forward, RelativeDirection::Backward]
        );
    }

    #[test]
    fn test_node_actions_follow_relative_order() {
        let (graph, mut agent) = corridor();
        agent.position = Vec2::new(0.0, 0.0);
        agent.at_node = true;
        agent.target = agent.node;
        agent.heading = Direction::Down;
        let view = WorldView {
            graph: &graph,
            agent: &agent,
            pursuers: &[],
            collectibles: &[],
            tally: Tally::default(),
            level_lost: false,
            level_won: false,
        };

        // Heading down, the only exit (right on screen) is the agent's left.
        assert_eq!(view.relative_actions().unwrap(), vec![RelativeDirection::Left]);
    }
}
