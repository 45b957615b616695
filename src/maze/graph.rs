//! Node graph the maze is built on
//!
//! Nodes sit at intersections, corners and dead ends; edges are straight,
//! axis-aligned corridors between them. Neighbours are stored per absolute
//! direction, with an optional portal link that teleports an entity arriving
//! at the node to its partner.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::{Error, Result};

pub type NodeId = usize;

/// A point in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: Vec2) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move `amount` units in `direction`.
    pub fn step(&self, direction: Direction, amount: f64) -> Vec2 {
        let (dx, dy) = direction.unit();
        Vec2::new(self.x + dx * amount, self.y + dy * amount)
    }

    /// Quarter turn clockwise about the origin, matching [`Direction::rotate_cw`].
    pub fn rotate_cw(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub position: Vec2,
    neighbors: [Option<NodeId>; 4],
    portal: Option<NodeId>,
    agent_blocked: [bool; 4],
}

impl Node {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            neighbors: [None; 4],
            portal: None,
            agent_blocked: [false; 4],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Vec2) -> NodeId {
        self.nodes.push(Node::new(position));
        self.nodes.len() - 1
    }

    /// Link `from` to `to` in `direction`, and `to` back to `from` in the
    /// opposite direction.
    pub fn connect(&mut self, from: NodeId, direction: Direction, to: NodeId) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        let Some(index) = direction.index() else {
            return Err(Error::InvalidConfiguration {
                message: "nodes cannot be connected in direction STOP".to_string(),
            });
        };
        let back = direction.opposite().index().unwrap_or(index);
        self.nodes[from].neighbors[index] = Some(to);
        self.nodes[to].neighbors[back] = Some(from);
        Ok(())
    }

    pub fn link_portal(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        self.nodes[a].portal = Some(b);
        self.nodes[b].portal = Some(a);
        Ok(())
    }

    /// Forbid the agent (but not pursuers) from leaving `node` in `direction`.
    pub fn restrict_agent(&mut self, node: NodeId, direction: Direction) -> Result<()> {
        self.check(node)?;
        if let Some(index) = direction.index() {
            self.nodes[node].agent_blocked[index] = true;
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::UnknownNode { node: id })
    }

    pub fn position(&self, id: NodeId) -> Vec2 {
        self.nodes[id].position
    }

    pub fn neighbor(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        direction
            .index()
            .and_then(|index| self.nodes.get(id).and_then(|node| node.neighbors[index]))
    }

    pub fn portal(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.portal)
    }

    pub fn agent_may_leave(&self, id: NodeId, direction: Direction) -> bool {
        match (direction.index(), self.nodes.get(id)) {
            (Some(index), Some(node)) => {
                node.neighbors[index].is_some() && !node.agent_blocked[index]
            }
            _ => false,
        }
    }

    /// Directions the agent may leave `id` by, in [`Direction::CARDINAL`] order.
    pub fn agent_directions(&self, id: NodeId) -> Vec<Direction> {
        Direction::CARDINAL
            .into_iter()
            .filter(|&direction| self.agent_may_leave(id, direction))
            .collect()
    }

    /// Directions a pursuer may leave `id` by. Pursuers ignore agent restrictions.
    pub fn pursuer_directions(&self, id: NodeId) -> Vec<Direction> {
        Direction::CARDINAL
            .into_iter()
            .filter(|&direction| self.neighbor(id, direction).is_some())
            .collect()
    }

    /// Node sitting exactly at `position`, if any.
    pub fn node_at(&self, position: Vec2) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.position == position)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.nodes.len()
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownNode { node: id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_bidirectional() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::new(0.0, 0.0));
        let b = graph.add_node(Vec2::new(16.0, 0.0));
        graph.connect(a, Direction::Right, b).unwrap();

        assert_eq!(graph.neighbor(a, Direction::Right), Some(b));
        assert_eq!(graph.neighbor(b, Direction::Left), Some(a));
        assert_eq!(graph.neighbor(a, Direction::Left), None);
    }

    #[test]
    fn test_agent_restriction_only_affects_agent() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::new(0.0, 0.0));
        let b = graph.add_node(Vec2::new(0.0, 16.0));
        graph.connect(a, Direction::Down, b).unwrap();
        graph.restrict_agent(a, Direction::Down).unwrap();

        assert!(graph.agent_directions(a).is_empty());
        assert_eq!(graph.pursuer_directions(a), vec![Direction::Down]);
    }

    #[test]
    fn test_unknown_node_is_rejected() {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::new(0.0, 0.0));
        assert!(matches!(
            graph.connect(a, Direction::Up, 7),
            Err(Error::UnknownNode { node: 7 })
        ));
    }
}
