//! Common test utilities for the mazeq test suite.
//!
//! Graph builders, quarter-turn helpers and a recording observer shared by
//! the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mazeq::{
    Result,
    app::AgentConfig,
    maze::{Direction, NodeGraph, NodeId, Vec2},
    pipeline::EpisodeOutcome,
    ports::{Decision, Observer},
    q_learning::QLearningAgent,
};

/// Edge length used by the hand-built graphs.
pub const SPACING: f64 = 32.0;

/// Rotate a point `turns` quarter turns clockwise about the origin.
pub fn turn(position: Vec2, turns: usize) -> Vec2 {
    (0..turns % 4).fold(position, |p, _| p.rotate_cw())
}

/// Rotate a direction `turns` quarter turns clockwise.
pub fn turn_direction(direction: Direction, turns: usize) -> Direction {
    (0..turns % 4).fold(direction, |d, _| d.rotate_cw())
}

/// A centre node with one arm in every cardinal direction
pub struct Plus {
    pub graph: NodeGraph,
    pub center: NodeId,
    /// Arms indexed like [`Direction::CARDINAL`], before rotation.
    pub arms: [NodeId; 4],
}

impl Plus {
    pub fn arm(&self, direction: Direction) -> NodeId {
        self.arms[direction.index().expect("cardinal direction")]
    }
}

/// Plus-shaped graph centred on the origin, rotated `turns` quarter turns.
pub fn plus_graph(turns: usize) -> Plus {
    let mut graph = NodeGraph::new();
    let center = graph.add_node(Vec2::new(0.0, 0.0));
    let mut arms = [0; 4];
    for (slot, direction) in Direction::CARDINAL.into_iter().enumerate() {
        let (dx, dy) = direction.unit();
        let arm = graph.add_node(turn(Vec2::new(dx * SPACING, dy * SPACING), turns));
        graph
            .connect(center, turn_direction(direction, turns), arm)
            .expect("valid nodes");
        arms[slot] = arm;
    }
    Plus {
        graph,
        center,
        arms,
    }
}

/// `count` nodes spaced along the x axis from the origin, left to right.
pub fn line_graph(count: usize) -> (NodeGraph, Vec<NodeId>) {
    let mut graph = NodeGraph::new();
    let nodes: Vec<NodeId> = (0..count)
        .map(|i| graph.add_node(Vec2::new(i as f64 * SPACING, 0.0)))
        .collect();
    for pair in nodes.windows(2) {
        graph
            .connect(pair[0], Direction::Right, pair[1])
            .expect("valid nodes");
    }
    (graph, nodes)
}

/// Greedy learner with a fixed seed.
pub fn greedy_agent() -> QLearningAgent {
    QLearningAgent::new(AgentConfig::default().with_exploration_rate(0.0).with_seed(7))
        .expect("valid config")
}

/// Everything a [`RecordingObserver`] saw
#[derive(Debug, Default)]
pub struct Recording {
    pub decisions: Vec<Decision>,
    pub rewards: Vec<f64>,
    pub lives: Vec<u32>,
    pub outcomes: Vec<EpisodeOutcome>,
    pub checkpoints: usize,
}

/// Observer that records events into shared storage
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub recording: Arc<Mutex<Recording>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.recording.lock().unwrap().rewards.clone()
    }

    pub fn lives(&self) -> Vec<u32> {
        self.recording.lock().unwrap().lives.clone()
    }

    pub fn decisions(&self) -> Vec<Decision> {
        self.recording.lock().unwrap().decisions.clone()
    }

    pub fn outcomes(&self) -> Vec<EpisodeOutcome> {
        self.recording.lock().unwrap().outcomes.clone()
    }

    pub fn checkpoints(&self) -> usize {
        self.recording.lock().unwrap().checkpoints
    }
}

impl Observer for RecordingObserver {
    fn on_decision(&mut self, _episode: usize, decision: &Decision) -> Result<()> {
        self.recording.lock().unwrap().decisions.push(decision.clone());
        Ok(())
    }

    fn on_reward(&mut self, _episode: usize, reward: f64) -> Result<()> {
        self.recording.lock().unwrap().rewards.push(reward);
        Ok(())
    }

    fn on_life_lost(&mut self, _episode: usize, lives_remaining: u32) -> Result<()> {
        self.recording.lock().unwrap().lives.push(lives_remaining);
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, outcome: &EpisodeOutcome) -> Result<()> {
        self.recording.lock().unwrap().outcomes.push(outcome.clone());
        Ok(())
    }

    fn on_checkpoint(&mut self, _path: &std::path::Path) -> Result<()> {
        self.recording.lock().unwrap().checkpoints += 1;
        Ok(())
    }
}

/// Unit square: `[top-left, top-right, bottom-right, bottom-left]`, connected
/// clockwise.
pub fn square_graph() -> (NodeGraph, [NodeId; 4]) {
    let mut graph = NodeGraph::new();
    let corners = [(0.0, 0.0), (SPACING, 0.0), (SPACING, SPACING), (0.0, SPACING)]
        .map(|(x, y)| graph.add_node(Vec2::new(x, y)));
    let sides = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
    for (i, side) in sides.into_iter().enumerate() {
        graph
            .connect(corners[i], side, corners[(i + 1) % 4])
            .expect("valid nodes");
    }
    (graph, corners)
}
