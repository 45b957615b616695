//! Reference maze-chase simulation
//!
//! Straightforward node-graph kinematics: entities travel edge to edge at a
//! fixed speed and only change course at nodes (the agent may also reverse
//! mid-edge). Pursuers alternate between scatter and chase, and flee while
//! frightened.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    direction::Direction,
    graph::{NodeGraph, Vec2},
    layout::MazeLayout,
    world::{
        AgentBody, Collectible, CollectibleKind, PursuerBody, PursuerMode, Tally, WorldView,
    },
};
use crate::{Error, Result, ports::Simulation};

const PELLET_POINTS: u64 = 10;
const POWER_PELLET_POINTS: u64 = 50;
const PURSUER_POINTS: u64 = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub lives: u32,
    /// Units per tick.
    pub agent_speed: f64,
    pub pursuer_speed: f64,
    pub frightened_speed: f64,
    pub frightened_ticks: u32,
    pub scatter_ticks: u32,
    pub chase_ticks: u32,
    pub eat_radius: f64,
    pub collision_radius: f64,
    pub tick_rate: f64,
    /// Use at most this many of the layout's pursuer starts.
    pub max_pursuers: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            agent_speed: 2.0,
            pursuer_speed: 1.6,
            frightened_speed: 1.0,
            frightened_ticks: 420,
            scatter_ticks: 420,
            chase_ticks: 1200,
            eat_radius: 4.0,
            collision_radius: 8.0,
            tick_rate: 60.0,
            max_pursuers: None,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_pursuers(mut self, max: usize) -> Self {
        self.max_pursuers = Some(max);
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = lives;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let speeds = [self.agent_speed, self.pursuer_speed, self.frightened_speed];
        if speeds.iter().any(|speed| !(speed.is_finite() && *speed > 0.0)) {
            return Err(Error::InvalidConfiguration {
                message: "entity speeds must be positive".to_string(),
            });
        }
        if self.eat_radius * 2.0 < self.agent_speed {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "agent speed {} would skip collectibles with eat radius {}",
                    self.agent_speed, self.eat_radius
                ),
            });
        }
        if self.lives == 0 {
            return Err(Error::InvalidConfiguration {
                message: "at least one life is required".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MazeSimulation {
    layout: MazeLayout,
    config: SimulationConfig,
    agent: AgentBody,
    pursuers: Vec<PursuerBody>,
    homes: Vec<Vec2>,
    collectibles: Vec<Collectible>,
    tally: Tally,
    level_lost: bool,
    level_won: bool,
    command: Direction,
    frightened_remaining: u32,
    mode_clock: u32,
    rng: StdRng,
}

impl MazeSimulation {
    pub fn new(layout: MazeLayout, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        layout.graph.node(layout.agent_start)?;
        for &start in &layout.pursuer_starts {
            layout.graph.node(start)?;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let homes = scatter_homes(&layout.graph);
        let agent = spawn_agent(&layout);

        let mut simulation = Self {
            layout,
            config,
            agent,
            pursuers: Vec::new(),
            homes,
            collectibles: Vec::new(),
            tally: Tally::default(),
            level_lost: false,
            level_won: false,
            command: Direction::Stop,
            frightened_remaining: 0,
            mode_clock: 0,
            rng,
        };
        simulation.start();
        Ok(simulation)
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    fn scheduled_mode(&self) -> PursuerMode {
        let cycle = self.config.scatter_ticks + self.config.chase_ticks;
        if cycle == 0 || self.mode_clock % cycle < self.config.scatter_ticks {
            PursuerMode::Scatter
        } else {
            PursuerMode::Chase
        }
    }

    fn spawn_pursuers(&mut self) {
        let limit = self
            .config
            .max_pursuers
            .unwrap_or(self.layout.pursuer_starts.len());
        let mode = self.scheduled_mode();
        self.pursuers = self
            .layout
            .pursuer_starts
            .iter()
            .take(limit)
            .map(|&start| PursuerBody {
                position: self.layout.graph.position(start),
                heading: Direction::Stop,
                node: start,
                target: start,
                mode,
            })
            .collect();
    }

    fn advance_agent(&mut self) {
        let graph = &self.layout.graph;
        let agent = &mut self.agent;
        let legal = WorldView {
            graph,
            agent,
            pursuers: &[],
            collectibles: &[],
            tally: self.tally,
            level_lost: false,
            level_won: false,
        }
        .legal_directions();
        let desired = if legal.contains(&self.command) {
            self.command
        } else {
            agent.heading
        };

        if agent.at_node {
            match graph.neighbor(agent.node, desired) {
                Some(next) if graph.agent_may_leave(agent.node, desired) => {
                    agent.target = next;
                    agent.heading = desired;
                }
                _ => agent.target = agent.node,
            }
        } else if desired == agent.heading.opposite() {
            std::mem::swap(&mut agent.node, &mut agent.target);
            agent.heading = desired;
        }

        if agent.target == agent.node {
            return;
        }

        let destination = graph.position(agent.target);
        if self.config.agent_speed >= agent.position.distance(destination) {
            let mut arrived = agent.target;
            if let Some(partner) = graph.portal(arrived) {
                arrived = partner;
            }
            agent.node = arrived;
            agent.position = graph.position(arrived);
            agent.at_node = true;
            agent.target = match graph.neighbor(arrived, agent.heading) {
                Some(next) if graph.agent_may_leave(arrived, agent.heading) => next,
                _ => arrived,
            };
        } else {
            agent.position = agent.position.step(agent.heading, self.config.agent_speed);
            agent.at_node = false;
        }
    }

    fn consume_collectibles(&mut self) {
        let position = self.agent.position;
        let radius = self.config.eat_radius;
        let mut frighten = false;
        let mut eaten = 0;
        let mut points = 0;
        self.collectibles.retain(|collectible| {
            if collectible.position.distance(position) > radius {
                return true;
            }
            eaten += 1;
            match collectible.kind {
                CollectibleKind::Pellet => points += PELLET_POINTS,
                CollectibleKind::PowerPellet => {
                    points += POWER_PELLET_POINTS;
                    frighten = true;
                }
            }
            false
        });
        self.tally.collectibles_eaten += eaten;
        self.tally.score += points;

        if frighten {
            self.frightened_remaining = self.config.frightened_ticks;
            for pursuer in &mut self.pursuers {
                pursuer.mode = PursuerMode::Frightened;
            }
        }
        if self.collectibles.is_empty() {
            self.level_won = true;
        }
    }

    fn advance_pursuers(&mut self) {
        let graph = &self.layout.graph;
        for (index, pursuer) in self.pursuers.iter_mut().enumerate() {
            let goal = match pursuer.mode {
                PursuerMode::Chase => Some(self.agent.position),
                PursuerMode::Scatter => self.homes.get(index % self.homes.len().max(1)).copied(),
                PursuerMode::Frightened => None,
            };
            let speed = if pursuer.mode == PursuerMode::Frightened {
                self.config.frightened_speed
            } else {
                self.config.pursuer_speed
            };

            if pursuer.target == pursuer.node {
                choose_exit(graph, pursuer, goal, &mut self.rng);
                if pursuer.target == pursuer.node {
                    continue;
                }
            }

            let destination = graph.position(pursuer.target);
            if speed >= pursuer.position.distance(destination) {
                let mut arrived = pursuer.target;
                if let Some(partner) = graph.portal(arrived) {
                    arrived = partner;
                }
                pursuer.node = arrived;
                pursuer.target = arrived;
                pursuer.position = graph.position(arrived);
                choose_exit(graph, pursuer, goal, &mut self.rng);
            } else {
                pursuer.position = pursuer.position.step(pursuer.heading, speed);
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let scheduled = self.scheduled_mode();
        for index in 0..self.pursuers.len() {
            let pursuer = &self.pursuers[index];
            if pursuer.position.distance(self.agent.position) > self.config.collision_radius {
                continue;
            }
            if pursuer.mode == PursuerMode::Frightened {
                self.tally.pursuers_eliminated += 1;
                self.tally.score += PURSUER_POINTS;
                let start = self.layout.pursuer_starts[index];
                self.pursuers[index] = PursuerBody {
                    position: self.layout.graph.position(start),
                    heading: Direction::Stop,
                    node: start,
                    target: start,
                    mode: scheduled,
                };
            } else {
                self.agent.alive = false;
                self.agent.heading = Direction::Stop;
                self.tally.lives = self.tally.lives.saturating_sub(1);
                if self.tally.lives == 0 {
                    self.level_lost = true;
                }
                return;
            }
        }
    }

    fn advance_clocks(&mut self) {
        self.mode_clock = self.mode_clock.wrapping_add(1);
        if self.frightened_remaining > 0 {
            self.frightened_remaining -= 1;
        }
        if self.frightened_remaining == 0 {
            let mode = self.scheduled_mode();
            for pursuer in &mut self.pursuers {
                pursuer.mode = mode;
            }
        }
    }
}

impl Simulation for MazeSimulation {
    fn start(&mut self) {
        self.collectibles = self.layout.collectibles.clone();
        self.tally = Tally {
            lives: self.config.lives,
            ..Tally::default()
        };
        self.level_lost = false;
        self.level_won = self.collectibles.is_empty();
        self.reset_level();
    }

    fn reset_level(&mut self) {
        self.agent = spawn_agent(&self.layout);
        self.command = Direction::Stop;
        self.frightened_remaining = 0;
        self.mode_clock = 0;
        self.spawn_pursuers();
    }

    fn view(&self) -> WorldView<'_> {
        WorldView {
            graph: &self.layout.graph,
            agent: &self.agent,
            pursuers: &self.pursuers,
            collectibles: &self.collectibles,
            tally: self.tally,
            level_lost: self.level_lost,
            level_won: self.level_won,
        }
    }

    fn command(&mut self, heading: Direction) {
        self.command = heading;
    }

    fn tick(&mut self) {
        if !self.agent.alive || self.level_lost || self.level_won {
            return;
        }
        self.advance_agent();
        self.consume_collectibles();
        if self.level_won {
            return;
        }
        self.resolve_collisions();
        if !self.agent.alive {
            return;
        }
        self.advance_pursuers();
        self.resolve_collisions();
        self.advance_clocks();
    }

    fn initial_heading(&self) -> Direction {
        self.layout.agent_heading
    }

    fn tick_rate(&self) -> f64 {
        self.config.tick_rate
    }
}

fn spawn_agent(layout: &MazeLayout) -> AgentBody {
    AgentBody {
        position: layout.graph.position(layout.agent_start),
        heading: layout.agent_heading,
        node: layout.agent_start,
        target: layout.agent_start,
        at_node: true,
        alive: true,
    }
}

/// Corners of the graph's bounding box, used as scatter targets.
fn scatter_homes(graph: &NodeGraph) -> Vec<Vec2> {
    let positions: Vec<Vec2> = graph.ids().map(|id| graph.position(id)).collect();
    if positions.is_empty() {
        return Vec::new();
    }
    let min_x = positions.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = positions.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = positions.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    vec![
        Vec2::new(max_x, min_y),
        Vec2::new(min_x, min_y),
        Vec2::new(max_x, max_y),
        Vec2::new(min_x, max_y),
    ]
}

/// Pick the next edge for a pursuer sitting on `pursuer.node`.
///
/// Pursuers never reverse unless the node is a dead end. With a goal they
/// take the exit whose far node is closest to it, otherwise a random one.
fn choose_exit(graph: &NodeGraph, pursuer: &mut PursuerBody, goal: Option<Vec2>, rng: &mut StdRng) {
    let exits = graph.pursuer_directions(pursuer.node);
    let forward: Vec<Direction> = exits
        .iter()
        .copied()
        .filter(|&direction| {
            pursuer.heading == Direction::Stop || direction != pursuer.heading.opposite()
        })
        .collect();
    let options = if forward.is_empty() { exits } else { forward };

    let chosen = match goal {
        Some(goal) => options.iter().copied().min_by(|&a, &b| {
            let distance = |direction| {
                graph
                    .neighbor(pursuer.node, direction)
                    .map_or(f64::INFINITY, |node| graph.position(node).distance(goal))
            };
            distance(a).total_cmp(&distance(b))
        }),
        None => options.choose(rng).copied(),
    };

    let step = chosen
        .and_then(|direction| graph.neighbor(pursuer.node, direction).map(|n| (direction, n)));
    match step {
        Some((direction, next)) => {
            pursuer.heading = direction;
            pursuer.target = next;
        }
        None => pursuer.target = pursuer.node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::NodeId;

    fn corridor() -> (NodeGraph, NodeId, NodeId) {
        let mut graph = NodeGraph::new();
        let a = graph.add_node(Vec2::new(0.0, 0.0));
        let b = graph.add_node(Vec2::new(32.0, 0.0));
        graph.connect(a, Direction::Right, b).unwrap();
        (graph, a, b)
    }

    #[test]
    fn test_agent_follows_command_and_eats() {
        let (graph, a, b) = corridor();
        let layout = MazeLayout::new(graph, a)
            .with_collectible(Collectible::pellet(16.0, 0.0))
            .with_collectible(Collectible::pellet(32.0, 0.0));
        let config = SimulationConfig::default().with_seed(1);
        let mut sim = MazeSimulation::new(layout, config).unwrap();

        sim.command(Direction::Right);
        for _ in 0..8 {
            sim.tick();
        }
        let view = sim.view();
        assert_eq!(view.agent.heading, Direction::Right);
        assert_eq!(view.agent.target, b);
        assert_eq!(view.tally.collectibles_eaten, 1);
        assert_eq!(view.tally.score, PELLET_POINTS);
        assert!(!view.level_won);
    }

    #[test]
    fn test_arrival_sets_at_node() {
        let (graph, a, b) = corridor();
        let layout = MazeLayout::new(graph, a).with_collectible(Collectible::pellet(100.0, 100.0));
        let mut sim = MazeSimulation::new(layout, SimulationConfig::default()).unwrap();

        sim.command(Direction::Right);
        for _ in 0..16 {
            sim.tick();
        }
        let view = sim.view();
        assert!(view.agent.at_node);
        assert_eq!(view.agent.node, b);
        assert_eq!(view.agent.position, Vec2::new(32.0, 0.0));
    }

    #[test]
    fn test_mid_edge_reversal_swaps_endpoints() {
        let (graph, a, b) = corridor();
        let layout = MazeLayout::new(graph, a).with_collectible(Collectible::pellet(100.0, 100.0));
        let mut sim = MazeSimulation::new(layout, SimulationConfig::default()).unwrap();

        sim.command(Direction::Right);
        sim.tick();
        sim.tick();
        sim.command(Direction::Left);
        sim.tick();
        let view = sim.view();
        assert_eq!(view.agent.heading, Direction::Left);
        assert_eq!(view.agent.node, b);
        assert_eq!(view.agent.target, a);
        assert_eq!(view.agent.position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_collision_costs_a_life() {
        let (graph, a, b) = corridor();
        let layout = MazeLayout::new(graph, a)
            .with_pursuer(b)
            .with_collectible(Collectible::pellet(100.0, 100.0));
        let config = SimulationConfig::default().with_lives(1).with_seed(3);
        let mut sim = MazeSimulation::new(layout, config).unwrap();

        for _ in 0..40 {
            sim.tick();
        }
        let view = sim.view();
        assert!(!view.agent.alive);
        assert!(view.level_lost);
        assert_eq!(view.tally.lives, 0);
    }

    #[test]
    fn test_power_pellet_frightens_and_pursuer_is_eliminated() {
        let (graph, a, b) = corridor();
        let layout = MazeLayout::new(graph, a)
            .with_pursuer(b)
            .with_collectible(Collectible::power(0.0, 0.0))
            .with_collectible(Collectible::pellet(100.0, 100.0));
        let config = SimulationConfig::default().with_seed(5);
        let mut sim = MazeSimulation::new(layout, config).unwrap();

        sim.tick();
        assert!(sim.view().hazard_immunity());
        for _ in 0..30 {
            sim.tick();
        }
        let view = sim.view();
        assert!(view.agent.alive);
        assert!(view.tally.pursuers_eliminated >= 1);
    }

    #[test]
    fn test_reset_level_keeps_consumed_collectibles() {
        let (graph, a, _) = corridor();
        let layout = MazeLayout::new(graph, a)
            .with_collectible(Collectible::pellet(0.0, 0.0))
            .with_collectible(Collectible::pellet(100.0, 100.0));
        let mut sim = MazeSimulation::new(layout, SimulationConfig::default()).unwrap();

        sim.tick();
        assert_eq!(sim.view().collectibles.len(), 1);
        sim.reset_level();
        assert_eq!(sim.view().collectibles.len(), 1);
        sim.start();
        assert_eq!(sim.view().collectibles.len(), 2);
    }
}
