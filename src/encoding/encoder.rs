//! World view to canonical state

use tracing::trace;

use super::{
    geometry::{edge_has_collectible, nearest_collectible, relative_bearing},
    state::{CanonicalState, RelativeFlags},
};
use crate::{
    Result,
    maze::{Direction, NodeId, RelativeDirection, Vec2, WorldView},
};

/// Encode the agent's situation relative to its heading.
///
/// `previous_heading` is the heading the agent held before its most recent
/// tick; at a node it yields the turn the agent just made.
pub fn encode(world: &WorldView<'_>, previous_heading: Direction) -> Result<CanonicalState> {
    let state = CanonicalState {
        hazard_immunity: world.hazard_immunity(),
        prior_direction: prior_direction(world, previous_heading)?,
        pursuer_threats: pursuer_threats(world)?,
        collectible_edges: collectible_edges(world)?,
        nearest_collectible: nearest_collectible_direction(world)?,
    };
    trace!(%state, "encoded world");
    Ok(state)
}

/// Turn made on arrival at the current node. FORWARD when mid-edge or when
/// there is no previous heading.
fn prior_direction(
    world: &WorldView<'_>,
    previous_heading: Direction,
) -> Result<RelativeDirection> {
    if !world.agent.at_node || previous_heading == Direction::Stop {
        return Ok(RelativeDirection::Forward);
    }
    RelativeDirection::from_absolute(world.agent.heading, previous_heading)
}

/// Legal exits from the agent's node paired with the node at the far end.
fn exits(world: &WorldView<'_>) -> Vec<(Direction, NodeId)> {
    world
        .legal_directions()
        .into_iter()
        .filter_map(|direction| {
            world
                .graph
                .neighbor(world.agent.node, direction)
                .map(|far| (direction, far))
        })
        .collect()
}

fn pursuer_threats(world: &WorldView<'_>) -> Result<RelativeFlags> {
    let agent = world.agent;
    let mut flags = RelativeFlags::new();

    if agent.at_node {
        for (direction, far) in exits(world) {
            let threatened = world.pursuers.iter().any(|pursuer| {
                let approaching = pursuer.target == far && pursuer.node != agent.node;
                let incoming = pursuer.node == far && pursuer.target == agent.node;
                approaching || incoming
            });
            flags.set(
                RelativeDirection::from_absolute(agent.heading, direction)?,
                threatened,
            );
        }
        return Ok(flags);
    }

    let source = world.graph.node(agent.node)?.position;
    let target = world.graph.node(agent.target)?.position;
    for pursuer in world.pursuers {
        if pursuer.target == agent.target {
            if pursuer.node != agent.node {
                flags.set(RelativeDirection::Forward, true);
            } else if pursuer.position.distance(target) > agent.position.distance(target) {
                // Same edge, same direction, following behind.
                flags.set(RelativeDirection::Backward, true);
            }
        }
        if pursuer.target == agent.node {
            if pursuer.node != agent.target {
                flags.set(RelativeDirection::Backward, true);
            } else if pursuer.position.distance(source) > agent.position.distance(source) {
                flags.set(RelativeDirection::Forward, true);
            }
        }
    }
    Ok(flags)
}

fn collectible_edges(world: &WorldView<'_>) -> Result<RelativeFlags> {
    let agent = world.agent;
    let mut flags = RelativeFlags::new();

    if agent.at_node {
        let here = world.graph.node(agent.node)?.position;
        for (direction, far) in exits(world) {
            let there = world.graph.node(far)?.position;
            flags.set(
                RelativeDirection::from_absolute(agent.heading, direction)?,
                edge_has_collectible(here, there, world.collectibles)?,
            );
        }
        return Ok(flags);
    }

    let source = world.graph.node(agent.node)?.position;
    let target = world.graph.node(agent.target)?.position;
    flags.set(
        RelativeDirection::Forward,
        edge_has_collectible(agent.position, target, world.collectibles)?,
    );
    flags.set(
        RelativeDirection::Backward,
        edge_has_collectible(agent.position, source, world.collectibles)?,
    );
    Ok(flags)
}

fn nearest_collectible_direction(world: &WorldView<'_>) -> Result<Option<RelativeDirection>> {
    let agent = world.agent;
    if world.collectibles.is_empty() {
        return Ok(Some(RelativeDirection::Forward));
    }

    if collectible_edges(world)?.any() {
        return match nearest_collectible(agent.position, world.collectibles) {
            Some((collectible, _)) => {
                relative_bearing(agent.position, collectible.position, agent.heading).map(Some)
            }
            None => Ok(Some(RelativeDirection::Forward)),
        };
    }

    // Nothing on an adjacent edge: pick the neighbouring node that minimises
    // its own distance to a collectible plus the agent's distance to it.
    let neighbors = if agent.at_node {
        exits(world)
    } else {
        vec![
            (agent.heading, agent.target),
            (agent.heading.opposite(), agent.node),
        ]
    };
    let mut candidates = neighbors
        .into_iter()
        .map(|(direction, node)| {
            Ok((
                RelativeDirection::from_absolute(agent.heading, direction)?,
                world.graph.node(node)?.position,
            ))
        })
        .collect::<Result<Vec<(RelativeDirection, Vec2)>>>()?;
    candidates.sort_by_key(|(relative, _)| *relative);

    let mut best = None;
    let mut shortest = f64::INFINITY;
    for (relative, position) in candidates {
        let Some((_, remaining)) = nearest_collectible(position, world.collectibles) else {
            continue;
        };
        let distance = remaining + agent.position.manhattan_distance(position);
        if distance < shortest {
            shortest = distance;
            best = Some(relative);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{AgentBody, Collectible, NodeGraph, PursuerBody, PursuerMode, Tally};

    /// Plus-shaped junction: centre 0 with arms 1 (up), 2 (right), 3 (down), 4 (left).
    fn plus() -> NodeGraph {
        let mut graph = NodeGraph::new();
        let centre = graph.add_node(Vec2::new(32.0, 32.0));
        let up = graph.add_node(Vec2::new(32.0, 0.0));
        let right = graph.add_node(Vec2::new(64.0, 32.0));
        let down = graph.add_node(Vec2::new(32.0, 64.0));
        let left = graph.add_node(Vec2::new(0.0, 32.0));
        graph.connect(centre, Direction::Up, up).unwrap();
        graph.connect(centre, Direction::Right, right).unwrap();
        graph.connect(centre, Direction::Down, down).unwrap();
        graph.connect(centre, Direction::Left, left).unwrap();
        graph
    }

    fn at_centre(heading: Direction) -> AgentBody {
        AgentBody {
            position: Vec2::new(32.0, 32.0),
            heading,
            node: 0,
            target: 0,
            at_node: true,
            alive: true,
        }
    }

    fn pursuer(position: Vec2, node: NodeId, target: NodeId, mode: PursuerMode) -> PursuerBody {
        PursuerBody {
            position,
            heading: Direction::Stop,
            node,
            target,
            mode,
        }
    }

    fn view<'a>(
        graph: &'a NodeGraph,
        agent: &'a AgentBody,
        pursuers: &'a [PursuerBody],
        collectibles: &'a [Collectible],
    ) -> WorldView<'a> {
        WorldView {
            graph,
            agent,
            pursuers,
            collectibles,
            tally: Tally::default(),
            level_lost: false,
            level_won: false,
        }
    }

    #[test]
    fn test_prior_direction_at_node() {
        let graph = plus();
        let agent = at_centre(Direction::Right);
        let world = view(&graph, &agent, &[], &[]);
        // Was heading up, now heading right: came in from a right turn, so the
        // previous heading sits to the left of the current one.
        let state = encode(&world, Direction::Up).unwrap();
        assert_eq!(state.prior_direction, RelativeDirection::Left);
        let state = encode(&world, Direction::Stop).unwrap();
        assert_eq!(state.prior_direction, RelativeDirection::Forward);
    }

    #[test]
    fn test_collectible_edges_and_nearest_at_node() {
        let graph = plus();
        let agent = at_centre(Direction::Up);
        let pellets = [Collectible::pellet(48.0, 32.0), Collectible::pellet(0.0, 32.0)];
        let world = view(&graph, &agent, &[], &pellets);
        let state = encode(&world, Direction::Up).unwrap();
        assert!(state.collectible_edges.get(RelativeDirection::Right));
        assert!(state.collectible_edges.get(RelativeDirection::Left));
        assert!(!state.collectible_edges.get(RelativeDirection::Forward));
        assert_eq!(state.nearest_collectible, Some(RelativeDirection::Right));
    }

    #[test]
    fn test_threat_from_pursuer_heading_to_neighbor() {
        let graph = plus();
        let agent = at_centre(Direction::Up);
        // Pursuer on the far side of the up arm, travelling toward node 1.
        let pursuers = [pursuer(Vec2::new(32.0, -16.0), 5, 1, PursuerMode::Chase)];
        let world = view(&graph, &agent, &pursuers, &[]);
        let state = encode(&world, Direction::Up).unwrap();
        assert!(state.pursuer_threats.get(RelativeDirection::Forward));
        assert!(!state.pursuer_threats.get(RelativeDirection::Backward));
        assert!(!state.hazard_immunity);
    }

    #[test]
    fn test_pursuer_leaving_agent_node_is_not_a_threat() {
        let graph = plus();
        let agent = at_centre(Direction::Up);
        let pursuers = [pursuer(Vec2::new(48.0, 32.0), 0, 2, PursuerMode::Chase)];
        let world = view(&graph, &agent, &pursuers, &[]);
        let state = encode(&world, Direction::Up).unwrap();
        assert!(!state.pursuer_threats.any());
    }

    #[test]
    fn test_mid_edge_threats() {
        let graph = plus();
        let agent = AgentBody {
            position: Vec2::new(48.0, 32.0),
            heading: Direction::Right,
            node: 0,
            target: 2,
            at_node: false,
            alive: true,
        };
        // Behind on the same edge, same travel direction.
        let chasing = [pursuer(Vec2::new(40.0, 32.0), 0, 2, PursuerMode::Chase)];
        let state = encode(&view(&graph, &agent, &chasing, &[]), Direction::Right).unwrap();
        assert!(state.pursuer_threats.get(RelativeDirection::Backward));
        assert!(!state.pursuer_threats.get(RelativeDirection::Forward));

        // Coming head-on along the same edge.
        let oncoming = [pursuer(Vec2::new(56.0, 32.0), 2, 0, PursuerMode::Frightened)];
        let state = encode(&view(&graph, &agent, &oncoming, &[]), Direction::Right).unwrap();
        assert!(state.pursuer_threats.get(RelativeDirection::Forward));
        assert!(state.hazard_immunity);
    }

    #[test]
    fn test_mid_edge_prior_is_forward() {
        let graph = plus();
        let agent = AgentBody {
            position: Vec2::new(48.0, 32.0),
            heading: Direction::Right,
            node: 0,
            target: 2,
            at_node: false,
            alive: true,
        };
        let pellets = [Collectible::pellet(40.0, 32.0)];
        let state = encode(&view(&graph, &agent, &[], &pellets), Direction::Up).unwrap();
        assert_eq!(state.prior_direction, RelativeDirection::Forward);
        assert!(state.collectible_edges.get(RelativeDirection::Backward));
        assert!(!state.collectible_edges.get(RelativeDirection::Forward));
        assert_eq!(state.nearest_collectible, Some(RelativeDirection::Backward));
    }

    #[test]
    fn test_nearest_falls_back_to_neighbor_distance() {
        let graph = plus();
        let agent = at_centre(Direction::Up);
        // Not on any edge from the centre; closest via the right arm.
        let pellets = [Collectible::pellet(64.0, 16.0)];
        let state = encode(&view(&graph, &agent, &[], &pellets), Direction::Up).unwrap();
        assert!(!state.collectible_edges.any());
        assert_eq!(state.nearest_collectible, Some(RelativeDirection::Right));
    }

    #[test]
    fn test_no_collectibles_reads_forward() {
        let graph = plus();
        let agent = at_centre(Direction::Left);
        let state = encode(&view(&graph, &agent, &[], &[]), Direction::Left).unwrap();
        assert_eq!(state.nearest_collectible, Some(RelativeDirection::Forward));
    }
}
