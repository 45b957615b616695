//! The canonical state must not depend on the maze's orientation on screen.

mod common;

use common::{SPACING, plus_graph, turn, turn_direction};
use mazeq::{
    encoding::{CanonicalState, encode},
    maze::{
        AgentBody, Collectible, Direction, PursuerBody, PursuerMode, RelativeDirection, Tally,
        Vec2, WorldView,
    },
};

/// Agent at the centre of a plus heading right, a pursuer coming down the
/// upper arm and pellets along the left arm, all rotated `turns` times.
fn encode_rotated(turns: usize, mode: PursuerMode) -> CanonicalState {
    let plus = plus_graph(turns);
    let agent = AgentBody {
        position: turn(Vec2::new(0.0, 0.0), turns),
        heading: turn_direction(Direction::Right, turns),
        node: plus.center,
        target: plus.center,
        at_node: true,
        alive: true,
    };
    let pursuers = [PursuerBody {
        position: turn(Vec2::new(0.0, -SPACING / 2.0), turns),
        heading: turn_direction(Direction::Down, turns),
        node: plus.arm(Direction::Up),
        target: plus.center,
        mode,
    }];
    let collectibles: Vec<Collectible> = [-8.0, -16.0, -24.0]
        .into_iter()
        .map(|x| {
            let p = turn(Vec2::new(x, 0.0), turns);
            Collectible::pellet(p.x, p.y)
        })
        .collect();

    let view = WorldView {
        graph: &plus.graph,
        agent: &agent,
        pursuers: &pursuers,
        collectibles: &collectibles,
        tally: Tally::default(),
        level_lost: false,
        level_won: false,
    };
    encode(&view, turn_direction(Direction::Right, turns)).unwrap()
}

#[test]
fn test_all_rotations_encode_identically() {
    let reference = encode_rotated(0, PursuerMode::Chase);
    for turns in 1..4 {
        assert_eq!(encode_rotated(turns, PursuerMode::Chase), reference, "turns = {turns}");
    }
}

#[test]
fn test_reference_state_contents() {
    let state = encode_rotated(0, PursuerMode::Chase);

    assert!(!state.hazard_immunity);
    assert_eq!(state.prior_direction, RelativeDirection::Forward);
    // Heading right, the upper arm is on the agent's left.
    assert!(state.pursuer_threats.get(RelativeDirection::Left));
    assert!(!state.pursuer_threats.get(RelativeDirection::Forward));
    // The left arm is behind the agent.
    assert!(state.collectible_edges.get(RelativeDirection::Backward));
    assert!(!state.collectible_edges.get(RelativeDirection::Forward));
    assert_eq!(state.nearest_collectible, Some(RelativeDirection::Backward));
}

#[test]
fn test_frightened_pursuers_grant_immunity_in_every_rotation() {
    for turns in 0..4 {
        assert!(encode_rotated(turns, PursuerMode::Frightened).hazard_immunity);
    }
}

/// Agent a quarter of the way along the right arm, a pursuer following it on
/// the same edge and pellets on both sides, all rotated `turns` times.
fn encode_mid_edge_rotated(turns: usize) -> CanonicalState {
    let plus = plus_graph(turns);
    let heading = turn_direction(Direction::Right, turns);
    let agent = AgentBody {
        position: turn(Vec2::new(SPACING / 4.0, 0.0), turns),
        heading,
        node: plus.center,
        target: plus.arm(Direction::Right),
        at_node: false,
        alive: true,
    };
    let pursuers = [PursuerBody {
        position: turn(Vec2::new(2.0, 0.0), turns),
        heading,
        node: plus.center,
        target: plus.arm(Direction::Right),
        mode: PursuerMode::Chase,
    }];
    let collectibles: Vec<Collectible> = [20.0, 4.0]
        .into_iter()
        .map(|x| {
            let p = turn(Vec2::new(x, 0.0), turns);
            Collectible::pellet(p.x, p.y)
        })
        .collect();

    let view = WorldView {
        graph: &plus.graph,
        agent: &agent,
        pursuers: &pursuers,
        collectibles: &collectibles,
        tally: Tally::default(),
        level_lost: false,
        level_won: false,
    };
    encode(&view, heading).unwrap()
}

#[test]
fn test_mid_edge_states_are_rotation_invariant() {
    let reference = encode_mid_edge_rotated(0);
    for turns in 1..4 {
        assert_eq!(encode_mid_edge_rotated(turns), reference, "turns = {turns}");
    }

    assert_eq!(reference.prior_direction, RelativeDirection::Forward);
    // Same edge, same direction, further from the target: a threat behind.
    assert!(reference.pursuer_threats.get(RelativeDirection::Backward));
    assert!(!reference.pursuer_threats.get(RelativeDirection::Forward));
    assert!(reference.collectible_edges.get(RelativeDirection::Forward));
    assert!(reference.collectible_edges.get(RelativeDirection::Backward));
    assert_eq!(reference.nearest_collectible, Some(RelativeDirection::Backward));
}

/// Agent at the centre heading up with a single pellet off every adjacent
/// edge, nearest to the right arm, all rotated `turns` times.
fn encode_far_collectible_rotated(turns: usize) -> CanonicalState {
    let plus = plus_graph(turns);
    let heading = turn_direction(Direction::Up, turns);
    let agent = AgentBody {
        position: turn(Vec2::new(0.0, 0.0), turns),
        heading,
        node: plus.center,
        target: plus.center,
        at_node: true,
        alive: true,
    };
    let pellet = turn(Vec2::new(SPACING, SPACING / 2.0), turns);
    let collectibles = [Collectible::pellet(pellet.x, pellet.y)];

    let view = WorldView {
        graph: &plus.graph,
        agent: &agent,
        pursuers: &[],
        collectibles: &collectibles,
        tally: Tally::default(),
        level_lost: false,
        level_won: false,
    };
    encode(&view, heading).unwrap()
}

#[test]
fn test_neighbour_fallback_is_rotation_invariant() {
    let reference = encode_far_collectible_rotated(0);
    for turns in 1..4 {
        assert_eq!(encode_far_collectible_rotated(turns), reference, "turns = {turns}");
    }

    assert!(!reference.collectible_edges.any());
    assert!(!reference.pursuer_threats.any());
    // Heading up, the right arm is the neighbour closest to the pellet.
    assert_eq!(reference.nearest_collectible, Some(RelativeDirection::Right));
}
