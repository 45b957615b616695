//! Canonical, heading-relative state used as the value-table key

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maze::RelativeDirection;

/// One boolean per relative direction, packed into a byte
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RelativeFlags(u8);

impl RelativeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, direction: RelativeDirection, value: bool) {
        let bit = 1 << direction.index();
        if value {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn with(mut self, direction: RelativeDirection) -> Self {
        self.set(direction, true);
        self
    }

    pub fn get(&self, direction: RelativeDirection) -> bool {
        self.0 & (1 << direction.index()) != 0
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = RelativeDirection> + '_ {
        RelativeDirection::ALL
            .into_iter()
            .filter(|&direction| self.get(direction))
    }
}

impl FromIterator<RelativeDirection> for RelativeFlags {
    fn from_iter<I: IntoIterator<Item = RelativeDirection>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl fmt::Display for RelativeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in RelativeDirection::ALL {
            let mark = if self.get(direction) {
                direction.short_name()
            } else {
                '-'
            };
            write!(f, "{mark}")?;
        }
        Ok(())
    }
}

/// Rotation-normalized description of the agent's situation
///
/// Every field is expressed relative to the agent's heading, so worlds that
/// are rotations of one another about the agent map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalState {
    /// A pursuer is frightened: the agent cannot be harmed.
    pub hazard_immunity: bool,
    /// Turn made on arrival at the current node (FORWARD when mid-edge).
    pub prior_direction: RelativeDirection,
    pub pursuer_threats: RelativeFlags,
    pub collectible_edges: RelativeFlags,
    pub nearest_collectible: Option<RelativeDirection>,
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nearest = self
            .nearest_collectible
            .map_or_else(|| "NONE".to_string(), |direction| direction.to_string());
        write!(
            f,
            "[{}, {}, threats={}, collectibles={}, nearest={}]",
            self.hazard_immunity,
            self.prior_direction,
            self.pursuer_threats,
            self.collectible_edges,
            nearest
        )
    }
}
