//! Value table for tabular Q-learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{encoding::CanonicalState, maze::RelativeDirection};

/// Sparse mapping from (state, action) pairs to value estimates
///
/// Entries are created on first write; unseen pairs read as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    #[serde(with = "entry_list")]
    values: HashMap<(CanonicalState, RelativeDirection), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a state-action pair
    pub fn get(&self, state: &CanonicalState, action: RelativeDirection) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: CanonicalState, action: RelativeDirection, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Maximum value over `actions`, 0.0 when there are none
    pub fn max_value(&self, state: &CanonicalState, actions: &[RelativeDirection]) -> f64 {
        actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Highest-valued action; the earliest candidate wins ties
    pub fn best_action(
        &self,
        state: &CanonicalState,
        actions: &[RelativeDirection],
    ) -> Option<RelativeDirection> {
        let mut best: Option<(RelativeDirection, f64)> = None;
        for &action in actions {
            let value = self.get(state, action);
            if best.is_none_or(|(_, top)| value > top) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// One-step TD update
    ///
    /// V(s,a) ← (1-α)·V(s,a) + α·(r + γ·next − V(s,a))
    pub fn update(
        &mut self,
        state: CanonicalState,
        action: RelativeDirection,
        reward: f64,
        next_max: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current = self.get(&state, action);
        let td_error = reward + discount_factor * next_max - current;
        let updated = (1.0 - learning_rate) * current + learning_rate * td_error;
        self.set(state, action, updated);
        updated
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalState, RelativeDirection, f64)> + '_ {
        self.values
            .iter()
            .map(|((state, action), value)| (state, *action, *value))
    }
}

/// MessagePack and JSON maps need scalar keys, so the table is stored as a
/// list of `(state, action, value)` rows.
mod entry_list {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{encoding::CanonicalState, maze::RelativeDirection};

    type Values = HashMap<(CanonicalState, RelativeDirection), f64>;

    pub fn serialize<S: Serializer>(values: &Values, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rows: Vec<_> = values
            .iter()
            .map(|((state, action), value)| (state, action, value))
            .collect();
        rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Values, D::Error> {
        let rows = Vec::<(CanonicalState, RelativeDirection, f64)>::deserialize(deserializer)?;
        Ok(rows
            .into_iter()
            .map(|(state, action, value)| ((state, action), value))
            .collect())
    }
}
