//! Reward shaping between decision points

use crate::{app::RewardConfig, maze::RelativeDirection};

/// True if `action` turns the agent back the way it came.
///
/// `prior` is the state's prior direction at the time `action` was chosen.
pub fn is_reversal(action: RelativeDirection, prior: RelativeDirection) -> bool {
    action.is_opposite(prior)
}

/// Collectibles consumed since the previous decision, scaled, minus the
/// reverse-turn penalty when the previous action was a reversal.
pub fn shaped_reward(config: &RewardConfig, collectibles_consumed: u32, reversed: bool) -> f64 {
    let progress = f64::from(collectibles_consumed) * config.collectible_reward;
    if reversed {
        progress - config.reverse_penalty
    } else {
        progress
    }
}

/// Reward for the decision that preceded a death.
pub fn death_reward(config: &RewardConfig) -> f64 {
    -config.death_penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::RelativeDirection::{Backward, Forward, Left, Right};

    #[test]
    fn test_progress_is_scaled() {
        let config = RewardConfig::default();
        assert_eq!(shaped_reward(&config, 0, false), 0.0);
        assert_eq!(shaped_reward(&config, 3, false), 30.0);
    }

    #[test]
    fn test_forward_backward_reversal_is_penalized() {
        let config = RewardConfig::default();
        assert!(is_reversal(Backward, Forward));
        assert!(is_reversal(Forward, Backward));
        assert_eq!(shaped_reward(&config, 1, is_reversal(Backward, Forward)), -90.0);
    }

    #[test]
    fn test_left_right_reversal_is_penalized() {
        let config = RewardConfig::default();
        assert!(is_reversal(Left, Right));
        assert!(is_reversal(Right, Left));
        assert_eq!(shaped_reward(&config, 0, is_reversal(Right, Left)), -100.0);
    }

    #[test]
    fn test_turns_are_not_reversals() {
        assert!(!is_reversal(Left, Left));
        assert!(!is_reversal(Forward, Forward));
        assert!(!is_reversal(Left, Forward));
        assert!(!is_reversal(Backward, Right));
    }

    #[test]
    fn test_death_reward() {
        assert_eq!(death_reward(&RewardConfig::default()), -1000.0);
    }
}
