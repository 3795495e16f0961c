//! Policy boundary
//!
//! The decision-making collaborator lives outside the core: it receives a
//! 4-float observation and returns a 2-float action. Training a policy is
//! out of scope here; the implementations below are scripted stand-ins
//! used for driving simulations and tests.

use rand::Rng;

use crate::env::Action;

/// The external decision-maker contract
///
/// Actions are unbounded; the environment clamps their effect through
/// arena bounds, never the values themselves.
pub trait Policy {
    /// Choose an action for the given observation
    fn act(&mut self, observation: &[f32]) -> Action;
}

/// Uniform random actions in `[-scale, scale]` per axis
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Half-width of the sampled action range
    pub scale: f32,
}

impl RandomPolicy {
    /// Random policy with the given action range
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[f32]) -> Action {
        let mut rng = rand::thread_rng();
        Action::new(
            rng.gen_range(-self.scale..self.scale),
            rng.gen_range(-self.scale..self.scale),
        )
    }
}

/// Moves directly away from the pursuer at a fixed speed
///
/// Uses the relative-position components of the observation
/// (`obs[2] = x - pursuer.x`, `obs[3] = y - pursuer.y`): moving along that
/// vector increases separation.
#[derive(Debug, Clone)]
pub struct FleePolicy {
    /// Magnitude of the emitted action
    pub speed: f32,
}

impl FleePolicy {
    /// Flee policy with the given action magnitude
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Policy for FleePolicy {
    fn act(&mut self, observation: &[f32]) -> Action {
        let dx = observation[2];
        let dy = observation[3];
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < 1e-6 {
            // On top of the pursuer; any direction is as good as another.
            return Action::new(self.speed, 0.0);
        }

        Action::new(dx / dist * self.speed, dy / dist * self.speed)
    }
}

/// Always emits the zero action; useful for deterministic tests
#[derive(Debug, Clone, Default)]
pub struct StillPolicy;

impl Policy for StillPolicy {
    fn act(&mut self, _observation: &[f32]) -> Action {
        Action::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_in_range() {
        let mut policy = RandomPolicy::new(2.0);
        for _ in 0..100 {
            let action = policy.act(&[0.0, 0.0, 0.0, 0.0]);
            assert!(action.horizontal.abs() <= 2.0);
            assert!(action.vertical.abs() <= 2.0);
        }
    }

    #[test]
    fn test_flee_policy_moves_away() {
        let mut policy = FleePolicy::new(5.0);

        // Pursuer is to the lower-left (dx, dy positive): flee up-right.
        let action = policy.act(&[0.0, 0.0, 3.0, 4.0]);
        assert!(action.horizontal > 0.0);
        assert!(action.vertical > 0.0);

        let magnitude =
            (action.horizontal * action.horizontal + action.vertical * action.vertical).sqrt();
        assert!((magnitude - 5.0).abs() < 1e-4, "flee action has fixed magnitude");
    }

    #[test]
    fn test_flee_policy_degenerate_overlap() {
        let mut policy = FleePolicy::new(5.0);
        let action = policy.act(&[0.0, 0.0, 0.0, 0.0]);
        assert!(action.horizontal != 0.0 || action.vertical != 0.0);
    }

    #[test]
    fn test_still_policy() {
        let mut policy = StillPolicy;
        assert_eq!(policy.act(&[1.0, 2.0, 3.0, 4.0]), Action::default());
    }
}
