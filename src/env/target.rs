//! Mobile-target agent
//!
//! Targets share the evader's observation and movement contract but are
//! contested entities rather than reward learners: they move inside a
//! slightly shrunken arena, freeze permanently once touched, and carry the
//! breeding flags the population layer drives. Reward is always reported
//! as zero.

use serde::{Deserialize, Serialize};

use crate::env::arena::ArenaBounds;
use crate::env::pursuer::Pursuer;
use crate::env::{Action, Agent, StepInfo, StepResult};

/// Identifier for a target within its field
pub type TargetId = usize;

/// Mobile-target tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Margin pulled in from each arena edge
    pub edge_margin: f32,

    /// Speed multiplier applied on top of the base integration
    pub speed: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self { edge_margin: 0.2, speed: 1.0 }
    }
}

/// A single mobile target
#[derive(Debug, Clone)]
pub struct TargetAgent {
    /// Identifier within the owning field
    pub id: TargetId,
    /// World x
    pub x: f32,
    /// World y
    pub y: f32,
    /// Fixed depth
    pub z: f32,

    speed: f32,
    bounds: ArenaBounds,

    touched: bool,
    can_breed: bool,
    breeding: bool,
    hole_active: bool,

    steps: usize,
}

impl TargetAgent {
    /// Create a live target at the given position
    ///
    /// `bounds` is the already-shrunken rectangle the target moves in.
    /// `can_breed` starts false; the owning field arms it after the breed
    /// delay.
    pub fn new(id: TargetId, x: f32, y: f32, z: f32, speed: f32, bounds: ArenaBounds) -> Self {
        Self {
            id,
            x,
            y,
            z,
            speed,
            bounds,
            touched: false,
            can_breed: false,
            breeding: false,
            hole_active: false,
            steps: 0,
        }
    }

    /// Whether this target has been hit
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether the breeding cooldown has armed
    pub fn can_breed(&self) -> bool {
        self.can_breed
    }

    /// Whether a breed is currently in progress (cooldown running)
    pub fn is_breeding(&self) -> bool {
        self.breeding
    }

    /// Whether the removal hole marker is showing
    pub fn hole_active(&self) -> bool {
        self.hole_active
    }

    /// One-way transition into the touched state
    ///
    /// Returns false if already touched, making double hits harmless. The
    /// hole marker activates at the current position.
    pub(crate) fn mark_touched(&mut self) -> bool {
        if self.touched {
            return false;
        }
        self.touched = true;
        self.hole_active = true;
        true
    }

    /// Record that a breed started: flags flip on the initiator only
    pub(crate) fn begin_breeding(&mut self) {
        self.breeding = true;
        self.can_breed = false;
    }

    /// Re-arm breeding after the delay or cooldown elapses
    pub(crate) fn rearm_breeding(&mut self) {
        self.breeding = false;
        self.can_breed = true;
    }

    /// Presentation hook: removal effects finished, hide the hole marker
    pub fn get_out(&mut self) {
        self.hole_active = false;
    }

    /// 2D distance to another target
    pub fn distance_to(&self, other: &TargetAgent) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Agent for TargetAgent {
    fn observe(&self, pursuer: &Pursuer) -> Vec<f32> {
        vec![self.x, self.y, self.x - pursuer.x, self.y - pursuer.y]
    }

    fn step(&mut self, action: Action, dt: f32, pursuer: &Pursuer) -> StepResult {
        // Touched targets are frozen entirely.
        if self.touched {
            return StepResult {
                observation: self.observe(pursuer),
                reward: 0.0,
                terminated: true,
                truncated: false,
                info: StepInfo { episode: 0, steps: self.steps },
            };
        }

        let next_x = self.x + action.horizontal * self.speed * dt;
        if self.bounds.contains_x(next_x) {
            self.x = next_x;
        }
        let next_y = self.y + action.vertical * self.speed * dt;
        if self.bounds.contains_y(next_y) {
            self.y = next_y;
        }

        self.steps += 1;

        StepResult {
            observation: self.observe(pursuer),
            reward: 0.0,
            terminated: false,
            truncated: false,
            info: StepInfo { episode: 0, steps: self.steps },
        }
    }

    fn reset(&mut self) {
        // Targets have no episode cycle of their own.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_bounds() -> ArenaBounds {
        ArenaBounds::default().shrink(0.2, 0.2).unwrap()
    }

    fn pursuer() -> Pursuer {
        Pursuer::external(ArenaBounds::default(), 0.0)
    }

    #[test]
    fn test_moves_within_tight_bounds() {
        let mut target = TargetAgent::new(0, 9.7, 0.0, 0.0, 1.0, tight_bounds());
        let pursuer = pursuer();

        // Candidate x = 9.9 exceeds the shrunken 9.8 edge.
        target.step(Action::new(2.0, 0.0), 0.1, &pursuer);
        assert_eq!(target.x, 9.7, "tight bounds reject the move");

        target.step(Action::new(-2.0, 1.0), 0.1, &pursuer);
        assert!((target.x - 9.5).abs() < 1e-6);
        assert!((target.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_speed_multiplier() {
        let mut target = TargetAgent::new(0, 0.0, 0.0, 0.0, 3.0, tight_bounds());
        target.step(Action::new(1.0, 0.0), 0.1, &pursuer());
        assert!((target.x - 0.3).abs() < 1e-6, "displacement scales by the speed multiplier");
    }

    #[test]
    fn test_touched_freezes_movement() {
        let mut target = TargetAgent::new(0, 0.0, 0.0, 0.0, 1.0, tight_bounds());
        assert!(target.mark_touched());

        let result = target.step(Action::new(5.0, 5.0), 0.1, &pursuer());
        assert_eq!((target.x, target.y), (0.0, 0.0), "touched target does not move");
        assert!(result.terminated);
    }

    #[test]
    fn test_mark_touched_is_one_way() {
        let mut target = TargetAgent::new(0, 0.0, 0.0, 0.0, 1.0, tight_bounds());
        assert!(target.mark_touched());
        assert!(!target.mark_touched(), "second hit is a no-op");
        assert!(target.is_touched());
    }

    #[test]
    fn test_breeding_flags() {
        let mut target = TargetAgent::new(0, 0.0, 0.0, 0.0, 1.0, tight_bounds());
        assert!(!target.can_breed(), "breeding starts disarmed");

        target.rearm_breeding();
        assert!(target.can_breed());
        assert!(!target.is_breeding());

        target.begin_breeding();
        assert!(!target.can_breed());
        assert!(target.is_breeding());
    }

    #[test]
    fn test_hole_marker_lifecycle() {
        let mut target = TargetAgent::new(0, 0.0, 0.0, 0.0, 1.0, tight_bounds());
        assert!(!target.hole_active());

        target.mark_touched();
        assert!(target.hole_active());

        target.get_out();
        assert!(!target.hole_active());
    }

    #[test]
    fn test_observation_layout() {
        let mut p = pursuer();
        p.set_position(1.0, 1.0);
        let target = TargetAgent::new(0, 4.0, 3.0, 0.0, 1.0, tight_bounds());
        assert_eq!(target.observe(&p), vec![4.0, 3.0, 3.0, 2.0]);
    }
}
