//! Reward-driven evader agent
//!
//! The evader flees the pursuer inside the arena. It earns a small living
//! reward every step it stays free, pays a penalty and ends the episode on
//! contact, and collects a bonus when it survives to the step limit. Both
//! terminations can fire on the same step, in which case both reward
//! deltas apply.

use serde::{Deserialize, Serialize};

use crate::env::arena::ArenaBounds;
use crate::env::pursuer::Pursuer;
use crate::env::{Action, Agent, SpaceInfo, SpaceType, StepInfo, StepResult};
use crate::feedback::{FeedbackEvent, FeedbackSink};

/// Evader tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvaderConfig {
    /// Arena the evader moves in
    pub arena: ArenaBounds,

    /// Steps after which the episode truncates with the survival bonus
    pub max_steps: usize,

    /// Contact distance to the pursuer that terminates the episode
    pub contact_radius: f32,

    /// Reward added on every uncaught step
    pub living_reward: f32,

    /// Reward added on contact (negative)
    pub contact_penalty: f32,

    /// Reward added when the step limit is reached
    pub survival_bonus: f32,
}

impl Default for EvaderConfig {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            max_steps: 1000,
            contact_radius: 1.0,
            living_reward: 0.01,
            contact_penalty: -1.0,
            survival_bonus: 5.0,
        }
    }
}

/// The reward-driven agent: position, episode counters, done flag
#[derive(Debug)]
pub struct EvaderAgent {
    /// World x
    pub x: f32,
    /// World y
    pub y: f32,
    /// Fixed depth, captured at construction
    pub z: f32,

    steps: usize,
    cumulative_reward: f32,
    done: bool,
    episode: usize,

    /// Index used in display events when several evaders share a run
    pub id: usize,

    config: EvaderConfig,
    feedback: FeedbackSink,
}

impl EvaderAgent {
    /// Create an evader at a uniformly random arena position
    pub fn new(id: usize, z: f32, config: EvaderConfig, feedback: FeedbackSink) -> Self {
        let mut rng = rand::thread_rng();
        let (x, y) = config.arena.random_point(&mut rng);

        Self {
            x,
            y,
            z,
            steps: 0,
            cumulative_reward: 0.0,
            done: false,
            episode: 0,
            id,
            config,
            feedback,
        }
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Reward accumulated in the current episode
    pub fn cumulative_reward(&self) -> f32 {
        self.cumulative_reward
    }

    /// Whether the current episode has ended
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Episodes started so far
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Observation space: 4 continuous values
    pub fn observation_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![4], dtype: SpaceType::Continuous }
    }

    /// Action space: 2 continuous values
    pub fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![2], dtype: SpaceType::Continuous }
    }

    fn info(&self) -> StepInfo {
        StepInfo { episode: self.episode, steps: self.steps }
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

impl Agent for EvaderAgent {
    fn observe(&self, pursuer: &Pursuer) -> Vec<f32> {
        vec![self.x, self.y, self.x - pursuer.x, self.y - pursuer.y]
    }

    fn step(&mut self, action: Action, dt: f32, pursuer: &Pursuer) -> StepResult {
        if self.done {
            return StepResult {
                observation: self.observe(pursuer),
                reward: 0.0,
                terminated: true,
                truncated: false,
                info: self.info(),
            };
        }

        // Axis-independent soft clamping: a candidate that leaves bounds on
        // one axis still moves on the other.
        let next_x = self.x + action.horizontal * dt;
        if self.config.arena.contains_x(next_x) {
            self.x = next_x;
        }
        let next_y = self.y + action.vertical * dt;
        if self.config.arena.contains_y(next_y) {
            self.y = next_y;
        }

        self.steps += 1;

        let mut reward = 0.0;
        let mut terminated = false;

        if pursuer.distance_to(self.x, self.y) < self.config.contact_radius {
            reward += self.config.contact_penalty;
            terminated = true;
        } else {
            reward += self.config.living_reward;
        }

        // Step-limit check is independent; its bonus stacks with the
        // contact penalty when both fire on the same call.
        let truncated = self.steps >= self.config.max_steps;
        if truncated {
            reward += self.config.survival_bonus;
        }

        self.cumulative_reward += reward;
        self.done = terminated || truncated;

        self.feedback.emit(FeedbackEvent::RewardText {
            agent: self.id,
            text: format!("{:.2}", self.cumulative_reward),
        });

        StepResult {
            observation: self.observe(pursuer),
            reward,
            terminated,
            truncated,
            info: self.info(),
        }
    }

    fn reset(&mut self) {
        let mut rng = rand::thread_rng();
        let (x, y) = self.config.arena.random_point(&mut rng);
        self.x = x;
        self.y = y;

        self.steps = 0;
        self.cumulative_reward = 0.0;
        self.done = false;
        self.episode += 1;

        self.feedback.emit(FeedbackEvent::AttemptCount {
            agent: self.id,
            attempts: self.episode,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn far_pursuer() -> Pursuer {
        // Park the pursuer outside contact range of the whole arena.
        let mut pursuer = Pursuer::external(ArenaBounds::default(), 0.0);
        pursuer.set_position(100.0, 100.0);
        pursuer
    }

    fn test_agent(config: EvaderConfig) -> EvaderAgent {
        EvaderAgent::new(0, 0.0, config, FeedbackSink::disconnected())
    }

    #[test]
    fn test_observation_layout() {
        let mut agent = test_agent(EvaderConfig::default());
        agent.set_position(2.0, -1.0);

        let mut pursuer = Pursuer::external(ArenaBounds::default(), 0.0);
        pursuer.set_position(0.5, 0.5);

        let obs = agent.observe(&pursuer);
        assert_eq!(obs, vec![2.0, -1.0, 1.5, -1.5]);
    }

    #[test]
    fn test_living_reward_accumulates() {
        let mut agent = test_agent(EvaderConfig::default());
        agent.set_position(0.0, 0.0);
        let pursuer = far_pursuer();

        for _ in 0..100 {
            agent.step(Action::default(), 0.02, &pursuer);
        }

        assert!(
            (agent.cumulative_reward() - 1.0).abs() < 1e-4,
            "100 living steps should accumulate 100 * 0.01, got {}",
            agent.cumulative_reward()
        );
        assert!(!agent.is_done());
    }

    #[test]
    fn test_contact_terminates_with_penalty() {
        let mut agent = test_agent(EvaderConfig::default());
        agent.set_position(0.0, 0.0);

        let mut pursuer = Pursuer::external(ArenaBounds::default(), 0.0);
        pursuer.set_position(0.5, 0.0);

        let result = agent.step(Action::default(), 0.02, &pursuer);
        assert!(result.terminated);
        assert!(!result.truncated);
        assert_eq!(result.reward, -1.0);
        assert!(agent.is_done());
    }

    #[test]
    fn test_step_limit_bonus() {
        let mut agent = test_agent(EvaderConfig { max_steps: 10, ..EvaderConfig::default() });
        agent.set_position(0.0, 0.0);
        let pursuer = far_pursuer();

        for _ in 0..9 {
            let result = agent.step(Action::default(), 0.02, &pursuer);
            assert!(!result.is_done());
        }

        let result = agent.step(Action::default(), 0.02, &pursuer);
        assert!(result.truncated);
        assert!(!result.terminated);
        assert!(
            (result.reward - 5.01).abs() < 1e-6,
            "final step carries living reward plus bonus, got {}",
            result.reward
        );
    }

    #[test]
    fn test_contact_and_limit_stack() {
        // Both terminations fire on the same call: -1 + 5 = 4.
        let mut agent = test_agent(EvaderConfig { max_steps: 1, ..EvaderConfig::default() });
        agent.set_position(0.0, 0.0);

        let mut pursuer = Pursuer::external(ArenaBounds::default(), 0.0);
        pursuer.set_position(0.0, 0.0);

        let result = agent.step(Action::default(), 0.02, &pursuer);
        assert!(result.terminated && result.truncated);
        assert!(
            (result.reward - 4.0).abs() < 1e-6,
            "stacked delta should be -1 + 5 = 4, got {}",
            result.reward
        );
    }

    #[test]
    fn test_bounds_reject_axis_independently() {
        // Scenario from the movement contract: candidate x of exactly 10.0
        // is not strictly inside, so the x displacement is dropped.
        let mut agent = test_agent(EvaderConfig::default());
        agent.set_position(9.9, 0.0);
        let pursuer = far_pursuer();

        agent.step(Action::new(1.0, 0.0), 0.1, &pursuer);
        assert_eq!(agent.x, 9.9, "candidate x = 10.0 is out of bounds");
        assert_eq!(agent.y, 0.0);

        // The y axis still applies when only x violates.
        agent.step(Action::new(1.0, 1.0), 0.1, &pursuer);
        assert_eq!(agent.x, 9.9);
        assert!((agent.y - 0.1).abs() < 1e-6, "y displacement applies independently");
    }

    #[test]
    fn test_position_stays_in_bounds() {
        let mut agent = test_agent(EvaderConfig::default());
        agent.set_position(0.0, 0.0);
        let pursuer = far_pursuer();
        let mut rng = rand::thread_rng();

        for _ in 0..2000 {
            let action = Action::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            agent.step(action, 0.1, &pursuer);
            assert!(
                agent.x > -10.0 && agent.x < 10.0 && agent.y > -5.0 && agent.y < 5.0,
                "position ({}, {}) escaped the arena",
                agent.x,
                agent.y
            );
            if agent.is_done() {
                agent.reset();
                agent.set_position(0.0, 0.0);
            }
        }
    }

    #[test]
    fn test_done_freezes_state() {
        let mut agent = test_agent(EvaderConfig { max_steps: 1, ..EvaderConfig::default() });
        agent.set_position(0.0, 0.0);
        let pursuer = far_pursuer();

        agent.step(Action::default(), 0.02, &pursuer);
        assert!(agent.is_done());

        let reward_before = agent.cumulative_reward();
        let result = agent.step(Action::new(10.0, 10.0), 0.02, &pursuer);
        assert_eq!(result.reward, 0.0);
        assert_eq!(agent.cumulative_reward(), reward_before);
        assert_eq!(agent.steps(), 1, "frozen agent takes no further steps");
    }

    #[test]
    fn test_reset_clears_episode_state() {
        let mut agent = test_agent(EvaderConfig { max_steps: 5, ..EvaderConfig::default() });
        agent.set_position(0.0, 0.0);
        let pursuer = far_pursuer();

        for _ in 0..5 {
            agent.step(Action::default(), 0.02, &pursuer);
        }
        assert!(agent.is_done());

        agent.reset();
        assert_eq!(agent.steps(), 0);
        assert_eq!(agent.cumulative_reward(), 0.0);
        assert!(!agent.is_done());
        assert_eq!(agent.episode(), 1);
        assert!(
            agent.x >= -10.0 && agent.x <= 10.0 && agent.y >= -5.0 && agent.y <= 5.0,
            "reset position must lie within the arena"
        );
    }

    #[test]
    fn test_reward_text_events() {
        let (sink, receiver) = FeedbackSink::channel();
        let mut agent = EvaderAgent::new(3, 0.0, EvaderConfig::default(), sink);
        agent.set_position(0.0, 0.0);

        agent.step(Action::default(), 0.02, &far_pursuer());

        match receiver.try_recv().unwrap() {
            FeedbackEvent::RewardText { agent: id, text } => {
                assert_eq!(id, 3);
                assert_eq!(text, "0.01");
            }
            other => panic!("expected RewardText, got {:?}", other),
        }
    }

    #[test]
    fn test_spaces() {
        let agent = test_agent(EvaderConfig::default());
        assert_eq!(agent.observation_space().shape, vec![4]);
        assert_eq!(agent.action_space().shape, vec![2]);
    }
}
