//! Environment core: agent contract and step types
//!
//! This module defines the shared agent interface and the types exchanged
//! across the step loop. Two concrete agent families implement the
//! contract: the reward-driven [`evader::EvaderAgent`] and the contested
//! [`target::TargetAgent`].

use crate::env::pursuer::Pursuer;

/// Continuous per-tick action: unbounded horizontal and vertical rates
///
/// The core never clamps action values themselves; it clamps their effect
/// through arena bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action {
    /// Horizontal rate (world units per second)
    pub horizontal: f32,
    /// Vertical rate (world units per second)
    pub vertical: f32,
}

impl Action {
    /// Create an action from its two components
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self { horizontal, vertical }
    }
}

/// Result of a single agent step
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the step
    pub observation: Vec<f32>,

    /// Reward delta for this step alone
    pub reward: f32,

    /// Episode ended by contact with the pursuer
    pub terminated: bool,

    /// Episode ended by reaching the step limit
    pub truncated: bool,

    /// Episode/step counters at the time of the step
    pub info: StepInfo,
}

impl StepResult {
    /// Whether the episode is over for either reason
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episode bookkeeping attached to every step result
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInfo {
    /// Episodes started so far
    pub episode: usize,
    /// Steps taken in the current episode
    pub steps: usize,
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,
}

/// Contract shared by both agent families
///
/// State machine: `Running -> (contact | step-limit) -> Done -> reset() ->
/// Running`. Construction puts an agent in `Running`; there is no state
/// outside this cycle.
pub trait Agent {
    /// Current observation: `[x, y, x - pursuer.x, y - pursuer.y]`
    ///
    /// Pure; no side effects.
    fn observe(&self, pursuer: &Pursuer) -> Vec<f32>;

    /// Advance one tick under `action`
    ///
    /// Integrates `action * dt` per axis, applying each axis only if its
    /// candidate position stays strictly inside bounds.
    fn step(&mut self, action: Action, dt: f32, pursuer: &Pursuer) -> StepResult;

    /// Begin a new episode
    fn reset(&mut self);

    /// Hook invoked when an episode ends, before `reset`
    ///
    /// Reserved extension point for collaborators (logging, statistics).
    fn on_done(&mut self) {}
}

pub mod arena;
pub mod evader;
pub mod field;
pub mod population;
pub mod pursuer;
pub mod target;
pub mod timer;
