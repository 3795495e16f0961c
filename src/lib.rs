//! # Pursuit-RL
//!
//! A pursuit-evasion reinforcement learning environment with population
//! dynamics.
//!
//! Evader agents flee a wandering pursuer inside a bounded 2D arena,
//! accumulating reward per episode, while a field of mobile targets
//! breeds new members under a capacity-bounded population controller and
//! loses them to hits. Decision-making lives behind the [`policy::Policy`]
//! boundary; rendering and input are external collaborators fed through
//! [`feedback`] events.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pursuit_rl::prelude::*;
//!
//! let mut sim = Simulation::new(
//!     SimulationConfig::default(),
//!     Box::new(RandomPolicy::new(2.0)),
//!     Box::new(RandomPolicy::new(1.0)),
//!     FeedbackSink::disconnected(),
//! )
//! .unwrap();
//!
//! let stats = sim.run(10_000);
//! println!("episodes: {}, best reward: {:.2}", stats.episodes, stats.best_reward);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment core: arena, agents, population, timers
pub mod env;

/// Fire-and-forget events for presentation collaborators
pub mod feedback;

/// Policy boundary and scripted policies
pub mod policy;

/// Episode controller and parallel simulation pool
pub mod runner;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::env::arena::ArenaBounds;
    pub use crate::env::evader::{EvaderAgent, EvaderConfig};
    pub use crate::env::field::{FieldConfig, TargetField};
    pub use crate::env::population::{PopulationController, SpawnResult};
    pub use crate::env::pursuer::{Pursuer, WanderConfig};
    pub use crate::env::target::{TargetAgent, TargetConfig, TargetId};
    pub use crate::env::timer::{TimerId, TimerQueue};
    pub use crate::env::{Action, Agent, SpaceInfo, SpaceType, StepInfo, StepResult};
    pub use crate::feedback::{FeedbackEvent, FeedbackSink};
    pub use crate::policy::{FleePolicy, Policy, RandomPolicy, StillPolicy};
    pub use crate::runner::pool::SimPool;
    pub use crate::runner::{Simulation, SimulationConfig, SimulationStats};
}

/// Current version of pursuit-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
