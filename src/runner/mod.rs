//! Episode controller
//!
//! [`Simulation`] wires the whole environment together and drives the
//! cooperative frame-stepped loop: one tick advances the pursuer, every
//! evader (observe, act, step, and the reset cycle on episode end), and
//! the target field (movement, contacts, breeding timers). Nothing here
//! blocks; every operation completes within the calling tick.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::env::evader::{EvaderAgent, EvaderConfig};
use crate::env::field::{FieldConfig, TargetField};
use crate::env::population::PopulationController;
use crate::env::pursuer::{Pursuer, WanderConfig};
use crate::env::Agent;
use crate::feedback::{FeedbackEvent, FeedbackSink};
use crate::policy::Policy;

pub mod pool;

/// Full simulation tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed tick length in seconds
    pub dt: f32,

    /// Number of reward-driven evaders
    pub evaders: usize,

    /// Targets seeded at startup
    pub initial_targets: usize,

    /// Maximum simultaneous live targets
    pub capacity: usize,

    /// Spawn-time depth shared by all entities
    pub spawn_depth: f32,

    /// Evader tuning
    pub evader: EvaderConfig,

    /// Target-field tuning
    pub field: FieldConfig,

    /// Deterministic pursuer tuning
    pub wander: WanderConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,
            evaders: 1,
            initial_targets: 4,
            capacity: 50,
            spawn_depth: 0.0,
            evader: EvaderConfig::default(),
            field: FieldConfig::default(),
            wander: WanderConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate tuning values
    pub fn validate(&self) -> Result<()> {
        if self.dt <= 0.0 {
            return Err(anyhow!("dt must be positive"));
        }
        if self.evaders == 0 {
            return Err(anyhow!("at least one evader is required"));
        }
        if self.evader.max_steps == 0 {
            return Err(anyhow!("max_steps must be positive"));
        }
        if self.evader.contact_radius <= 0.0 {
            return Err(anyhow!("contact_radius must be positive"));
        }
        self.field.validate()?;
        Ok(())
    }
}

/// Aggregate statistics over a run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks driven so far
    pub ticks: u64,

    /// Episodes completed across all evaders
    pub episodes: usize,

    /// Best cumulative reward observed at any step of any evader
    pub best_reward: f32,

    /// Sum of final cumulative rewards over completed episodes
    pub total_reward: f64,
}

impl SimulationStats {
    /// Mean final reward per completed episode
    pub fn mean_episode_reward(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.total_reward / self.episodes as f64
    }

    /// Write the stats to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read stats back from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// One complete environment instance and its step loop
///
/// Each simulation owns its population controller; running several
/// simulations side by side never shares state between them.
pub struct Simulation {
    config: SimulationConfig,
    pursuer: Pursuer,
    evaders: Vec<EvaderAgent>,
    field: TargetField,
    population: Arc<PopulationController>,
    evader_policy: Box<dyn Policy + Send>,
    target_policy: Box<dyn Policy + Send>,
    stats: SimulationStats,
    feedback: FeedbackSink,
    cleared_logged: bool,
}

impl Simulation {
    /// Build a simulation from its config and policy collaborators
    pub fn new(
        config: SimulationConfig,
        evader_policy: Box<dyn Policy + Send>,
        target_policy: Box<dyn Policy + Send>,
        feedback: FeedbackSink,
    ) -> Result<Self> {
        config.validate()?;

        let arena = config.evader.arena;
        let population = Arc::new(PopulationController::new(config.capacity)?);
        let pursuer = Pursuer::wandering(arena, config.spawn_depth, config.wander);

        let evaders = (0..config.evaders)
            .map(|id| EvaderAgent::new(id, config.spawn_depth, config.evader, feedback.clone()))
            .collect();

        let mut field = TargetField::new(
            arena,
            Arc::clone(&population),
            config.field,
            config.spawn_depth,
            feedback.clone(),
        )?;

        let mut rng = rand::thread_rng();
        let seeded = field.spawn_initial(config.initial_targets, &mut rng);

        tracing::info!(
            evaders = config.evaders,
            targets = seeded,
            capacity = config.capacity,
            "simulation started"
        );

        Ok(Self {
            config,
            pursuer,
            evaders,
            field,
            population,
            evader_policy,
            target_policy,
            stats: SimulationStats::default(),
            feedback,
            cleared_logged: false,
        })
    }

    /// Advance the whole environment by one tick
    pub fn tick(&mut self) {
        let mut rng = rand::thread_rng();
        let dt = self.config.dt;

        // The wanderer stalks the first evader.
        let quarry = (self.evaders[0].x, self.evaders[0].y);
        self.pursuer.update(dt, quarry, &mut rng);

        for index in 0..self.evaders.len() {
            let observation = self.evaders[index].observe(&self.pursuer);
            let action = self.evader_policy.act(&observation);
            let result = self.evaders[index].step(action, dt, &self.pursuer);

            let reward = self.evaders[index].cumulative_reward();
            if reward > self.stats.best_reward {
                self.stats.best_reward = reward;
                self.feedback.emit(FeedbackEvent::BestScore { text: format!("{:.2}", reward) });
            }

            if result.is_done() {
                self.evaders[index].on_done();
                self.stats.episodes += 1;
                self.stats.total_reward += reward as f64;

                self.evaders[index].reset();
                // Episode-boundary contract: a deterministic pursuer
                // re-randomizes alongside the evader.
                self.pursuer.reinit(&mut rng);
            }
        }

        let observations = self.field.observations(&self.pursuer);
        let actions: Vec<_> = observations
            .iter()
            .map(|(id, observation)| (*id, self.target_policy.act(observation)))
            .collect();
        self.field.apply_actions(&actions, dt, &self.pursuer);
        self.field.tick(dt, &mut rng);

        if self.field.all_cleared() && !self.cleared_logged {
            self.cleared_logged = true;
            tracing::info!("every target removed from the field");
        }

        self.stats.ticks += 1;
    }

    /// Drive `ticks` consecutive ticks and return the stats so far
    pub fn run(&mut self, ticks: u64) -> SimulationStats {
        for _ in 0..ticks {
            self.tick();
        }
        self.stats
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// The shared pursuer
    pub fn pursuer(&self) -> &Pursuer {
        &self.pursuer
    }

    /// The evader agents
    pub fn evaders(&self) -> &[EvaderAgent] {
        &self.evaders
    }

    /// The target field
    pub fn field(&self) -> &TargetField {
        &self.field
    }

    /// Mutable field access for removal collaborators (hits, discards)
    pub fn field_mut(&mut self) -> &mut TargetField {
        &mut self.field
    }

    /// Live target count from the controller
    pub fn live_targets(&self) -> usize {
        self.population.live_count()
    }

    /// The simulation's config
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
