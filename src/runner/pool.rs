//! Parallel simulation pool
//!
//! Steps many independent simulations concurrently with Rayon. Each
//! simulation owns its own population controller, so pooled runs share no
//! state; the controller's atomic counter covers the remaining
//! within-simulation concurrency.

use anyhow::Result;
use rayon::prelude::*;

use super::{Simulation, SimulationStats};

/// A pool of independent simulations
pub struct SimPool {
    sims: Vec<Simulation>,
}

impl SimPool {
    /// Build `count` simulations from a factory
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pursuit_rl::feedback::FeedbackSink;
    /// use pursuit_rl::policy::{RandomPolicy, StillPolicy};
    /// use pursuit_rl::runner::{pool::SimPool, Simulation, SimulationConfig};
    ///
    /// let pool = SimPool::new(8, || {
    ///     Simulation::new(
    ///         SimulationConfig::default(),
    ///         Box::new(RandomPolicy::new(2.0)),
    ///         Box::new(StillPolicy),
    ///         FeedbackSink::disconnected(),
    ///     )
    /// })
    /// .unwrap();
    /// ```
    pub fn new<F>(count: usize, factory: F) -> Result<Self>
    where
        F: Fn() -> Result<Simulation>,
    {
        let sims = (0..count).map(|_| factory()).collect::<Result<Vec<_>>>()?;
        Ok(Self { sims })
    }

    /// Advance every simulation by one tick in parallel
    pub fn tick_all(&mut self) {
        self.sims.par_iter_mut().for_each(|sim| sim.tick());
    }

    /// Drive every simulation `ticks` ticks in parallel
    pub fn run_all(&mut self, ticks: u64) -> Vec<SimulationStats> {
        self.sims.par_iter_mut().map(|sim| sim.run(ticks)).collect()
    }

    /// Number of pooled simulations
    pub fn len(&self) -> usize {
        self.sims.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.sims.is_empty()
    }

    /// Access a pooled simulation
    pub fn get(&self, index: usize) -> Option<&Simulation> {
        self.sims.get(index)
    }
}
