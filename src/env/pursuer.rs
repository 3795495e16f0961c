//! The pursuer entity agents flee from
//!
//! Agents only ever read the pursuer's position; nothing in the agent
//! family mutates it. The pursuer is either driven externally (a human
//! pointer, out of scope here) or by the built-in deterministic wanderer,
//! which chases jittered waypoints around its quarry.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::env::arena::ArenaBounds;

/// Tuning for the deterministic wanderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WanderConfig {
    /// Lower bound of the speed drawn at each init
    pub speed_min: f32,
    /// Upper bound of the speed drawn at each init
    pub speed_max: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_radius: f32,
    /// Per-axis jitter applied around the quarry when picking a waypoint
    pub waypoint_jitter: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            speed_min: 5.0,
            speed_max: 20.0,
            waypoint_radius: 0.5,
            waypoint_jitter: 3.0,
        }
    }
}

/// Wandering controller state
#[derive(Debug, Clone)]
struct Wanderer {
    config: WanderConfig,
    speed: f32,
    waypoint: (f32, f32),
}

/// Pursuer position plus an optional wandering controller
#[derive(Debug, Clone)]
pub struct Pursuer {
    /// World x
    pub x: f32,
    /// World y
    pub y: f32,
    /// Fixed depth, set at construction
    pub z: f32,
    arena: ArenaBounds,
    wanderer: Option<Wanderer>,
}

impl Pursuer {
    /// Externally driven pursuer at the arena center
    ///
    /// Position updates come through [`set_position`](Self::set_position);
    /// `update` and `reinit` are no-ops.
    pub fn external(arena: ArenaBounds, z: f32) -> Self {
        let (x, y) = arena.center();
        Self { x, y, z, arena, wanderer: None }
    }

    /// Pursuer driven by the deterministic wanderer
    pub fn wandering(arena: ArenaBounds, z: f32, config: WanderConfig) -> Self {
        let mut pursuer = Self {
            x: 0.0,
            y: 0.0,
            z,
            arena,
            wanderer: Some(Wanderer {
                config,
                speed: config.speed_min,
                waypoint: (0.0, 0.0),
            }),
        };
        pursuer.reinit(&mut rand::thread_rng());
        pursuer
    }

    /// Whether the deterministic wanderer is attached
    pub fn is_wandering(&self) -> bool {
        self.wanderer.is_some()
    }

    /// Set the position directly (externally driven mode)
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Re-randomize wandering state: uniform position, fresh speed draw
    ///
    /// Called at construction and again at each episode reset. No-op for
    /// an externally driven pursuer.
    pub fn reinit<R: Rng>(&mut self, rng: &mut R) {
        if let Some(wanderer) = &mut self.wanderer {
            let (x, y) = self.arena.random_point(rng);
            self.x = x;
            self.y = y;
            wanderer.speed = rng.gen_range(wanderer.config.speed_min..wanderer.config.speed_max);
            // Force a fresh waypoint on the next update
            wanderer.waypoint = (x, y);
        }
    }

    /// Advance the wanderer one tick toward its waypoint
    ///
    /// `quarry` is the position new waypoints are jittered around. No-op
    /// for an externally driven pursuer.
    pub fn update<R: Rng>(&mut self, dt: f32, quarry: (f32, f32), rng: &mut R) {
        if let Some(wanderer) = &mut self.wanderer {
            let dx = wanderer.waypoint.0 - self.x;
            let dy = wanderer.waypoint.1 - self.y;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist < wanderer.config.waypoint_radius {
                let jitter = wanderer.config.waypoint_jitter;
                wanderer.waypoint = (
                    quarry.0 + rng.gen_range(-jitter..jitter),
                    quarry.1 + rng.gen_range(-jitter..jitter),
                );
            } else {
                self.x += dx / dist * wanderer.speed * dt;
                self.y += dy / dist * wanderer.speed * dt;
            }
        }
    }

    /// 2D distance from the pursuer to a point
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}
