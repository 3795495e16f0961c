//! Target field: owns the mobile-target population
//!
//! The field holds the target vector, the injected population controller,
//! and the timer queue driving breeding delays. It plays the spawn-factory
//! role: construction happens here, and only after the controller approves
//! a slot. Removal is two-phase — `hit` marks a target logically dead and
//! frees its slot immediately, while the presentation layer decides when
//! the entity is actually discarded.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::env::arena::ArenaBounds;
use crate::env::population::{PopulationController, SpawnResult};
use crate::env::pursuer::Pursuer;
use crate::env::target::{TargetAgent, TargetConfig, TargetId};
use crate::env::timer::TimerQueue;
use crate::env::{Action, Agent};
use crate::feedback::{FeedbackEvent, FeedbackSink};

/// Field tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Per-target movement settings
    pub target: TargetConfig,

    /// Overlap distance at which two live targets are in contact
    pub contact_radius: f32,

    /// Delay from spawn until a target may first breed
    pub breed_delay: f32,

    /// Cooldown before an initiator may breed again
    pub breed_cooldown: f32,

    /// Per-axis jitter applied to the initiator's position when placing
    /// offspring
    pub spawn_jitter: f32,

    /// Open x-interval that forces a jittered spawn to the arena center
    ///
    /// The default interval is empty (both edges at -9.8), so the fallback
    /// never fires unless configured otherwise.
    pub fallback_x: (f32, f32),
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            contact_radius: 1.0,
            breed_delay: 2.0,
            breed_cooldown: 2.0,
            spawn_jitter: 2.0,
            fallback_x: (-9.8, -9.8),
        }
    }
}

impl FieldConfig {
    /// Validate tuning values
    pub fn validate(&self) -> Result<()> {
        if self.contact_radius <= 0.0 {
            return Err(anyhow!("contact_radius must be positive"));
        }
        if self.breed_delay < 0.0 || self.breed_cooldown < 0.0 {
            return Err(anyhow!("breeding delays must be non-negative"));
        }
        if self.spawn_jitter <= 0.0 {
            return Err(anyhow!("spawn_jitter must be positive"));
        }
        if self.target.speed <= 0.0 {
            return Err(anyhow!("target speed must be positive"));
        }
        Ok(())
    }
}

/// Deferred field event
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldEvent {
    /// Re-arm breeding on a target after its delay or cooldown
    RearmBreeding(TargetId),
}

/// The mobile-target population and its dynamics
#[derive(Debug)]
pub struct TargetField {
    arena: ArenaBounds,
    bounds: ArenaBounds,
    targets: Vec<TargetAgent>,
    population: Arc<PopulationController>,
    timers: TimerQueue<FieldEvent>,
    config: FieldConfig,
    next_id: TargetId,
    z: f32,
    cleared_announced: bool,
    feedback: FeedbackSink,
}

impl TargetField {
    /// Create an empty field over `arena` with an injected controller
    pub fn new(
        arena: ArenaBounds,
        population: Arc<PopulationController>,
        config: FieldConfig,
        z: f32,
        feedback: FeedbackSink,
    ) -> Result<Self> {
        config.validate()?;
        let bounds = arena.shrink(config.target.edge_margin, config.target.edge_margin)?;

        Ok(Self {
            arena,
            bounds,
            targets: Vec::new(),
            population,
            timers: TimerQueue::new(),
            config,
            next_id: 0,
            z,
            cleared_announced: false,
            feedback,
        })
    }

    /// Seed the field with up to `count` targets at random positions
    ///
    /// Each seed goes through the controller like any other spawn; the
    /// return value is how many were approved.
    pub fn spawn_initial<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.population.request_spawn() == SpawnResult::Rejected {
                break;
            }
            let (x, y) = self.bounds.random_point(rng);
            self.insert_target(x, y);
            spawned += 1;
        }
        spawned
    }

    /// Construct a target at a position whose slot is already reserved
    fn insert_target(&mut self, x: f32, y: f32) -> TargetId {
        let id = self.next_id;
        self.next_id += 1;

        self.targets
            .push(TargetAgent::new(id, x, y, self.z, self.config.target.speed, self.bounds));
        self.timers.schedule(self.config.breed_delay, FieldEvent::RearmBreeding(id));
        id
    }

    fn index_of(&self, id: TargetId) -> Option<usize> {
        self.targets.iter().position(|t| t.id == id)
    }

    /// Access a target by id
    pub fn get(&self, id: TargetId) -> Option<&TargetAgent> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Ids of live (non-touched) targets, in field order
    pub fn live_ids(&self) -> Vec<TargetId> {
        self.targets.iter().filter(|t| !t.is_touched()).map(|t| t.id).collect()
    }

    /// Number of targets currently held, touched included
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the field holds no targets at all
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Live count as tracked by the controller
    pub fn live_count(&self) -> usize {
        self.population.live_count()
    }

    /// Whether every target has been removed
    pub fn all_cleared(&self) -> bool {
        self.population.live_count() == 0 && self.next_id > 0
    }

    /// Observations for every live target
    pub fn observations(&self, pursuer: &Pursuer) -> Vec<(TargetId, Vec<f32>)> {
        self.targets
            .iter()
            .filter(|t| !t.is_touched())
            .map(|t| (t.id, t.observe(pursuer)))
            .collect()
    }

    /// Apply one action per target; unknown ids are skipped
    pub fn apply_actions(&mut self, actions: &[(TargetId, Action)], dt: f32, pursuer: &Pursuer) {
        for (id, action) in actions {
            if let Some(index) = self.index_of(*id) {
                self.targets[index].step(*action, dt, pursuer);
            }
        }
    }

    /// Resolve contacts and advance the breeding timers by one tick
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        self.resolve_contacts(rng);

        for event in self.timers.advance(dt) {
            match event {
                FieldEvent::RearmBreeding(id) => {
                    if let Some(index) = self.index_of(id) {
                        // Touched targets never re-arm.
                        if !self.targets[index].is_touched() {
                            self.targets[index].rearm_breeding();
                        }
                    }
                }
            }
        }
    }

    /// Pairwise overlap detection among live targets
    ///
    /// Each overlapping pair produces one contact with the lower-indexed
    /// target as initiator.
    fn resolve_contacts<R: Rng>(&mut self, rng: &mut R) {
        let mut pairs = Vec::new();
        for i in 0..self.targets.len() {
            if self.targets[i].is_touched() {
                continue;
            }
            for j in (i + 1)..self.targets.len() {
                if self.targets[j].is_touched() {
                    continue;
                }
                if self.targets[i].distance_to(&self.targets[j]) < self.config.contact_radius {
                    pairs.push((self.targets[i].id, self.targets[j].id));
                }
            }
        }

        for (initiator, partner) in pairs {
            self.on_contact(initiator, partner, rng);
        }
    }

    /// Breeding attempt for one contact event
    ///
    /// Fires only if neither party is mid-breed, both are armed, and the
    /// controller approves a slot. On success only the initiator's flags
    /// flip; the partner is left untouched.
    pub fn on_contact<R: Rng>(
        &mut self,
        initiator: TargetId,
        partner: TargetId,
        rng: &mut R,
    ) -> bool {
        let (initiator_index, partner_index) = match (self.index_of(initiator), self.index_of(partner)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        {
            let a = &self.targets[initiator_index];
            let b = &self.targets[partner_index];
            if a.is_touched() || b.is_touched() {
                return false;
            }
            if a.is_breeding() || b.is_breeding() {
                return false;
            }
            if !a.can_breed() || !b.can_breed() {
                return false;
            }
        }

        if self.population.request_spawn() == SpawnResult::Rejected {
            return false;
        }

        let jitter = self.config.spawn_jitter;
        let (mut spawn_x, mut spawn_y) = {
            let a = &self.targets[initiator_index];
            (a.x + rng.gen_range(-jitter..jitter), a.y + rng.gen_range(-jitter..jitter))
        };

        // Spawn positions inside the configured x-interval are forced to
        // the arena center. The default interval is empty, so this branch
        // is dead unless the field is configured with a real interval.
        if spawn_x > self.config.fallback_x.0 && spawn_x < self.config.fallback_x.1 {
            let (cx, cy) = self.arena.center();
            spawn_x = cx;
            spawn_y = cy;
        }

        self.targets[initiator_index].begin_breeding();
        self.timers.schedule(self.config.breed_cooldown, FieldEvent::RearmBreeding(initiator));
        self.insert_target(spawn_x, spawn_y);

        true
    }

    /// Hit a target: one-way, idempotent
    ///
    /// The first hit marks it touched, frees its population slot, cancels
    /// its pending timers, and emits removal feedback. Later hits return
    /// false and change nothing.
    pub fn hit(&mut self, id: TargetId) -> bool {
        let index = match self.index_of(id) {
            Some(index) => index,
            None => return false,
        };

        if !self.targets[index].mark_touched() {
            tracing::warn!(target_id = id, "duplicate hit on an already-touched target");
            return false;
        }

        self.population.on_removed();
        self.timers.cancel_if(|event| matches!(event, FieldEvent::RearmBreeding(owner) if *owner == id));

        let (x, y) = (self.targets[index].x, self.targets[index].y);
        self.feedback.emit(FeedbackEvent::RemovalStarted { target: id, x, y });

        if self.population.live_count() == 0 && !self.cleared_announced {
            self.cleared_announced = true;
            tracing::info!("all targets removed");
            self.feedback.emit(FeedbackEvent::FieldCleared);
        }

        true
    }

    /// Hit every live target within `radius` of a point
    ///
    /// Returns the ids that were hit. Radius matches an area-of-effect
    /// weapon collaborator.
    pub fn hit_within(&mut self, x: f32, y: f32, radius: f32) -> Vec<TargetId> {
        let candidates: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|t| !t.is_touched())
            .filter(|t| {
                let dx = t.x - x;
                let dy = t.y - y;
                (dx * dx + dy * dy).sqrt() < radius
            })
            .map(|t| t.id)
            .collect();

        candidates.into_iter().filter(|&id| self.hit(id)).collect()
    }

    /// Presentation hook: removal effects for `id` completed
    pub fn get_out(&mut self, id: TargetId) {
        if let Some(index) = self.index_of(id) {
            self.targets[index].get_out();
        }
    }

    /// Drop a touched target from the field entirely
    ///
    /// Destruction timing belongs to the embedding layer; the core only
    /// honors the request. Live targets are never discarded this way.
    pub fn discard(&mut self, id: TargetId) -> bool {
        match self.index_of(id) {
            Some(index) if self.targets[index].is_touched() => {
                self.targets.remove(index);
                true
            }
            _ => false,
        }
    }
}
