//! Capacity-bounded population controller
//!
//! The controller owns exactly one piece of cross-agent shared state: the
//! live count. Spawns are approved or rejected against a fixed capacity;
//! the controller never constructs agents itself. The count is atomic so a
//! controller shared between parallel simulations (or parallel contact
//! handlers) keeps its invariant without a lock.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};

/// Outcome of a spawn request
///
/// `Rejected` is an expected branch, not a failure: callers simply skip
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnResult {
    /// Capacity available; the live count was incremented and the caller
    /// may construct exactly one agent
    Approved,
    /// At capacity; the caller must not construct an agent
    Rejected,
}

/// Tracks the live mobile-target count against a fixed capacity
///
/// Invariant: `0 <= live_count() <= capacity()` at every observable point.
#[derive(Debug)]
pub struct PopulationController {
    live: AtomicUsize,
    capacity: usize,
}

impl PopulationController {
    /// Create a controller with the given capacity
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(anyhow!("population capacity must be positive"));
        }
        Ok(Self { live: AtomicUsize::new(0), capacity })
    }

    /// Atomically reserve a population slot
    ///
    /// On `Approved` the live count has already been incremented; the
    /// caller (not this controller) constructs the agent.
    pub fn request_spawn(&self) -> SpawnResult {
        let reserved = self.live.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
            if live < self.capacity {
                Some(live + 1)
            } else {
                None
            }
        });

        match reserved {
            Ok(_) => SpawnResult::Approved,
            Err(_) => SpawnResult::Rejected,
        }
    }

    /// Release a slot after a target is hit
    ///
    /// Dropping below zero is a programming defect; the count clamps at
    /// zero and the event is logged rather than propagated, since no
    /// caller can recover mid-tick.
    pub fn on_removed(&self) {
        let released = self.live.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
            if live > 0 {
                Some(live - 1)
            } else {
                None
            }
        });

        if released.is_err() {
            tracing::warn!("population removal with live count already at zero; clamping");
        }
    }

    /// Current number of live targets
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Maximum simultaneous live targets
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a spawn request would currently succeed
    pub fn has_capacity(&self) -> bool {
        self.live_count() < self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_spawn_up_to_capacity() {
        let controller = PopulationController::new(3).unwrap();

        for _ in 0..3 {
            assert_eq!(controller.request_spawn(), SpawnResult::Approved);
        }
        assert_eq!(controller.live_count(), 3);

        assert_eq!(
            controller.request_spawn(),
            SpawnResult::Rejected,
            "spawn past capacity must be rejected"
        );
        assert_eq!(controller.live_count(), 3, "rejection must not change the count");
    }

    #[test]
    fn test_removal_frees_capacity() {
        let controller = PopulationController::new(1).unwrap();
        assert_eq!(controller.request_spawn(), SpawnResult::Approved);
        assert_eq!(controller.request_spawn(), SpawnResult::Rejected);

        controller.on_removed();
        assert_eq!(controller.live_count(), 0);
        assert_eq!(controller.request_spawn(), SpawnResult::Approved);
    }

    #[test]
    fn test_removal_clamps_at_zero() {
        let controller = PopulationController::new(5).unwrap();
        controller.on_removed();
        controller.on_removed();
        assert_eq!(controller.live_count(), 0, "count never goes negative");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(PopulationController::new(0).is_err());
    }

    #[test]
    fn test_concurrent_spawns_respect_capacity() {
        let controller = Arc::new(PopulationController::new(50).unwrap());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let controller = Arc::clone(&controller);
            handles.push(std::thread::spawn(move || {
                let mut approved = 0;
                for _ in 0..20 {
                    if controller.request_spawn() == SpawnResult::Approved {
                        approved += 1;
                    }
                }
                approved
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 50, "exactly capacity-many spawns approved across threads");
        assert_eq!(controller.live_count(), 50);
    }
}
