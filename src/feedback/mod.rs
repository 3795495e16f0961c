//! Feedback events for presentation collaborators
//!
//! The core never renders anything itself. Display text, removal effects,
//! and score updates are emitted as typed events over a channel that a
//! presentation layer may drain at its own pace. Sends are fire-and-forget:
//! a disconnected or absent receiver is never an error.

use crossbeam_channel::{Receiver, Sender};

use crate::env::target::TargetId;

/// Event emitted by the core for a presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    /// Cumulative reward display text for an evader (two-decimal format)
    RewardText {
        /// Index of the evader the text belongs to
        agent: usize,
        /// Pre-formatted reward string, e.g. `"3.42"`
        text: String,
    },

    /// Attempt counter display after an episode reset
    AttemptCount {
        /// Index of the evader that reset
        agent: usize,
        /// Number of episodes started so far
        attempts: usize,
    },

    /// Best cumulative reward seen across all evaders improved
    BestScore {
        /// Pre-formatted reward string, e.g. `"7.18"`
        text: String,
    },

    /// A target was hit; removal effects should play at this position
    ///
    /// The presentation layer calls back into the field (`get_out` /
    /// `discard`) once its effects complete.
    RemovalStarted {
        /// Target that was hit
        target: TargetId,
        /// World x of the hit
        x: f32,
        /// World y of the hit
        y: f32,
    },

    /// Every target has been removed
    FieldCleared,
}

/// Cloneable fire-and-forget sender for [`FeedbackEvent`]s
///
/// A sink without a channel (`disconnected`) swallows all events, which is
/// the normal mode for headless training runs.
#[derive(Debug, Clone)]
pub struct FeedbackSink {
    sender: Option<Sender<FeedbackEvent>>,
}

impl FeedbackSink {
    /// Create a connected sink and the receiver a presentation layer drains
    pub fn channel() -> (Self, Receiver<FeedbackEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender: Some(sender) }, receiver)
    }

    /// Create a sink that discards every event
    pub fn disconnected() -> Self {
        Self { sender: None }
    }

    /// Emit an event; errors from a dropped receiver are ignored
    pub fn emit(&self, event: FeedbackEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    /// Whether a receiver was ever attached
    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }
}
