//! Flora event stream.
//!
//! Growth milestones flow FROM the simulation TO downstream systems
//! (drops, particles, replication) over a bounded crossbeam channel.
//! Sending never blocks: when the consumer falls behind, events are
//! dropped and counted rather than stalling the simulation tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use verdant_shared::{EntityId, IVec3};

/// Events emitted by the flora simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FloraEvent {
    /// A tree committed a growth step.
    Grown {
        /// The tree's entity.
        entity: EntityId,
        /// Generation after the commit.
        generation: u32,
    },

    /// A plant reached its final form; no further growth is scheduled.
    Matured {
        /// The plant's entity.
        entity: EntityId,
    },

    /// A plant died (longevity or random tick).
    Died {
        /// The plant's entity.
        entity: EntityId,
    },

    /// Part of a plant was destroyed and its dependents cascaded away.
    Destroyed {
        /// The plant's entity.
        entity: EntityId,
        /// The voxel whose destruction started the cascade.
        trigger: IVec3,
        /// Number of voxels removed by the cascade.
        removed: usize,
    },
}

/// Creates a bounded flora event channel.
#[must_use]
pub fn flora_channel(capacity: usize) -> (FloraEventSender, FloraEventReceiver) {
    let (sender, receiver) = bounded(capacity);
    (
        FloraEventSender { sender, dropped: Arc::new(AtomicU64::new(0)) },
        FloraEventReceiver { receiver },
    )
}

/// Producer half; cheap to clone.
#[derive(Clone, Debug)]
pub struct FloraEventSender {
    sender: Sender<FloraEvent>,
    dropped: Arc<AtomicU64>,
}

impl FloraEventSender {
    /// Sends without blocking. Returns `false` (and counts the drop)
    /// when the channel is full or disconnected.
    pub fn send(&self, event: FloraEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Number of events dropped so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Consumer half.
#[derive(Clone, Debug)]
pub struct FloraEventReceiver {
    receiver: Receiver<FloraEvent>,
}

impl FloraEventReceiver {
    /// Receives one event if available.
    #[must_use]
    pub fn try_recv(&self) -> Option<FloraEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drains everything currently queued.
    #[must_use]
    pub fn drain(&self) -> Vec<FloraEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_flow_in_order() {
        let (sender, receiver) = flora_channel(8);
        assert!(sender.send(FloraEvent::Grown { entity: EntityId::new(1), generation: 2 }));
        assert!(sender.send(FloraEvent::Died { entity: EntityId::new(1) }));

        let drained = receiver.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], FloraEvent::Grown { entity: EntityId::new(1), generation: 2 });
    }

    #[test]
    fn test_full_channel_drops_and_counts() {
        let (sender, receiver) = flora_channel(1);
        assert!(sender.send(FloraEvent::Matured { entity: EntityId::new(1) }));
        assert!(!sender.send(FloraEvent::Matured { entity: EntityId::new(2) }));
        assert_eq!(sender.dropped(), 1);
        // The queued event is still intact.
        assert_eq!(receiver.drain().len(), 1);
    }
}
