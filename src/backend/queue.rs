//! Asynchronous rumble delivery queue
//!
//! Rumble is a best-effort notification: it is handed to a queue and
//! delivered later by a separate consumer, without acknowledgement.

use crate::haptic::RumbleRequest;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, warn};

/// Queue accepting rumble records for later delivery
pub trait RumbleQueue {
    /// Hand a record to the queue without blocking.
    ///
    /// Returns `false` when the record was dropped.
    fn push(&self, request: RumbleRequest) -> bool;
}

impl RumbleQueue for Sender<RumbleRequest> {
    fn push(&self, request: RumbleRequest) -> bool {
        match self.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                warn!("Rumble queue full, dropping {}", request);
                false
            }
            Err(TrySendError::Disconnected(request)) => {
                debug!("Rumble queue has no consumer, dropping {}", request);
                false
            }
        }
    }
}

/// Create a bounded rumble queue
pub fn rumble_queue(capacity: usize) -> (Sender<RumbleRequest>, Receiver<RumbleRequest>) {
    bounded(capacity)
}
