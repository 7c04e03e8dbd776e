//! Entry point for worker results.

use super::types::{validate_identity, SlotError, SlotId};
use crate::bitmap::Bitmap;
use crate::host::{HostHandle, HostMessage};
use std::fmt;
use tracing::debug;

/// Completion callback handed to a load task.
///
/// Safe to call from any thread. Nothing is applied here: results are posted
/// to the slot's owning context, which checks them against the slot's current
/// identity and assignment before anything reaches the screen.
///
/// A gate is stamped with the assignment that was current when it was made.
/// Once the slot is rebound, even back to the same identity, results through
/// this gate are stale.
#[derive(Clone, Debug)]
pub struct CompletionGate {
    slot: SlotId,
    assignment: u64,
    handle: HostHandle,
}

impl CompletionGate {
    pub(crate) fn new(slot: SlotId, assignment: u64, handle: HostHandle) -> Self {
        Self {
            slot,
            assignment,
            handle,
        }
    }

    /// The slot results are delivered to.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// The slot assignment this gate reports for.
    pub fn assignment(&self) -> u64 {
        self.assignment
    }

    /// Report that `image` was produced for `identity`.
    pub fn on_success(&self, image: Bitmap, identity: &str) -> Result<(), SlotError> {
        let identity = validate_identity(identity, "computed-for identity")?;
        self.post(HostMessage::Completed {
            slot: self.slot,
            assignment: self.assignment,
            identity: identity.to_string(),
            image,
        });
        Ok(())
    }

    /// Report that loading `identity` failed.
    pub fn on_failure(&self, identity: &str, reason: impl fmt::Display) -> Result<(), SlotError> {
        let identity = validate_identity(identity, "computed-for identity")?;
        self.post(HostMessage::Failed {
            slot: self.slot,
            assignment: self.assignment,
            identity: identity.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    fn post(&self, message: HostMessage) {
        if !self.handle.post(message) {
            debug!(slot = %self.slot, "Host gone, dropping result");
        }
    }
}
