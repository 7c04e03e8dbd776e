//! The owning context for display slots.
//!
//! A [`SlotHost`] plays the part of a UI thread: it owns every
//! [`ImageSlot`], and slot state is only ever written from inside it.
//! Worker tasks never touch a slot directly. They post a [`HostMessage`]
//! through a [`HostHandle`] (usually wrapped in a
//! [`CompletionGate`](crate::slot::CompletionGate)), and the host applies
//! messages one at a time in arrival order.
//!
//! Delayed work (the presentation delay) is a timer task that posts its
//! message when the delay elapses. The host itself never sleeps.
//!
//! # Example
//!
//! ```ignore
//! let mut host = SlotHost::new();
//! let row = host.add_slot(NullSurface);
//!
//! host.request(row, "https://example.com/a.png", &loader)?;
//! host.run_for(Duration::from_secs(1)).await;
//! ```

use crate::bitmap::Bitmap;
use crate::loader::BitmapLoader;
use crate::slot::{
    CompletionGate, DisplaySurface, ImageSlot, RequestOutcome, SlotConfig, SlotError, SlotId,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A unit of work for the owning context.
#[derive(Debug, Clone)]
pub enum HostMessage {
    /// A worker produced an image for `identity`.
    Completed {
        slot: SlotId,
        assignment: u64,
        identity: String,
        image: Bitmap,
    },

    /// A worker failed to produce an image for `identity`.
    Failed {
        slot: SlotId,
        assignment: u64,
        identity: String,
        reason: String,
    },

    /// The presentation delay for `identity` elapsed; re-check and present.
    Present {
        slot: SlotId,
        assignment: u64,
        identity: String,
        image: Bitmap,
    },
}

impl HostMessage {
    /// The slot this message is addressed to.
    pub fn slot(&self) -> SlotId {
        match self {
            Self::Completed { slot, .. } | Self::Failed { slot, .. } | Self::Present { slot, .. } => {
                *slot
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
            Self::Present { .. } => "present",
        }
    }
}

/// Cloneable sender into a [`SlotHost`]'s queue.
#[derive(Clone, Debug)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl HostHandle {
    /// Queue a message. Returns false if the host is gone.
    pub fn post(&self, message: HostMessage) -> bool {
        self.tx.send(message).is_ok()
    }

    /// Queue a message once `delay` has elapsed.
    ///
    /// Requires a running tokio runtime when `delay` is non-zero.
    pub fn post_delayed(&self, message: HostMessage, delay: Duration) {
        if delay.is_zero() {
            self.post(message);
            return;
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(message);
        });
    }

    /// Returns true once the host has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single-writer owner of a set of display slots.
pub struct SlotHost {
    slots: HashMap<SlotId, ImageSlot>,
    next_slot: u64,
    defaults: SlotConfig,
    handle: HostHandle,
    rx: mpsc::UnboundedReceiver<HostMessage>,
}

impl SlotHost {
    /// Create a host whose slots use the default configuration.
    pub fn new() -> Self {
        Self::with_config(SlotConfig::default())
    }

    /// Create a host whose new slots start from `defaults`.
    pub fn with_config(defaults: SlotConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            slots: HashMap::new(),
            next_slot: 0,
            defaults,
            handle: HostHandle { tx },
            rx,
        }
    }

    /// A sender into this host's queue.
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Create a slot bound to `surface`.
    pub fn add_slot(&mut self, surface: impl DisplaySurface + 'static) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;

        let slot = ImageSlot::new(id, Box::new(surface), self.handle.clone(), &self.defaults);
        self.slots.insert(id, slot);
        debug!(slot = %id, "Slot added");
        id
    }

    /// Remove a slot, cancelling its in-flight request.
    ///
    /// Results that arrive later for the slot are dropped.
    pub fn remove_slot(&mut self, id: SlotId) -> Option<ImageSlot> {
        let mut slot = self.slots.remove(&id)?;
        slot.cancel_current();
        debug!(slot = %id, "Slot removed");
        Some(slot)
    }

    pub fn slot(&self, id: SlotId) -> Option<&ImageSlot> {
        self.slots.get(&id)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut ImageSlot> {
        self.slots.get_mut(&id)
    }

    /// Slot ids in creation order.
    pub fn slot_ids(&self) -> Vec<SlotId> {
        let mut ids: Vec<SlotId> = self.slots.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bind `identity` to slot `id`. See [`ImageSlot::request_identity`].
    pub fn request(
        &mut self,
        id: SlotId,
        identity: &str,
        loader: &BitmapLoader,
    ) -> Result<RequestOutcome, SlotError> {
        self.slots
            .get_mut(&id)
            .ok_or(SlotError::UnknownSlot(id))?
            .request_identity(identity, loader)
    }

    /// A completion gate addressed to slot `id`.
    pub fn gate(&self, id: SlotId) -> Result<CompletionGate, SlotError> {
        self.slots
            .get(&id)
            .map(ImageSlot::gate)
            .ok_or(SlotError::UnknownSlot(id))
    }

    /// Wait for the next message and apply it.
    ///
    /// The host and its slots hold senders into their own queue, so the
    /// queue never closes while the host is alive: with nothing pending and
    /// nothing in flight this waits forever. Bound it with
    /// [`run_for`](Self::run_for), [`run_until`](Self::run_until) or a
    /// timeout.
    pub async fn turn(&mut self) {
        if let Some(message) = self.rx.recv().await {
            self.dispatch(message);
        }
    }

    /// Apply every message already queued without waiting.
    ///
    /// Returns how many were applied. Applying a `Completed` schedules the
    /// presentation on a timer task, so a non-zero presentation delay
    /// requires a running tokio runtime.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.dispatch(message);
            applied += 1;
        }
        applied
    }

    /// Apply messages until `shutdown` is cancelled.
    ///
    /// The queue stays open for the host's lifetime, so `shutdown` is the
    /// only way out.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                message = self.rx.recv() => match message {
                    Some(message) => self.dispatch(message),
                    None => break,
                },
            }
        }
    }

    /// Apply messages for `duration`.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while let Ok(Some(message)) = tokio::time::timeout_at(deadline, self.rx.recv()).await {
            self.dispatch(message);
        }
    }

    /// Apply messages until `done` holds or `timeout` elapses.
    ///
    /// Returns whether `done` was reached.
    pub async fn run_until<F>(&mut self, mut done: F, timeout: Duration) -> bool
    where
        F: FnMut(&SlotHost) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        while !done(self) {
            match tokio::time::timeout_at(deadline, self.rx.recv()).await {
                Ok(Some(message)) => self.dispatch(message),
                Ok(None) | Err(_) => return false,
            }
        }
        true
    }

    fn dispatch(&mut self, message: HostMessage) {
        let id = message.slot();
        let Some(slot) = self.slots.get_mut(&id) else {
            debug!(slot = %id, kind = message.kind(), "Dropping message for removed slot");
            return;
        };

        let result = match message {
            HostMessage::Completed {
                assignment,
                identity,
                image,
                ..
            } => slot.accept_success(image, &identity, assignment),
            HostMessage::Failed {
                assignment,
                identity,
                reason,
                ..
            } => slot.accept_failure(&identity, assignment, &reason),
            HostMessage::Present {
                assignment,
                identity,
                image,
                ..
            } => {
                slot.present_if_current(&identity, assignment, image);
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(slot = %id, error = %e, "Rejected slot message");
        }
    }
}

impl Default for SlotHost {
    fn default() -> Self {
        Self::new()
    }
}
