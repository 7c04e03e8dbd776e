//! Display slots: identity tracking and result gating.
//!
//! An [`ImageSlot`] is a reusable on-screen position (a list row, a grid
//! cell) that is rebound to different images as the user scrolls. Each
//! rebind names the image by its *identity*, a string key (in practice a
//! URL). The slot's job is to make sure only the image for the identity it
//! currently wants ever reaches its surface.
//!
//! # Flow
//!
//! ```text
//! request_identity(id)
//!     │
//!     ├─ same as desired ───────────────► Unchanged
//!     │
//!     ├─ cancel in-flight request
//!     │
//!     ├─ memory hit ──► present now ────► LOADING_COMPLETED
//!     │
//!     └─ miss ──► placeholder ──► dispatch (disk | network) ──► LOADING_STARTED
//!                                    │
//!                        CompletionGate (any thread)
//!                                    │
//!                             SlotHost queue
//!                                    │
//!            ┌──────── identity still desired? ────────┐
//!            no                                        yes
//!            │                                          │
//!          drop                           wait presentation delay
//!                                                       │
//!                                         identity still desired?
//!                                           │                 │
//!                                          no                yes
//!                                           │                 │
//!                                         drop    cross-fade ──► LOADING_COMPLETED
//! ```
//!
//! Failures skip the delay: the listener is told `LOADING_FAILED` whether
//! or not the identity is still current, and the placeholder stays up.

mod gate;
mod image_slot;
mod surface;
mod types;

pub use gate::CompletionGate;
pub use image_slot::{ImageSlot, SlotConfig, DEFAULT_PRESENTATION_DELAY};
pub use surface::{DisplaySurface, NullSurface, Presentation, StateChangeListener, DEFAULT_CROSSFADE};
pub use types::{LoadState, RequestOutcome, SlotError, SlotId, SlotPhase};
