//! Identifiers, states and errors for display slots.

use crate::loader::SourceType;
use std::fmt;
use thiserror::Error;

/// Identifier of a slot within its [`SlotHost`](crate::host::SlotHost).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u64);

impl SlotId {
    /// Raw numeric value, for logs and display.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// State change reported to a slot's listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// A request was dispatched to the disk or network pool.
    LoadingStarted,

    /// An image was presented for the current identity.
    LoadingCompleted,

    /// A request failed. Reported even when the request was stale.
    LoadingFailed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadingStarted => write!(f, "LOADING_STARTED"),
            Self::LoadingCompleted => write!(f, "LOADING_COMPLETED"),
            Self::LoadingFailed => write!(f, "LOADING_FAILED"),
        }
    }
}

/// Where a slot is in its load cycle for the current identity.
///
/// ```text
/// Idle ──request──► Dispatched ──► Completed | Failed
///   ▲                   ▲                │
///   └──── clear ────────┴─── request ────┘
/// ```
///
/// No state blocks a new request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotPhase {
    /// No identity bound.
    #[default]
    Idle,

    /// Waiting on the disk or network pool.
    Dispatched,

    /// An image for the current identity is presented.
    Completed,

    /// The request for the current identity failed; the placeholder remains.
    Failed,
}

impl SlotPhase {
    /// Returns true while a result for the current identity is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Dispatched)
    }

    /// Returns true once the current identity has an outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for SlotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Dispatched => write!(f, "Dispatched"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// What [`ImageSlot::request_identity`](super::ImageSlot::request_identity) did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The identity was already the slot's desired identity.
    Unchanged,

    /// Served synchronously from the memory cache.
    MemoryHit,

    /// Handed to the pool for the given source.
    Dispatched(SourceType),
}

/// Errors raised synchronously at the slot's call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// An identity was missing (empty)
    #[error("{0} cannot be empty")]
    InvalidIdentity(&'static str),

    /// The slot does not exist in its host
    #[error("Unknown slot: {0}")]
    UnknownSlot(SlotId),
}

/// Reject absent identities.
///
/// The empty string is the slot's "nothing requested" sentinel, so it can
/// never be requested or reported.
pub(crate) fn validate_identity<'a>(
    identity: &'a str,
    what: &'static str,
) -> Result<&'a str, SlotError> {
    if identity.is_empty() {
        return Err(SlotError::InvalidIdentity(what));
    }
    Ok(identity)
}
