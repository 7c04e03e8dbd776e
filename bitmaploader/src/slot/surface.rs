//! Collaborators a slot hands its results to.

use super::types::{LoadState, SlotId};
use crate::bitmap::Bitmap;
use std::time::Duration;

/// Default duration of the placeholder-to-image cross-fade.
pub const DEFAULT_CROSSFADE: Duration = Duration::from_millis(300);

/// What the display layer is asked to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Presentation {
    /// Show the bitmap at once (memory cache hits).
    Immediate(Bitmap),

    /// Fade from the placeholder (if any) to the loaded bitmap.
    CrossFade {
        from: Option<Bitmap>,
        to: Bitmap,
        duration: Duration,
    },
}

impl Presentation {
    /// The bitmap that ends up on screen.
    pub fn target(&self) -> &Bitmap {
        match self {
            Self::Immediate(bitmap) => bitmap,
            Self::CrossFade { to, .. } => to,
        }
    }
}

/// The rendering side of a slot.
///
/// Calls arrive on the owning context only. How a placeholder or transition
/// is drawn is entirely up to the implementation.
pub trait DisplaySurface: Send {
    /// Show a loaded image.
    fn present(&mut self, presentation: Presentation);

    /// Show the placeholder, or nothing when there is none.
    fn present_placeholder(&mut self, placeholder: Option<&Bitmap>);
}

/// Observer of a slot's load state changes.
///
/// Fire-and-forget; at most one listener per slot.
pub trait StateChangeListener: Send {
    fn on_state_changed(&mut self, slot: SlotId, state: LoadState);
}

impl<F> StateChangeListener for F
where
    F: FnMut(SlotId, LoadState) + Send,
{
    fn on_state_changed(&mut self, slot: SlotId, state: LoadState) {
        self(slot, state)
    }
}

/// Surface that draws nothing.
///
/// For headless slots that only care about state notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn present(&mut self, _presentation: Presentation) {}

    fn present_placeholder(&mut self, _placeholder: Option<&Bitmap>) {}
}
