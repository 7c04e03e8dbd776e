//! Terminal stand-ins for display surfaces.

use bitmaploader::bitmap::Bitmap;
use bitmaploader::slot::{DisplaySurface, Presentation};
use parking_lot::Mutex;
use std::sync::Arc;

/// Describe a presentation in one line.
pub fn describe(presentation: &Presentation) -> String {
    match presentation {
        Presentation::Immediate(bitmap) => {
            format!("{}x{} (from memory)", bitmap.width(), bitmap.height())
        }
        Presentation::CrossFade { to, duration, .. } => format!(
            "{}x{} (cross-fade {}ms)",
            to.width(),
            to.height(),
            duration.as_millis()
        ),
    }
}

/// Surface that prints what it is asked to show, prefixed by a label.
pub struct ConsoleSurface {
    label: String,
    verbose: bool,
}

impl ConsoleSurface {
    pub fn new(label: impl Into<String>, verbose: bool) -> Self {
        Self {
            label: label.into(),
            verbose,
        }
    }
}

impl DisplaySurface for ConsoleSurface {
    fn present(&mut self, presentation: Presentation) {
        println!("[{}] showing {}", self.label, describe(&presentation));
    }

    fn present_placeholder(&mut self, placeholder: Option<&Bitmap>) {
        if self.verbose {
            match placeholder {
                Some(bitmap) => println!(
                    "[{}] placeholder {}x{}",
                    self.label,
                    bitmap.width(),
                    bitmap.height()
                ),
                None => println!("[{}] placeholder", self.label),
            }
        }
    }
}

/// Surface that keeps the last presented bitmap.
#[derive(Clone, Default)]
pub struct CaptureSurface {
    last: Arc<Mutex<Option<Bitmap>>>,
}

impl CaptureSurface {
    pub fn last(&self) -> Option<Bitmap> {
        self.last.lock().clone()
    }
}

impl DisplaySurface for CaptureSurface {
    fn present(&mut self, presentation: Presentation) {
        *self.last.lock() = Some(presentation.target().clone());
    }

    fn present_placeholder(&mut self, _placeholder: Option<&Bitmap>) {}
}
